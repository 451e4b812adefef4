//! Keyboard sampling.
//!
//! Movement keys are tracked as "held": `key_frame` records the frame of
//! the last press/repeat for every key, and a key counts as down while that
//! frame is within `HOLD_WINDOW`. This works on both classes of terminal:
//!
//! * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
//!   `Press` / `Repeat` / `Release` events, so keys are dropped on release.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows as
//!   repeated `Press`). Keys expire after `HOLD_WINDOW` frames of silence,
//!   which outlasts the OS repeat interval.
//!
//! Fire is edge-triggered: one shot per key-down, never per repeat.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key is "held" if its last press/repeat arrived within this many
/// frames. 8 frames @ 60 FPS ≈ 133 ms, above the ≥ 15 Hz OS repeat rate.
pub const HOLD_WINDOW: u64 = 8;

/// Directional state and fire edge for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// One-shot actions recognised outside of gameplay controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Restart,
    /// Any other key press; dismisses the round banner.
    AnyKey,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    fire_pending: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event seen during `frame`.
    pub fn handle(&mut self, event: &KeyEvent, frame: u64) -> Option<Action> {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Action::Quit)
                    }
                    KeyCode::Char('r') => Some(Action::Restart),
                    KeyCode::Char(' ') => {
                        self.fire_pending = true;
                        Some(Action::AnyKey)
                    }
                    _ => Some(Action::AnyKey),
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                None
            }
        }
    }

    pub fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Read the controls for `frame`. Consumes the pending fire edge.
    pub fn sample(&mut self, frame: u64) -> Controls {
        let left = self.is_held(KeyCode::Left, frame) || self.is_held(KeyCode::Char('a'), frame);
        let right = self.is_held(KeyCode::Right, frame) || self.is_held(KeyCode::Char('d'), frame);
        Controls {
            left,
            right,
            fire: std::mem::take(&mut self.fire_pending),
        }
    }

    /// Forget everything, e.g. when leaving a menu.
    pub fn clear(&mut self) {
        self.key_frame.clear();
        self.fire_pending = false;
    }
}

/// Letters are tracked case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

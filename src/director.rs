//! Round/Spawn Director: round bookkeeping, difficulty escalation and the
//! game status machine.
//!
//! ```text
//! Announcing ──(timeout | key)──▶ Playing ──(health == 0)──▶ GameOverMenu
//!     ▲                                                         │
//!     └────────────── Restart (fresh state) ◀───────────────────┤
//!                                                Quit ──▶ Terminated
//! ```
//!
//! Any status moves to `Terminated` on quit or window close.

use log::info;
use rand::Rng;

use crate::collision::MaskSet;
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus, Player, Rect, RoundState};
use crate::events::GameEvent;
use crate::input::Action;
use crate::spawn;

impl RoundState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            round_number: 1,
            kills_this_round: 0,
            kill_threshold: config.round.kill_threshold,
            enemy_speed_scalar: config.enemy.base_speed,
            total_kills: 0,
            score: 0,
        }
    }

    pub fn record_kill(&mut self, value: u32) {
        self.kills_this_round += 1;
        self.total_kills += 1;
        self.score += value;
    }

    pub fn threshold_reached(&self) -> bool {
        self.kills_this_round >= self.kill_threshold
    }

    /// Move to the next round. Round number and speed only ever grow.
    pub fn advance(&mut self, speed_step: f32) {
        self.round_number += 1;
        self.kills_this_round = 0;
        self.enemy_speed_scalar += speed_step;
    }
}

/// Menu options on the game-over screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Restart,
    Quit,
}

fn new_player(config: &GameConfig, width: f32, height: f32) -> Player {
    let p = &config.player;
    let x = ((width - p.width) / 2.0).floor().max(0.0);
    let y = (height - p.height - p.bottom_margin).max(0.0);
    Player {
        rect: Rect::new(x, y, p.width, p.height),
        health: p.health,
        max_health: p.health,
        power_up: None,
        alive: true,
    }
}

/// Build a fresh game: full-health player, round 1, one formation and the
/// configured free-roaming enemies, opening on the "Round 1" banner.
pub fn new_game(
    config: GameConfig,
    width: u16,
    height: u16,
    masks: MaskSet,
    rng: &mut impl Rng,
) -> GameState {
    let player = new_player(&config, f32::from(width), f32::from(height));
    let round = RoundState::new(&config);
    let announce_ticks = config.round.announce_ticks;

    let mut state = GameState {
        player,
        enemies: Vec::new(),
        formations: Vec::new(),
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        bombs: Vec::new(),
        power_ups: Vec::new(),
        round,
        status: GameStatus::Announcing {
            round: 1,
            ticks_left: announce_ticks,
        },
        frame: 0,
        width,
        height,
        masks,
        events: Vec::new(),
        config,
        next_id: 1,
    };

    spawn::spawn_formation(&mut state, rng);
    top_up_free_enemies(&mut state, rng);
    info!(
        "new game on {}x{} screen: {} enemies in {} formation(s)",
        width,
        height,
        state.enemies.len(),
        state.formations.len()
    );
    state
}

/// Start over with the same configuration, screen and sprite masks.
pub fn restart(state: &GameState, rng: &mut impl Rng) -> GameState {
    info!(
        "restarting after round {} with {} kills",
        state.round.round_number, state.round.total_kills
    );
    new_game(
        state.config.clone(),
        state.width,
        state.height,
        state.masks.clone(),
        rng,
    )
}

/// Spawn free-roaming enemies until the configured count is on screen.
pub fn top_up_free_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let wanted = state.config.enemy.free_count as usize;
    let missing = wanted.saturating_sub(state.free_enemy_count());
    spawn::spawn_free_enemies(state, missing as u32, rng);
}

/// If this round's kill threshold is met, advance to the next round, spawn
/// a fresh formation and show the round banner. Returns `true` on advance.
pub fn check_escalation(state: &mut GameState, rng: &mut impl Rng) -> bool {
    if !state.round.threshold_reached() {
        return false;
    }
    state.round.advance(state.config.round.speed_step);
    let round = state.round.round_number;

    spawn::spawn_formation(state, rng);
    top_up_free_enemies(state, rng);

    state.events.push(GameEvent::RoundAdvanced { round });
    if state.status == GameStatus::Playing {
        state.status = GameStatus::Announcing {
            round,
            ticks_left: state.config.round.announce_ticks,
        };
    }
    info!(
        "round {} begins, enemy speed {:.3}",
        round, state.round.enemy_speed_scalar
    );
    true
}

/// Switch to the game-over menu. Called once, by the hit that kills the
/// player.
pub fn enter_game_over(state: &mut GameState) {
    if state.status == GameStatus::Terminated {
        return;
    }
    state.status = GameStatus::GameOverMenu;
    state.events.push(GameEvent::GameOver);
    info!(
        "game over in round {}: {} kills, score {}",
        state.round.round_number, state.round.total_kills, state.round.score
    );
}

/// Count down the round banner; resumes play when it runs out.
pub fn update_announcement(state: &mut GameState) {
    if let GameStatus::Announcing { round, ticks_left } = state.status {
        state.status = if ticks_left <= 1 {
            GameStatus::Playing
        } else {
            GameStatus::Announcing {
                round,
                ticks_left: ticks_left - 1,
            }
        };
    }
}

/// A key press ends the round banner early.
pub fn dismiss_announcement(state: &mut GameState) {
    if matches!(state.status, GameStatus::Announcing { .. }) {
        state.status = GameStatus::Playing;
    }
}

/// Apply a game-over menu choice. Ignored in any other status.
pub fn choose(state: &GameState, choice: MenuChoice, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::GameOverMenu {
        return state.clone();
    }
    match choice {
        MenuChoice::Restart => restart(state, rng),
        MenuChoice::Quit => {
            let mut next = state.clone();
            terminate(&mut next);
            next
        }
    }
}

/// Route a key action through the status machine. The flag is true when
/// the key was consumed by the banner or the menu, so held input must be
/// dropped before the next gameplay sample.
pub fn apply_action(state: &GameState, action: Action, rng: &mut impl Rng) -> (GameState, bool) {
    match (action, state.status) {
        (Action::Quit, GameStatus::GameOverMenu) => (choose(state, MenuChoice::Quit, rng), true),
        (Action::Quit, _) => {
            let mut next = state.clone();
            terminate(&mut next);
            (next, true)
        }
        (Action::Restart, GameStatus::GameOverMenu) => {
            (choose(state, MenuChoice::Restart, rng), true)
        }
        (_, GameStatus::Announcing { .. }) => {
            let mut next = state.clone();
            dismiss_announcement(&mut next);
            (next, true)
        }
        _ => (state.clone(), false),
    }
}

/// Quit or window close: the loop stops at the next tick boundary.
pub fn terminate(state: &mut GameState) {
    if state.status != GameStatus::Terminated {
        info!("terminating at frame {}", state.frame);
    }
    state.status = GameStatus::Terminated;
}

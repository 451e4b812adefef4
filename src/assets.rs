//! Text sprites and the fallback chain for missing art.
//!
//! Sprites are plain text files: every non-space character is a drawn (and
//! solid) cell. The player ship and the background are required; enemy
//! sprites are optional and fall back to procedurally drawn shapes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};

use crate::collision::{Mask, MaskSet};
use crate::entities::EnemyKind;
use crate::error::GameError;

pub const PLAYER_FILE: &str = "player.txt";
pub const BACKGROUND_FILE: &str = "background.txt";

fn enemy_file(kind: EnemyKind) -> &'static str {
    match kind {
        EnemyKind::Weak => "enemy_weak.txt",
        EnemyKind::Mid => "enemy_mid.txt",
        EnemyKind::Strong => "enemy_strong.txt",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    rows: Vec<String>,
    width: usize,
}

impl Sprite {
    /// Parse sprite text. Trailing blank lines are dropped; returns `None`
    /// when nothing drawable is left.
    pub fn from_text(text: &str) -> Option<Self> {
        let mut rows: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return None;
        }
        Some(Self { rows, width })
    }

    /// Procedurally drawn stand-in for a missing enemy sprite: a framed
    /// block sized to the enemy's bounds.
    pub fn placeholder(kind: EnemyKind) -> Self {
        let (w, h) = kind.size();
        let (w, h) = (w as usize, h as usize);
        let (edge, fill) = match kind {
            EnemyKind::Weak => ('o', 'v'),
            EnemyKind::Mid => ('#', '='),
            EnemyKind::Strong => ('@', '%'),
        };
        let rows = (0..h)
            .map(|y| {
                (0..w)
                    .map(|x| {
                        if y == 0 || y == h - 1 || x == 0 || x == w - 1 {
                            edge
                        } else {
                            fill
                        }
                    })
                    .collect::<String>()
            })
            .collect();
        Self { rows, width: w }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn mask(&self) -> Mask {
        Mask::from_rows(&self.rows)
    }
}

/// Every sprite the renderer needs, with fallbacks already applied.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    pub player: Sprite,
    pub background: Sprite,
    pub weak: Sprite,
    pub mid: Sprite,
    pub strong: Sprite,
    /// Names of optional assets that were replaced by placeholders.
    pub fallbacks: Vec<&'static str>,
}

impl AssetCatalog {
    /// Load sprites from `dir`. Fails if a required asset is missing or
    /// empty; optional ones degrade to placeholders with a warning.
    pub fn load(dir: &Path) -> Result<Self, GameError> {
        let player = load_required(dir, PLAYER_FILE)?;
        let background = load_required(dir, BACKGROUND_FILE)?;

        let mut fallbacks = Vec::new();
        let mut enemy = |kind: EnemyKind| match load_optional(dir, kind) {
            Some(sprite) => sprite,
            None => {
                fallbacks.push(enemy_file(kind));
                Sprite::placeholder(kind)
            }
        };
        let weak = enemy(EnemyKind::Weak);
        let mid = enemy(EnemyKind::Mid);
        let strong = enemy(EnemyKind::Strong);

        info!("loaded sprites from {}", dir.display());
        Ok(Self {
            player,
            background,
            weak,
            mid,
            strong,
            fallbacks,
        })
    }

    /// Built-in sprites only. Used by tests and headless runs.
    pub fn with_placeholders(player: Sprite, background: Sprite) -> Self {
        Self {
            player,
            background,
            weak: Sprite::placeholder(EnemyKind::Weak),
            mid: Sprite::placeholder(EnemyKind::Mid),
            strong: Sprite::placeholder(EnemyKind::Strong),
            fallbacks: EnemyKind::ALL.iter().map(|&k| enemy_file(k)).collect(),
        }
    }

    pub fn enemy(&self, kind: EnemyKind) -> &Sprite {
        match kind {
            EnemyKind::Weak => &self.weak,
            EnemyKind::Mid => &self.mid,
            EnemyKind::Strong => &self.strong,
        }
    }

    /// Collision masks matching the sprites in use.
    pub fn masks(&self) -> MaskSet {
        MaskSet {
            player: Some(self.player.mask()),
            weak: Some(self.weak.mask()),
            mid: Some(self.mid.mask()),
            strong: Some(self.strong.mask()),
        }
    }
}

fn load_required(dir: &Path, name: &'static str) -> Result<Sprite, GameError> {
    let path = dir.join(name);
    let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GameError::MissingAsset {
            name,
            path: path.clone(),
        },
        _ => GameError::Io(e),
    })?;
    Sprite::from_text(&text).ok_or(GameError::EmptySprite { name, path })
}

/// An optional enemy sprite is only used if it exists, is drawable and
/// matches the enemy's bounds; anything else falls back.
fn load_optional(dir: &Path, kind: EnemyKind) -> Option<Sprite> {
    let name = enemy_file(kind);
    let path = dir.join(name);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            warn!("{name}: {e}; drawing placeholder");
            return None;
        }
    };
    let Some(sprite) = Sprite::from_text(&text) else {
        warn!("{name} is empty; drawing placeholder");
        return None;
    };
    let (w, h) = kind.size();
    if sprite.width() != w as usize || sprite.height() != h as usize {
        warn!(
            "{name} is {}x{}, expected {}x{}; drawing placeholder",
            sprite.width(),
            sprite.height(),
            w,
            h
        );
        return None;
    }
    Some(sprite)
}

//! Events emitted by the simulation for the HUD, audio cues and logging.

use crate::entities::{EnemyKind, EntityId, FormationId, PowerUpKind};

/// One thing that happened during a tick. `GameState::events` is cleared at
/// the start of every tick.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Enemy destroyed by player fire; counts toward the round.
    EnemyKilled {
        id: EntityId,
        kind: EnemyKind,
        value: u32,
    },
    /// Enemy destroyed by ramming the player; no kill credit.
    EnemyCrashed { id: EntityId },
    /// Bomb consumed on contact; `hits` enemies were inside the radius.
    BombDetonated { x: f32, y: f32, hits: usize },
    PowerUpDropped { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    PlayerHit { health: u32 },
    /// Fired once per game, on the hit that takes health to zero.
    GameOver,
    RoundAdvanced { round: u32 },
    FormationCleared { id: FormationId },
}

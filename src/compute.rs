/// Tick pipeline.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`. Side effects are limited to the injected RNG, so a seeded
/// RNG replays a game exactly.

use rand::Rng;

use crate::collision::MaskSet;
use crate::combat;
use crate::config::GameConfig;
use crate::director;
use crate::enemy;
use crate::entities::{Direction, GameState, GameStatus};
use crate::formation;
use crate::kinematics;
use crate::spawn;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for the given configuration and screen size.
pub fn init_state(
    config: GameConfig,
    width: u16,
    height: u16,
    masks: MaskSet,
    rng: &mut impl Rng,
) -> GameState {
    director::new_game(config, width, height, masks, rng)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Shift the ship one step and clamp it fully inside the screen.
pub fn move_player(state: &GameState, direction: Direction) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Playing || !next.player.alive {
        return next;
    }
    let max_x = (next.screen_width() - next.player.rect.w).max(0.0);
    let x = next.player.rect.x + direction.sign() * next.config.player.speed;
    next.player.rect.x = x.clamp(0.0, max_x);
    next
}

pub fn move_player_left(state: &GameState) -> GameState {
    move_player(state, Direction::Left)
}

pub fn move_player_right(state: &GameState) -> GameState {
    move_player(state, Direction::Right)
}

/// Fire from the ship's top-center: a bomb in bomb mode, otherwise a bullet
/// plus a second one beside it with double shot.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Playing || !next.player.alive {
        return next;
    }
    let (cx, _) = next.player.rect.center();
    let top = next.player.rect.y;

    if next.player.bomb_mode() {
        let id = next.alloc_id();
        let bomb = spawn::bomb(id, cx, top, &next);
        next.bombs.push(bomb);
        return next;
    }

    let id = next.alloc_id();
    let bullet = spawn::player_bullet(id, cx, top, &next);
    next.bullets.push(bullet);
    if next.player.double_shot() {
        let id = next.alloc_id();
        let offset = next.config.weapons.double_shot_offset;
        let bullet = spawn::player_bullet(id, cx - offset, top, &next);
        next.bullets.push(bullet);
    }
    next
}

// ── Per-frame tick (nearly pure: RNG is injected) ──────────────────────────

/// Advance the simulation by one frame. While the round banner is up only
/// its countdown runs; in the menus and after termination nothing moves.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();

    match next.status {
        GameStatus::Announcing { .. } => director::update_announcement(&mut next),
        GameStatus::Playing => step(&mut next, rng),
        GameStatus::GameOverMenu | GameStatus::Terminated => {}
    }
    next
}

fn step(state: &mut GameState, rng: &mut impl Rng) {
    state.frame += 1;

    // ── 1. Entities advance ──────────────────────────────────────────────────
    kinematics::advance_all(state, rng);
    enemy::run_fire_control(state, rng);

    // ── 2. Formations reposition their members ──────────────────────────────
    formation::update_formations(state);

    // ── 3. Collisions, combat and round escalation ──────────────────────────
    combat::resolve(state, rng);
}

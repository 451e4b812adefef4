//! Entity construction: free-roaming enemies, formations, projectiles and
//! power-up drops. All randomness comes through the injected `rng`.

use log::debug;
use rand::distributions::WeightedIndex;
use rand::distributions::Distribution;
use rand::Rng;

use crate::entities::{
    Bomb, Bullet, BulletOwner, Direction, Enemy, EnemyKind, EntityId, Formation, FormationId,
    GameState, PowerUp, PowerUpKind, Rect,
};
use crate::events::GameEvent;

/// Pick a kind for a free-roaming enemy using the configured weights.
pub fn roll_enemy_kind(weights: &[u32; 3], rng: &mut impl Rng) -> EnemyKind {
    match WeightedIndex::new(weights) {
        Ok(dist) => EnemyKind::ALL[dist.sample(rng)],
        Err(_) => EnemyKind::Weak,
    }
}

/// Fall speed for a newly rolled enemy: the round scalar plus jitter.
pub fn roll_speed(scalar: f32, jitter: f32, rng: &mut impl Rng) -> f32 {
    let bonus = if jitter > 0.0 { rng.gen_range(0.0..=jitter) } else { 0.0 };
    scalar + bonus
}

fn roll_enemy_speed(state: &GameState, rng: &mut impl Rng) -> f32 {
    roll_speed(state.round.enemy_speed_scalar, state.config.enemy.speed_jitter, rng)
}

/// First frame at which an enemy may roll to fire again.
pub fn roll_next_fire_frame(state: &GameState, rng: &mut impl Rng) -> u64 {
    let cfg = &state.config.enemy;
    state.frame + rng.gen_range(cfg.fire_interval_min..=cfg.fire_interval_max)
}

/// Random position just above the top edge.
pub fn top_position(width: f32, enemy_w: f32, enemy_h: f32, rng: &mut impl Rng) -> (f32, f32) {
    let max_x = (width - enemy_w).max(0.0);
    let x = rng.gen_range(0.0..=max_x).floor();
    let y = -enemy_h - rng.gen_range(0.0..=enemy_h * 2.0).floor();
    (x, y)
}

/// Move a free enemy that fell off the bottom back above the top with a
/// freshly rolled speed. The enemy keeps its identity and health.
pub fn recycle_enemy(enemy: &mut Enemy, width: f32, scalar: f32, jitter: f32, rng: &mut impl Rng) {
    let (x, y) = top_position(width, enemy.rect.w, enemy.rect.h, rng);
    enemy.rect.x = x;
    enemy.rect.y = y;
    enemy.speed = roll_speed(scalar, jitter, rng);
}

fn new_enemy(state: &mut GameState, kind: EnemyKind, rect: Rect, rng: &mut impl Rng) -> Enemy {
    let id = state.alloc_id();
    let speed = roll_enemy_speed(state, rng);
    let next_fire_frame = roll_next_fire_frame(state, rng);
    Enemy {
        id,
        kind,
        rect,
        health: kind.max_health(),
        value: kind.kill_value(),
        speed,
        formation: None,
        offset: (0.0, 0.0),
        next_fire_frame,
    }
}

/// Spawn one free-roaming enemy of a random kind above the screen.
pub fn spawn_free_enemy(state: &mut GameState, rng: &mut impl Rng) -> EntityId {
    let kind = roll_enemy_kind(&state.config.enemy.kind_weights, rng);
    let (w, h) = kind.size();
    let (x, y) = top_position(state.screen_width(), w, h, rng);
    let enemy = new_enemy(state, kind, Rect::new(x, y, w, h), rng);
    let id = enemy.id;
    debug!("spawned free {:?} enemy #{} at ({x}, {y})", kind, id);
    state.enemies.push(enemy);
    id
}

pub fn spawn_free_enemies(state: &mut GameState, count: u32, rng: &mut impl Rng) {
    for _ in 0..count {
        spawn_free_enemy(state, rng);
    }
}

/// Kind for a formation row: the front row is the toughest.
fn formation_row_kind(row: u32) -> EnemyKind {
    match row {
        0 => EnemyKind::Strong,
        1 => EnemyKind::Mid,
        _ => EnemyKind::Weak,
    }
}

/// Spawn a formation centered horizontally near the top of the screen.
/// Columns that would not fit between the margins are dropped.
///
/// Live formations keep their band: the new one starts below the lowest of
/// them and loses rows that would reach into the player's lane. Returns
/// `None` when not even one row fits.
pub fn spawn_formation(state: &mut GameState, rng: &mut impl Rng) -> Option<FormationId> {
    let cfg = state.config.formation.clone();
    let width = state.screen_width();

    let (widest, _) = EnemyKind::Strong.size();
    let usable = (width - 2.0 * cfg.margin - widest).max(0.0);
    let fit = if cfg.spacing_x > 0.0 {
        (usable / cfg.spacing_x).floor() as u32 + 1
    } else {
        cfg.cols
    };
    let cols = cfg.cols.min(fit).max(1);

    let top = occupied_bottom(state).map_or(cfg.top, |bottom| (bottom + 1.0).max(cfg.top));
    let floor = state.player.rect.y - cfg.spacing_y;
    let rows = (0..cfg.rows)
        .take_while(|&row| {
            top + row as f32 * cfg.spacing_y + formation_row_kind(row).size().1 <= floor
        })
        .count() as u32;
    if rows == 0 {
        debug!("no room for another formation below y={top}");
        return None;
    }

    let span = (cols - 1) as f32 * cfg.spacing_x + widest;
    let anchor = (((width - span) / 2.0).max(cfg.margin).floor(), top.ceil());

    let base = state.config.enemy.base_speed;
    let speed = cfg.speed * state.round.enemy_speed_scalar / base;

    let id = state.alloc_id();
    let mut formation = Formation {
        id,
        anchor,
        cols,
        rows,
        spacing: (cfg.spacing_x, cfg.spacing_y),
        direction: Direction::Right,
        speed,
        members: Vec::new(),
    };

    for row in 0..rows {
        let kind = formation_row_kind(row);
        let (w, h) = kind.size();
        for col in 0..cols {
            let (ox, oy) = formation.slot_offset(col, row);
            // Narrower kinds sit centered in the slot of the widest kind.
            let ox = ox + ((widest - w) / 2.0).floor();
            let rect = Rect::new(anchor.0 + ox, anchor.1 + oy, w, h);
            let mut enemy = new_enemy(state, kind, rect, rng);
            enemy.formation = Some(id);
            enemy.offset = (ox, oy);
            formation.members.push(enemy.id);
            state.enemies.push(enemy);
        }
    }

    debug!(
        "spawned formation #{} ({}x{}) at ({}, {})",
        id, cols, rows, anchor.0, anchor.1
    );
    state.formations.push(formation);
    Some(id)
}

/// Lowest edge of any enemy that still belongs to a formation.
fn occupied_bottom(state: &GameState) -> Option<f32> {
    state
        .enemies
        .iter()
        .filter(|e| e.is_alive() && e.formation.is_some())
        .map(|e| e.rect.bottom())
        .reduce(f32::max)
}

pub fn player_bullet(id: EntityId, cx: f32, top: f32, state: &GameState) -> Bullet {
    let w = &state.config.weapons;
    Bullet {
        id,
        rect: Rect::centered_above(cx, top, w.bullet_width, w.bullet_height),
        vx: 0.0,
        vy: -w.bullet_speed,
        owner: BulletOwner::Player,
    }
}

pub fn bomb(id: EntityId, cx: f32, top: f32, state: &GameState) -> Bomb {
    let w = &state.config.weapons;
    Bomb {
        id,
        rect: Rect::centered_above(cx, top, w.bomb_size, w.bomb_size),
        speed: w.bomb_speed,
    }
}

/// Enemy bullet from `origin` toward `target`, aimed once at creation.
/// A zero-length aim vector fires straight down.
pub fn enemy_bullet(
    id: EntityId,
    origin: (f32, f32),
    target: (f32, f32),
    speed: f32,
    state: &GameState,
) -> Bullet {
    let w = &state.config.weapons;
    let dx = target.0 - origin.0;
    let dy = target.1 - origin.1;
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if len > f32::EPSILON { (dx / len, dy / len) } else { (0.0, 1.0) };
    Bullet {
        id,
        rect: Rect::centered_at(origin.0, origin.1, w.bullet_width, w.bullet_height),
        vx: ux * speed,
        vy: uy * speed,
        owner: BulletOwner::Enemy,
    }
}

/// Roll the drop chance and, on success, drop a random power-up at `center`.
pub fn maybe_drop_power_up(state: &mut GameState, center: (f32, f32), rng: &mut impl Rng) -> bool {
    if !rng.gen_bool(state.config.power_up.drop_chance) {
        return false;
    }
    let kind = if rng.gen_bool(0.5) {
        PowerUpKind::DoubleShot
    } else {
        PowerUpKind::BombMode
    };
    let id = state.alloc_id();
    let cfg = &state.config.power_up;
    state.power_ups.push(PowerUp {
        id,
        rect: Rect::centered_at(center.0, center.1, cfg.size, cfg.size),
        kind,
        speed: cfg.fall_speed,
    });
    state.events.push(GameEvent::PowerUpDropped { kind });
    debug!("dropped {:?} power-up at ({}, {})", kind, center.0, center.1);
    true
}

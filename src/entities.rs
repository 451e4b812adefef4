/// All game entity types: pure data, plus the small accessors that keep
/// their invariants (health guards, mutually exclusive power-ups).

use crate::collision::MaskSet;
use crate::config::GameConfig;
use crate::events::GameEvent;

/// Identity shared by every spawned entity. Allocated from
/// `GameState::next_id`, never reused within one game.
pub type EntityId = u64;

/// Handle into `GameState::formations`. Enemies hold this instead of a
/// reference to their formation.
pub type FormationId = u64;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounds in cell units, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect whose horizontal center is `cx` and whose bottom edge is `bottom`.
    pub fn centered_above(cx: f32, bottom: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, bottom - h, w, h)
    }

    pub fn centered_at(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: rects that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Weak,
    Mid,
    Strong,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Weak, EnemyKind::Mid, EnemyKind::Strong];

    pub fn max_health(self) -> i32 {
        match self {
            EnemyKind::Weak => 1,
            EnemyKind::Mid => 2,
            EnemyKind::Strong => 3,
        }
    }

    /// Score awarded when an enemy of this kind is killed.
    pub fn kill_value(self) -> u32 {
        match self {
            EnemyKind::Weak => 10,
            EnemyKind::Mid => 25,
            EnemyKind::Strong => 50,
        }
    }

    /// Visual size in cells (width, height).
    pub fn size(self) -> (f32, f32) {
        match self {
            EnemyKind::Weak => (3.0, 2.0),
            EnemyKind::Mid => (4.0, 2.0),
            EnemyKind::Strong => (5.0, 3.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Every shot fires a second bullet beside the first.
    DoubleShot,
    /// Shots become bombs that splash every enemy within the explosion radius.
    BombMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// "Round N" banner. Simulation is paused until it times out or a key
    /// dismisses it.
    Announcing { round: u32, ticks_left: u32 },
    Playing,
    GameOverMenu,
    Terminated,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    /// At most one power-up is active; picking up another replaces it.
    pub power_up: Option<PowerUpKind>,
    pub alive: bool,
}

impl Player {
    pub fn double_shot(&self) -> bool {
        self.power_up == Some(PowerUpKind::DoubleShot)
    }

    pub fn bomb_mode(&self) -> bool {
        self.power_up == Some(PowerUpKind::BombMode)
    }

    pub fn reset_power_ups(&mut self) {
        self.power_up = None;
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        self.reset_power_ups();
        self.power_up = Some(kind);
    }

    /// Remove one health point. Returns `true` only for the call that takes
    /// health to zero; later calls on a dead player do nothing.
    pub fn reduce_health(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

// ── Projectiles & pickups ─────────────────────────────────────────────────────

/// Straight-line projectile. Player bullets and enemy bullets share the
/// type but live in separate collections.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub id: EntityId,
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub owner: BulletOwner,
}

#[derive(Clone, Debug)]
pub struct Bomb {
    pub id: EntityId,
    pub rect: Rect,
    /// Upward speed in cells per tick.
    pub speed: f32,
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: PowerUpKind,
    /// Downward drift in cells per tick.
    pub speed: f32,
}

// ── Enemies & formations ──────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub health: i32,
    pub value: u32,
    /// Free-fall speed. Unused while attached to a formation.
    pub speed: f32,
    pub formation: Option<FormationId>,
    /// Position relative to the formation anchor.
    pub offset: (f32, f32),
    pub next_fire_frame: u64,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_free(&self) -> bool {
        self.formation.is_none()
    }

    /// Apply damage. Returns `true` for the blow that kills the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= amount;
        !self.is_alive()
    }
}

/// A rigid group of enemies moving laterally as one body.
#[derive(Clone, Debug)]
pub struct Formation {
    pub id: FormationId,
    pub anchor: (f32, f32),
    pub cols: u32,
    pub rows: u32,
    pub spacing: (f32, f32),
    pub direction: Direction,
    pub speed: f32,
    pub members: Vec<EntityId>,
}

// ── Round bookkeeping ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    pub round_number: u32,
    pub kills_this_round: u32,
    pub kill_threshold: u32,
    /// Base free-fall speed for newly rolled enemies. Only ever grows.
    pub enemy_speed_scalar: f32,
    pub total_kills: u32,
    pub score: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so the tick pipeline can return a new
/// copy without mutating the caller's.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub formations: Vec<Formation>,
    /// Player bullets.
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub bombs: Vec<Bomb>,
    pub power_ups: Vec<PowerUp>,
    pub round: RoundState,
    pub status: GameStatus,
    pub frame: u64,
    pub width: u16,
    pub height: u16,
    /// Cell masks for pixel-accurate hits. Kinds without a mask use
    /// bounding boxes.
    pub masks: MaskSet,
    /// Everything that happened during the last tick.
    pub events: Vec<GameEvent>,
    pub config: GameConfig,
    pub next_id: EntityId,
}

impl GameState {
    pub fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn screen_width(&self) -> f32 {
        f32::from(self.width)
    }

    pub fn screen_height(&self) -> f32 {
        f32::from(self.height)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id)
    }

    pub fn free_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_free()).count()
    }

    /// Every live entity, as a closed set of tagged variants.
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        let player = Some(&self.player)
            .filter(|p| p.alive)
            .map(EntityRef::Player);
        player
            .into_iter()
            .chain(self.enemies.iter().map(EntityRef::Enemy))
            .chain(self.power_ups.iter().map(EntityRef::PowerUp))
            .chain(self.bombs.iter().map(EntityRef::Bomb))
            .chain(self.bullets.iter().map(EntityRef::Bullet))
            .chain(self.enemy_bullets.iter().map(EntityRef::EnemyBullet))
    }
}

/// Borrowed view of one live entity.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
    Player(&'a Player),
    Enemy(&'a Enemy),
    PowerUp(&'a PowerUp),
    Bomb(&'a Bomb),
    Bullet(&'a Bullet),
    EnemyBullet(&'a Bullet),
}

impl EntityRef<'_> {
    pub fn rect(&self) -> Rect {
        match self {
            EntityRef::Player(p) => p.rect,
            EntityRef::Enemy(e) => e.rect,
            EntityRef::PowerUp(p) => p.rect,
            EntityRef::Bomb(b) => b.rect,
            EntityRef::Bullet(b) | EntityRef::EnemyBullet(b) => b.rect,
        }
    }
}

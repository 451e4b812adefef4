use formation_shooter::collision::MaskSet;
use formation_shooter::combat;
use formation_shooter::compute::tick;
use formation_shooter::director;
use formation_shooter::entities::*;
use formation_shooter::events::GameEvent;
use formation_shooter::GameConfig;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.enemy.free_count = 0;
    config.enemy.fire_probability = 0.0;
    config.power_up.drop_chance = 0.0;
    config
}

/// Empty 80x24 field, player at (37, 20) size 5x3.
fn make_state(config: GameConfig) -> GameState {
    let mut s = director::new_game(config, 80, 24, MaskSet::default(), &mut seeded_rng());
    s.enemies.clear();
    s.formations.clear();
    s.status = GameStatus::Playing;
    s
}

fn push_enemy(s: &mut GameState, kind: EnemyKind, rect: Rect) -> EntityId {
    let id = s.alloc_id();
    s.enemies.push(Enemy {
        id,
        kind,
        rect,
        health: kind.max_health(),
        value: kind.kill_value(),
        speed: 0.0,
        formation: None,
        offset: (0.0, 0.0),
        next_fire_frame: u64::MAX,
    });
    id
}

fn push_bullet(s: &mut GameState, x: f32, y: f32) {
    let id = s.alloc_id();
    s.bullets.push(Bullet {
        id,
        rect: Rect::new(x, y, 1.0, 1.0),
        vx: 0.0,
        vy: -1.0,
        owner: BulletOwner::Player,
    });
}

fn push_bomb(s: &mut GameState, cx: f32, cy: f32) {
    let id = s.alloc_id();
    s.bombs.push(Bomb {
        id,
        rect: Rect::centered_at(cx, cy, 2.0, 2.0),
        speed: 0.6,
    });
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ── Bullets vs enemies ────────────────────────────────────────────────────────

#[test]
fn bullet_hit_damages_enemy_and_is_spent() {
    let mut s = make_state(quiet_config());
    let id = push_enemy(&mut s, EnemyKind::Mid, Rect::new(10.0, 5.0, 4.0, 2.0));
    push_bullet(&mut s, 11.0, 5.5);
    combat::bullets_vs_enemies(&mut s, &mut seeded_rng());

    assert!(s.bullets.is_empty());
    assert_eq!(s.enemy(id).map(|e| e.health), Some(1));
    assert_eq!(s.round.kills_this_round, 0);
}

#[test]
fn second_bullet_on_a_fresh_kill_is_spent_too() {
    let mut s = make_state(quiet_config());
    let id = push_enemy(&mut s, EnemyKind::Weak, Rect::new(10.0, 5.0, 3.0, 2.0));
    push_bullet(&mut s, 10.0, 5.0);
    push_bullet(&mut s, 12.0, 6.0);
    combat::bullets_vs_enemies(&mut s, &mut seeded_rng());

    assert!(s.bullets.is_empty());
    assert!(s.enemy(id).is_none());
    assert_eq!(s.round.kills_this_round, 1);
    assert_eq!(
        count(&s.events, |e| matches!(e, GameEvent::EnemyKilled { .. })),
        1
    );
}

#[test]
fn one_bullet_damages_every_enemy_it_overlaps() {
    let mut s = make_state(quiet_config());
    let a = push_enemy(&mut s, EnemyKind::Strong, Rect::new(10.0, 5.0, 5.0, 3.0));
    let b = push_enemy(&mut s, EnemyKind::Strong, Rect::new(11.0, 5.0, 5.0, 3.0));
    push_bullet(&mut s, 12.0, 6.0);
    combat::bullets_vs_enemies(&mut s, &mut seeded_rng());

    assert!(s.bullets.is_empty());
    assert_eq!(s.enemy(a).map(|e| e.health), Some(2));
    assert_eq!(s.enemy(b).map(|e| e.health), Some(2));
}

#[test]
fn missed_bullet_keeps_flying() {
    let mut s = make_state(quiet_config());
    push_enemy(&mut s, EnemyKind::Weak, Rect::new(10.0, 5.0, 3.0, 2.0));
    push_bullet(&mut s, 13.0, 5.0); // touches the right edge only
    combat::bullets_vs_enemies(&mut s, &mut seeded_rng());
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn kill_is_credited_and_replaced() {
    let mut s = make_state(quiet_config());
    let id = push_enemy(&mut s, EnemyKind::Weak, Rect::new(10.0, 5.0, 3.0, 2.0));
    push_bullet(&mut s, 11.0, 5.0);
    combat::bullets_vs_enemies(&mut s, &mut seeded_rng());

    assert!(s.enemy(id).is_none());
    assert_eq!(s.round.kills_this_round, 1);
    assert_eq!(s.round.score, 10);
    assert_eq!(s.enemies.len(), 1, "a replacement spawns above the screen");
    assert!(s.enemies[0].rect.bottom() <= 0.0);
    assert_eq!(
        s.events,
        vec![GameEvent::EnemyKilled {
            id,
            kind: EnemyKind::Weak,
            value: 10
        }]
    );
}

#[test]
fn guaranteed_drop_spawns_power_up_at_kill_site() {
    let mut config = quiet_config();
    config.power_up.drop_chance = 1.0;
    let mut s = make_state(config);
    push_enemy(&mut s, EnemyKind::Weak, Rect::new(10.0, 5.0, 3.0, 2.0));
    push_bullet(&mut s, 11.0, 5.0);
    combat::bullets_vs_enemies(&mut s, &mut seeded_rng());

    assert_eq!(s.power_ups.len(), 1);
    assert_eq!(s.power_ups[0].rect.center(), (11.5, 6.0));
    assert_eq!(
        count(&s.events, |e| matches!(e, GameEvent::PowerUpDropped { .. })),
        1
    );
}

// ── Bombs ─────────────────────────────────────────────────────────────────────

#[test]
fn bomb_splash_radius_is_inclusive() {
    let mut config = quiet_config();
    config.round.kill_threshold = 10;
    let mut s = make_state(config);

    let touched = push_enemy(&mut s, EnemyKind::Weak, Rect::new(19.0, 9.0, 3.0, 2.0));
    let edge = push_enemy(&mut s, EnemyKind::Strong, Rect::centered_at(28.0, 10.0, 5.0, 3.0));
    let outside = push_enemy(&mut s, EnemyKind::Strong, Rect::centered_at(28.5, 10.0, 5.0, 3.0));
    push_bomb(&mut s, 20.0, 10.0);

    combat::bombs_vs_enemies(&mut s, &mut seeded_rng());

    assert!(s.bombs.is_empty());
    assert!(s.enemy(touched).is_none());
    assert_eq!(s.enemy(edge).map(|e| e.health), Some(1)); // exactly 8 away
    assert_eq!(s.enemy(outside).map(|e| e.health), Some(3));
    assert_eq!(s.round.kills_this_round, 1);
    assert!(s
        .events
        .contains(&GameEvent::BombDetonated { x: 20.0, y: 10.0, hits: 2 }));
}

#[test]
fn bomb_without_contact_keeps_flying() {
    let mut s = make_state(quiet_config());
    let id = push_enemy(&mut s, EnemyKind::Strong, Rect::centered_at(24.0, 10.0, 5.0, 3.0));
    push_bomb(&mut s, 15.0, 10.0); // within radius, but not touching
    combat::bombs_vs_enemies(&mut s, &mut seeded_rng());

    assert_eq!(s.bombs.len(), 1);
    assert_eq!(s.enemy(id).map(|e| e.health), Some(3));
}

// ── Enemies vs player ─────────────────────────────────────────────────────────

#[test]
fn crash_costs_health_without_kill_credit() {
    let mut s = make_state(quiet_config());
    let id = push_enemy(&mut s, EnemyKind::Weak, Rect::new(38.0, 19.0, 3.0, 2.0));
    combat::enemies_vs_player(&mut s, &mut seeded_rng());

    assert!(s.enemy(id).is_none());
    assert_eq!(s.player.health, 2);
    assert_eq!(s.round.kills_this_round, 0);
    assert_eq!(s.enemies.len(), 1, "replacement spawned");
    assert_eq!(
        s.events,
        vec![
            GameEvent::EnemyCrashed { id },
            GameEvent::PlayerHit { health: 2 }
        ]
    );
}

#[test]
fn crashing_formation_member_leaves_its_formation() {
    let mut s = make_state(quiet_config());
    let id = push_enemy(&mut s, EnemyKind::Weak, Rect::new(38.0, 19.0, 3.0, 2.0));
    s.enemies[0].formation = Some(500);
    s.formations.push(Formation {
        id: 500,
        anchor: (38.0, 19.0),
        cols: 1,
        rows: 1,
        spacing: (7.0, 3.0),
        direction: Direction::Right,
        speed: 0.25,
        members: vec![id],
    });
    combat::enemies_vs_player(&mut s, &mut seeded_rng());

    assert!(s.formations.is_empty());
    assert!(s.events.contains(&GameEvent::FormationCleared { id: 500 }));
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn collecting_power_up_replaces_active_one() {
    let mut s = make_state(quiet_config());
    s.player.apply_power_up(PowerUpKind::DoubleShot);
    let id = s.alloc_id();
    s.power_ups.push(PowerUp {
        id,
        rect: Rect::new(39.0, 21.0, 1.0, 1.0),
        kind: PowerUpKind::BombMode,
        speed: 0.2,
    });
    combat::power_ups_vs_player(&mut s);

    assert!(s.power_ups.is_empty());
    assert!(s.player.bomb_mode());
    assert!(!s.player.double_shot());
    assert_eq!(
        s.events,
        vec![GameEvent::PowerUpCollected {
            kind: PowerUpKind::BombMode
        }]
    );
}

// ── Enemy bullets ─────────────────────────────────────────────────────────────

#[test]
fn enemy_bullet_hit_costs_one_health() {
    let mut s = make_state(quiet_config());
    let id = s.alloc_id();
    s.enemy_bullets.push(Bullet {
        id,
        rect: Rect::new(39.0, 21.0, 1.0, 1.0),
        vx: 0.0,
        vy: 0.5,
        owner: BulletOwner::Enemy,
    });
    combat::enemy_bullets_vs_player(&mut s);

    assert!(s.enemy_bullets.is_empty());
    assert_eq!(s.player.health, 2);
    assert_eq!(s.events, vec![GameEvent::PlayerHit { health: 2 }]);
}

// ── Whole ticks ───────────────────────────────────────────────────────────────

#[test]
fn formation_wiped_out_in_one_tick() {
    let mut config = GameConfig::default();
    config.enemy.free_count = 0;
    config.enemy.fire_probability = 0.0;
    let mut s = make_state(config);

    let fid = s.alloc_id();
    let a = push_enemy(&mut s, EnemyKind::Weak, Rect::new(10.0, 5.0, 3.0, 2.0));
    let b = push_enemy(&mut s, EnemyKind::Weak, Rect::new(17.0, 5.0, 3.0, 2.0));
    for (enemy, offset) in s.enemies.iter_mut().zip([0.0, 7.0]) {
        enemy.formation = Some(fid);
        enemy.offset = (offset, 0.0);
    }
    s.formations.push(Formation {
        id: fid,
        anchor: (10.0, 5.0),
        cols: 2,
        rows: 1,
        spacing: (7.0, 3.0),
        direction: Direction::Right,
        speed: 0.0,
        members: vec![a, b],
    });
    // Both bullets reach their target after moving one cell up.
    push_bullet(&mut s, 11.0, 6.5);
    push_bullet(&mut s, 18.0, 6.5);

    let s2 = tick(&s, &mut seeded_rng());

    assert_eq!(s2.round.kills_this_round, 2);
    assert!(s2.bullets.is_empty());
    assert!(s2.enemy(a).is_none() && s2.enemy(b).is_none());
    assert!(s2.formation(fid).is_none());
    assert!(s2.power_ups.len() <= 2);
    assert_eq!(
        count(&s2.events, |e| matches!(e, GameEvent::EnemyKilled { .. })),
        2
    );
    assert!(s2.events.contains(&GameEvent::FormationCleared { id: fid }));

    // Same seed, same drops.
    let again = tick(&s, &mut seeded_rng());
    assert_eq!(again.power_ups.len(), s2.power_ups.len());
}

#[test]
fn simultaneous_crashes_end_the_game_once() {
    let mut s = make_state(quiet_config());
    s.player.health = 1;
    push_enemy(&mut s, EnemyKind::Weak, Rect::new(37.0, 20.0, 3.0, 2.0));
    push_enemy(&mut s, EnemyKind::Weak, Rect::new(39.0, 21.0, 3.0, 2.0));

    let s2 = tick(&s, &mut seeded_rng());

    assert_eq!(count(&s2.events, |e| *e == GameEvent::GameOver), 1);
    assert_eq!(
        count(&s2.events, |e| matches!(e, GameEvent::EnemyCrashed { .. })),
        2
    );
    assert_eq!(s2.status, GameStatus::GameOverMenu);
    assert_eq!(s2.player.health, 0);
    assert!(!s2.player.alive);

    // The menu freezes the world; no further game-over events.
    let s3 = tick(&s2, &mut seeded_rng());
    assert!(s3.events.is_empty());
}

#[test]
fn enemy_bullet_after_death_is_absorbed() {
    let mut s = make_state(quiet_config());
    s.player.health = 1;
    for _ in 0..2 {
        let id = s.alloc_id();
        s.enemy_bullets.push(Bullet {
            id,
            rect: Rect::new(39.0, 21.0, 1.0, 1.0),
            vx: 0.0,
            vy: 0.0,
            owner: BulletOwner::Enemy,
        });
    }
    combat::enemy_bullets_vs_player(&mut s);

    assert_eq!(s.events, vec![GameEvent::GameOver]);
    assert_eq!(s.player.health, 0);
}

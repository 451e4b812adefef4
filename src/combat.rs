//! Collision & combat resolution.
//!
//! Runs once per tick after every position is final. The steps run in a
//! fixed order so kill counting and spawning are consistent:
//!
//! 1. player bullets × enemies (cell masks)
//! 2. bombs × enemies (contact, then radius splash)
//! 3. enemies × player
//! 4. power-ups × player
//! 5. enemy bullets × player
//!
//! Each step only records what it hit while iterating; removals, kills and
//! spawns are applied after the pass.

use log::debug;
use rand::Rng;

use crate::collision::{masks_overlap, within_radius};
use crate::director;
use crate::entities::{EntityId, FormationId, GameState};
use crate::events::GameEvent;
use crate::formation;
use crate::spawn;

pub fn resolve(state: &mut GameState, rng: &mut impl Rng) {
    bullets_vs_enemies(state, rng);
    director::check_escalation(state, rng);

    bombs_vs_enemies(state, rng);
    director::check_escalation(state, rng);

    enemies_vs_player(state, rng);
    power_ups_vs_player(state);
    enemy_bullets_vs_player(state);
}

/// Step 1. Every overlapping (bullet, enemy) pair deals one damage; a
/// bullet is spent once however many enemies it overlaps. Enemies killed
/// earlier in the same pass still stop bullets until the flush.
pub fn bullets_vs_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let mut spent: Vec<EntityId> = Vec::new();
    let mut killed: Vec<EntityId> = Vec::new();

    for bullet in &state.bullets {
        let mut hit = false;
        for enemy in state.enemies.iter_mut() {
            if !(enemy.is_alive() || killed.contains(&enemy.id)) {
                continue;
            }
            if !masks_overlap(&bullet.rect, None, &enemy.rect, state.masks.enemy(enemy.kind)) {
                continue;
            }
            hit = true;
            if enemy.is_alive() && enemy.take_damage(1) {
                killed.push(enemy.id);
            }
        }
        if hit {
            spent.push(bullet.id);
        }
    }

    if spent.is_empty() {
        return;
    }
    state.bullets.retain(|b| !spent.contains(&b.id));
    for id in killed {
        credit_kill(state, id, rng);
    }
    flush_dead_enemies(state);
}

/// Step 2. A bomb touching any enemy detonates and damages every enemy
/// whose center lies within the explosion radius of the bomb's center.
pub fn bombs_vs_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let radius = state.config.weapons.explosion_radius;
    let damage = state.config.weapons.splash_damage;
    let mut spent: Vec<EntityId> = Vec::new();
    let mut killed: Vec<EntityId> = Vec::new();

    for bomb in &state.bombs {
        let contact = state
            .enemies
            .iter()
            .any(|e| e.is_alive() && bomb.rect.overlaps(&e.rect));
        if !contact {
            continue;
        }
        spent.push(bomb.id);

        let center = bomb.rect.center();
        let mut hits = 0;
        for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
            if within_radius(center, enemy.rect.center(), radius) {
                hits += 1;
                if enemy.take_damage(damage) {
                    killed.push(enemy.id);
                }
            }
        }
        debug!("bomb #{} detonated at {:?}, {} enemies in radius", bomb.id, center, hits);
        state.events.push(GameEvent::BombDetonated {
            x: center.0,
            y: center.1,
            hits,
        });
    }

    if spent.is_empty() {
        return;
    }
    state.bombs.retain(|b| !spent.contains(&b.id));
    for id in killed {
        credit_kill(state, id, rng);
    }
    flush_dead_enemies(state);
}

/// Step 3. Ramming the player destroys the enemy outright and costs one
/// health point. No kill credit; a replacement takes its place.
pub fn enemies_vs_player(state: &mut GameState, rng: &mut impl Rng) {
    if !state.player.alive {
        return;
    }
    let player_rect = state.player.rect;
    let mut crashed: Vec<EntityId> = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        let enemy_mask = state.masks.enemy(enemy.kind);
        if masks_overlap(&player_rect, state.masks.player.as_ref(), &enemy.rect, enemy_mask) {
            enemy.health = 0;
            crashed.push(enemy.id);
        }
    }

    if crashed.is_empty() {
        return;
    }
    flush_dead_enemies(state);
    for id in crashed {
        state.events.push(GameEvent::EnemyCrashed { id });
        damage_player(state);
        spawn::spawn_free_enemy(state, rng);
    }
}

/// Step 4. Picking up a power-up replaces whatever was active.
pub fn power_ups_vs_player(state: &mut GameState) {
    if !state.player.alive {
        return;
    }
    let player_rect = state.player.rect;
    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if p.rect.overlaps(&player_rect) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        state.player.apply_power_up(kind);
        debug!("player picked up {:?}", kind);
        state.events.push(GameEvent::PowerUpCollected { kind });
    }
}

/// Step 5. Each enemy bullet touching the player is spent and costs one
/// health point.
pub fn enemy_bullets_vs_player(state: &mut GameState) {
    if !state.player.alive {
        return;
    }
    let player_rect = state.player.rect;
    let player_mask = state.masks.player.as_ref();
    let before = state.enemy_bullets.len();
    state
        .enemy_bullets
        .retain(|b| !masks_overlap(&b.rect, None, &player_rect, player_mask));
    let hits = before - state.enemy_bullets.len();
    for _ in 0..hits {
        damage_player(state);
    }
}

/// Take one health point from the player. The hit that empties health
/// triggers the game-over transition; later hits in the same tick are
/// absorbed by `Player::reduce_health`.
fn damage_player(state: &mut GameState) {
    if state.player.reduce_health() {
        director::enter_game_over(state);
    } else if state.player.alive {
        state.events.push(GameEvent::PlayerHit {
            health: state.player.health,
        });
    }
}

/// Kill bookkeeping for an enemy that just dropped to zero health: round
/// counters, power-up roll, and a replacement while the round is still on.
fn credit_kill(state: &mut GameState, id: EntityId, rng: &mut impl Rng) {
    let Some(enemy) = state.enemy(id) else {
        return;
    };
    let (kind, value, center) = (enemy.kind, enemy.value, enemy.rect.center());

    state.round.record_kill(value);
    state.events.push(GameEvent::EnemyKilled { id, kind, value });
    debug!(
        "enemy #{id} ({kind:?}) killed, {}/{} this round",
        state.round.kills_this_round, state.round.kill_threshold
    );

    spawn::maybe_drop_power_up(state, center, rng);
    if !state.round.threshold_reached() {
        spawn::spawn_free_enemy(state, rng);
    }
}

/// Remove every enemy at zero health, deregistering formation members
/// first.
fn flush_dead_enemies(state: &mut GameState) {
    let dead: Vec<(EntityId, Option<FormationId>)> = state
        .enemies
        .iter()
        .filter(|e| !e.is_alive())
        .map(|e| (e.id, e.formation))
        .collect();
    if dead.is_empty() {
        return;
    }
    formation::prune_formations(state, &dead);
    state.enemies.retain(|e| e.is_alive());
}

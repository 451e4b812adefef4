//! One-tick motion for everything that moves on its own: bullets, bombs,
//! power-ups and free-roaming enemies. Formation members are moved by
//! `formation::update_formations` instead.

use rand::Rng;

use crate::entities::{Bomb, Bullet, GameState, PowerUp, Rect};
use crate::spawn;

/// True once no part of `rect` is inside the screen.
pub fn is_off_screen(rect: &Rect, width: f32, height: f32) -> bool {
    rect.right() < 0.0 || rect.x > width || rect.bottom() < 0.0 || rect.y > height
}

/// Move bullets along their velocity and drop the ones that left the screen.
pub fn advance_bullets(bullets: &mut Vec<Bullet>, width: f32, height: f32) {
    for bullet in bullets.iter_mut() {
        bullet.rect.x += bullet.vx;
        bullet.rect.y += bullet.vy;
    }
    bullets.retain(|b| !is_off_screen(&b.rect, width, height));
}

/// Bombs only travel upward.
pub fn advance_bombs(bombs: &mut Vec<Bomb>, width: f32, height: f32) {
    for bomb in bombs.iter_mut() {
        bomb.rect.y -= bomb.speed;
    }
    bombs.retain(|b| !is_off_screen(&b.rect, width, height));
}

pub fn advance_power_ups(power_ups: &mut Vec<PowerUp>, width: f32, height: f32) {
    for power_up in power_ups.iter_mut() {
        power_up.rect.y += power_up.speed;
    }
    power_ups.retain(|p| !is_off_screen(&p.rect, width, height));
}

/// Free-roaming enemies fall straight down; those that pass the bottom edge
/// are recycled to the top instead of being destroyed.
pub fn advance_free_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let width = state.screen_width();
    let height = state.screen_height();
    let scalar = state.round.enemy_speed_scalar;
    let jitter = state.config.enemy.speed_jitter;

    for enemy in state.enemies.iter_mut().filter(|e| e.is_free()) {
        enemy.rect.y += enemy.speed;
        if enemy.rect.y > height {
            spawn::recycle_enemy(enemy, width, scalar, jitter, rng);
        }
    }
}

/// Advance every self-propelled entity one tick.
pub fn advance_all(state: &mut GameState, rng: &mut impl Rng) {
    let width = state.screen_width();
    let height = state.screen_height();
    advance_bullets(&mut state.bullets, width, height);
    advance_bullets(&mut state.enemy_bullets, width, height);
    advance_bombs(&mut state.bombs, width, height);
    advance_power_ups(&mut state.power_ups, width, height);
    advance_free_enemies(state, rng);
}

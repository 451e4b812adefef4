//! Enemy fire control.
//!
//! Every enemy owns a fire timer. When it elapses the enemy rolls the fire
//! probability once, shoots only on success, and always draws a new
//! interval. The interval bounds the fire rate however many enemies are
//! on screen.

use log::trace;
use rand::Rng;

use crate::entities::GameState;
use crate::spawn;

/// Run the fire timer of every live, visible enemy for the current frame.
pub fn run_fire_control(state: &mut GameState, rng: &mut impl Rng) {
    if !state.player.alive {
        return;
    }
    let target = state.player.rect.center();
    let frame = state.frame;
    let probability = state.config.enemy.fire_probability;
    let (interval_min, interval_max) = (
        state.config.enemy.fire_interval_min,
        state.config.enemy.fire_interval_max,
    );

    let mut muzzles: Vec<(f32, f32)> = Vec::new();
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        // Enemies still above the top edge hold fire.
        if enemy.rect.bottom() <= 0.0 || frame < enemy.next_fire_frame {
            continue;
        }
        if rng.gen_bool(probability) {
            let (cx, _) = enemy.rect.center();
            muzzles.push((cx, enemy.rect.bottom()));
        }
        enemy.next_fire_frame = frame + rng.gen_range(interval_min..=interval_max);
    }

    let (speed_min, speed_max) = (
        state.config.weapons.enemy_bullet_speed_min,
        state.config.weapons.enemy_bullet_speed_max,
    );
    for origin in muzzles {
        let speed = rng.gen_range(speed_min..=speed_max);
        let id = state.alloc_id();
        let bullet = spawn::enemy_bullet(id, origin, target, speed, state);
        trace!("enemy bullet #{id} from {origin:?} toward {target:?}");
        state.enemy_bullets.push(bullet);
    }
}

//! Formation choreography: a rigid group of enemies ping-ponging sideways.

use log::debug;

use crate::entities::{Direction, Enemy, EntityId, Formation, FormationId, GameState};
use crate::events::GameEvent;

impl Formation {
    /// Offset of the grid slot at (`col`, `row`) from the anchor.
    pub fn slot_offset(&self, col: u32, row: u32) -> (f32, f32) {
        (col as f32 * self.spacing.0, row as f32 * self.spacing.1)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Leftmost and rightmost occupied column relative to the anchor, or
    /// `None` when no member is left.
    pub fn extent(&self, enemies: &[Enemy]) -> Option<(f32, f32)> {
        enemies
            .iter()
            .filter(|e| e.formation == Some(self.id) && self.members.contains(&e.id))
            .map(|e| (e.offset.0, e.offset.0 + e.rect.w))
            .reduce(|(l0, r0), (l1, r1)| (l0.min(l1), r0.max(r1)))
    }

    /// Turn around at the margins, then move the anchor one step.
    /// Returns `true` when the direction flipped this tick.
    pub fn step(&mut self, extent: Option<(f32, f32)>, screen_width: f32, margin: f32) -> bool {
        let Some((left, right)) = extent else {
            return false;
        };
        let flip = match self.direction {
            Direction::Right => self.anchor.0 + right >= screen_width - margin,
            Direction::Left => self.anchor.0 + left <= margin,
        };
        if flip {
            self.direction = self.direction.reversed();
        }
        self.anchor.0 += self.direction.sign() * self.speed;
        flip
    }

    /// Write every member's absolute position from the anchor.
    pub fn place_members(&self, enemies: &mut [Enemy]) {
        for enemy in enemies.iter_mut().filter(|e| e.formation == Some(self.id)) {
            enemy.rect.x = self.anchor.0 + enemy.offset.0;
            enemy.rect.y = self.anchor.1 + enemy.offset.1;
        }
    }

    /// Drop a member without touching the others' offsets.
    pub fn remove_member(&mut self, id: EntityId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != id);
        self.members.len() != before
    }
}

/// Advance every formation one tick and reposition its members.
pub fn update_formations(state: &mut GameState) {
    let width = state.screen_width();
    let margin = state.config.formation.margin;
    for formation in &mut state.formations {
        let extent = formation.extent(&state.enemies);
        if formation.step(extent, width, margin) {
            debug!("formation #{} turned {:?}", formation.id, formation.direction);
        }
        formation.place_members(&mut state.enemies);
    }
}

/// Deregister dead enemies from their formations, then drop formations
/// that have no members left.
pub fn prune_formations(state: &mut GameState, dead: &[(EntityId, Option<FormationId>)]) {
    for &(id, formation_id) in dead {
        let Some(fid) = formation_id else { continue };
        if let Some(formation) = state.formations.iter_mut().find(|f| f.id == fid) {
            formation.remove_member(id);
        }
    }

    let cleared: Vec<FormationId> = state
        .formations
        .iter()
        .filter(|f| f.is_empty())
        .map(|f| f.id)
        .collect();
    if cleared.is_empty() {
        return;
    }
    state.formations.retain(|f| !f.is_empty());
    for id in cleared {
        debug!("formation #{id} cleared");
        state.events.push(GameEvent::FormationCleared { id });
    }
}

//! Sword hit resolution.

use glam::Vec2;
use swordplay_sim::{ConnectionIndex, Facing, sword_bounds};

use crate::actor_table::ActorTable;

/// Outcome of one victim being struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub victim: ConnectionIndex,
    pub position: Vec2,
    pub facing: Facing,
    pub health: f32,
}

impl Hit {
    /// Health at or below zero means the host announces a destroy.
    pub fn is_lethal(&self) -> bool {
        self.health <= 0.0
    }
}

/// Strike every other player whose visual bounds overlap the sword placed at
/// `sword_position`.
///
/// Each victim is pushed along the attacker-to-victim line until it sits as
/// far from the attacker as the sword does, then loses `damage` health.
/// Returns hits in ascending slot order. An unknown attacker hits nothing.
pub fn resolve_sword_hit(
    actors: &mut ActorTable,
    attacker: ConnectionIndex,
    sword_position: Vec2,
    damage: f32,
) -> Vec<Hit> {
    let Some(attacking) = actors.player(attacker) else {
        return Vec::new();
    };
    let attacker_position = attacking.entity.position;
    let attacker_facing = attacking.facing;
    let blade = sword_bounds(sword_position);
    let reach = sword_position.distance(attacker_position);

    let victims: Vec<ConnectionIndex> = actors
        .players()
        .filter(|(slot, p)| *slot != attacker && blade.intersects(&p.entity.visual_bounds()))
        .map(|(slot, _)| slot)
        .collect();

    let mut hits = Vec::with_capacity(victims.len());
    for slot in victims {
        let Some(victim) = actors.player_mut(slot) else {
            continue;
        };
        let away = (victim.entity.position - attacker_position)
            .try_normalize()
            .unwrap_or_else(|| attacker_facing.direction());
        victim.entity.position = attacker_position + away * reach;
        victim.entity.health -= damage;
        hits.push(Hit {
            victim: slot,
            position: victim.entity.position,
            facing: victim.facing,
            health: victim.entity.health,
        });
    }
    hits
}

//! Entity spawner
//!
//! Fires every `spawn_interval_ticks`, rolling kind first and lane second.
//! The RNG is passed in so a seeded generator replays the same traffic.

use rand::Rng;

use super::state::{Entity, EntityKind};
use crate::config::GameConfig;

/// Hands out entity IDs; IDs are never reused
#[derive(Debug, Clone)]
pub struct Spawner {
    next_id: u64,
}

impl Default for Spawner {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity at the entry edge if `tick` is on the cadence
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tick: u64,
        config: &GameConfig,
    ) -> Option<Entity> {
        if tick % config.spawn_interval_ticks as u64 != 0 {
            return None;
        }

        let kind = if rng.random_bool(config.reward_probability) {
            EntityKind::Reward
        } else {
            EntityKind::Hazard
        };
        let lane = rng.random_range(0..config.lane_count);

        let id = self.next_id;
        self.next_id += 1;

        Some(Entity {
            id,
            lane,
            travel: 0.0,
            kind,
        })
    }
}

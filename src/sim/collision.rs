//! Collision detection between the car and lane traffic
//!
//! Boxes live in track space: x is travel, y is across the lanes. Only
//! lane-mates are tested, and at most one collision resolves per tick: the
//! first overlapping entity in spawn order. Anything else still overlapping
//! gets its turn next tick.

use glam::Vec2;

use super::state::Entity;
use crate::config::GameConfig;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Separating-axis test; touching edges count as overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// Across-axis centre of a lane
#[inline]
fn lane_center(lane: u32, config: &GameConfig) -> f32 {
    lane as f32 * config.lane_width
}

/// The car's collision box in `lane`, offset included
pub fn player_box(lane: u32, config: &GameConfig) -> Aabb {
    let center = Vec2::new(config.player_position, lane_center(lane, config));
    Aabb::from_center(center + config.collision_offset, config.player_half_extents)
}

pub fn entity_box(entity: &Entity, config: &GameConfig) -> Aabb {
    let center = Vec2::new(entity.travel, lane_center(entity.lane, config));
    Aabb::from_center(center, config.entity_half_extents)
}

/// Index of the first lane-mate overlapping the car, in spawn order
pub fn first_overlap(lane: u32, entities: &[Entity], config: &GameConfig) -> Option<usize> {
    let player = player_box(lane, config);
    entities
        .iter()
        .position(|e| e.lane == lane && player.overlaps(&entity_box(e, config)))
}

/// Resolve at most one collision: remove and return the first overlapping
/// lane-mate
pub fn detect(lane: u32, entities: &mut Vec<Entity>, config: &GameConfig) -> Option<Entity> {
    first_overlap(lane, entities, config).map(|idx| entities.remove(idx))
}

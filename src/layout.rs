//! Orientation adapter
//!
//! The simulation only knows `(lane, travel)`. This module maps those onto the
//! screen for the two supported layouts and maps raw input back onto lanes:
//! - `TravelHorizontal`: desktop, lanes stacked top to bottom, traffic flows
//!   right to left toward a car parked near the left edge
//! - `TravelVertical`: mobile, lanes side by side, traffic falls from the top
//!   toward a car near the bottom

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Steer;

/// Desktop: y of the first lane centre
pub const FIRST_LANE_Y: f32 = 80.0;
/// Desktop: vertical distance between lane centres
pub const LANE_SPACING_Y: f32 = 60.0;
/// Desktop: fixed x of the car
pub const CAR_X: f32 = 100.0;
/// Entities are culled this far past the visible edge
pub const OFFSCREEN_MARGIN: f32 = 50.0;
/// Mobile: distance from the bottom edge to the car
pub const CAR_BOTTOM_INSET: f32 = 180.0;
/// Mobile: entities are culled this far past the car
pub const CULL_PAST_CAR: f32 = 100.0;

/// Which screen axis the traffic travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutMode {
    #[default]
    TravelHorizontal,
    TravelVertical,
}

/// Visible play area in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Travel-space geometry derived from a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Travel position of the cull boundary
    pub length: f32,
    /// Travel position of the car
    pub player_position: f32,
}

/// Raw directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Screen mapping for one orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub mode: LayoutMode,
    pub lane_count: u32,
    pub viewport: Viewport,
}

impl Layout {
    pub fn new(mode: LayoutMode, lane_count: u32, viewport: Viewport) -> Self {
        Self {
            mode,
            lane_count: lane_count.max(1),
            viewport,
        }
    }

    /// Across-axis screen coordinate of a lane centre
    pub fn lane_coordinate(&self, lane: u32) -> f32 {
        match self.mode {
            LayoutMode::TravelHorizontal => FIRST_LANE_Y + lane as f32 * LANE_SPACING_Y,
            LayoutMode::TravelVertical => {
                self.viewport.width * (lane as f32 + 0.5) / self.lane_count as f32
            }
        }
    }

    /// Along-axis screen coordinate where entities appear
    pub fn spawn_edge_coordinate(&self) -> f32 {
        match self.mode {
            LayoutMode::TravelHorizontal => self.viewport.width,
            LayoutMode::TravelVertical => -OFFSCREEN_MARGIN,
        }
    }

    /// Along-axis screen coordinate of the car
    pub fn player_fixed_coordinate(&self) -> f32 {
        match self.mode {
            LayoutMode::TravelHorizontal => CAR_X,
            LayoutMode::TravelVertical => self.viewport.height - CAR_BOTTOM_INSET,
        }
    }

    /// Along-axis screen coordinate past which entities are gone
    pub fn cull_coordinate(&self) -> f32 {
        match self.mode {
            LayoutMode::TravelHorizontal => -OFFSCREEN_MARGIN,
            LayoutMode::TravelVertical => self.player_fixed_coordinate() + CULL_PAST_CAR,
        }
    }

    /// +1 if travel grows with the screen coordinate, -1 if it shrinks
    #[inline]
    fn travel_sign(&self) -> f32 {
        match self.mode {
            LayoutMode::TravelHorizontal => -1.0,
            LayoutMode::TravelVertical => 1.0,
        }
    }

    /// Along-axis screen coordinate for a travel position
    pub fn along_coordinate(&self, travel: f32) -> f32 {
        self.spawn_edge_coordinate() + self.travel_sign() * travel
    }

    /// Travel position for an along-axis screen coordinate
    pub fn travel_at(&self, along: f32) -> f32 {
        (along - self.spawn_edge_coordinate()) * self.travel_sign()
    }

    /// Travel geometry for `GameConfig::with_track`
    pub fn track(&self) -> Track {
        Track {
            length: self.travel_at(self.cull_coordinate()),
            player_position: self.travel_at(self.player_fixed_coordinate()),
        }
    }

    fn to_screen(&self, across: f32, along: f32) -> Vec2 {
        match self.mode {
            LayoutMode::TravelHorizontal => Vec2::new(along, across),
            LayoutMode::TravelVertical => Vec2::new(across, along),
        }
    }

    /// Screen centre of the car in a lane
    pub fn player_screen_position(&self, lane: u32) -> Vec2 {
        self.to_screen(self.lane_coordinate(lane), self.player_fixed_coordinate())
    }

    /// Screen centre of an entity
    pub fn entity_screen_position(&self, lane: u32, travel: f32) -> Vec2 {
        self.to_screen(self.lane_coordinate(lane), self.along_coordinate(travel))
    }

    /// Lane change for a key press; keys along the travel axis are ignored
    pub fn steer_for(&self, direction: Direction) -> Option<Steer> {
        match (self.mode, direction) {
            (LayoutMode::TravelHorizontal, Direction::Up) => Some(Steer::Decrease),
            (LayoutMode::TravelHorizontal, Direction::Down) => Some(Steer::Increase),
            (LayoutMode::TravelVertical, Direction::Left) => Some(Steer::Decrease),
            (LayoutMode::TravelVertical, Direction::Right) => Some(Steer::Increase),
            _ => None,
        }
    }

    /// Lane under a pointer (viewport-relative pixels). Not clamped: pointers
    /// outside the viewport yield out-of-range lanes for the core to clamp.
    pub fn lane_at(&self, pointer: Vec2) -> i64 {
        let fraction = match self.mode {
            LayoutMode::TravelHorizontal => pointer.y / self.viewport.height,
            LayoutMode::TravelVertical => pointer.x / self.viewport.width,
        };
        (fraction * self.lane_count as f32).floor() as i64
    }
}

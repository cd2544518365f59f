//! Session state and core simulation types
//!
//! Everything the presentation layer reads lives here; only the pipeline
//! mutates it.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::SPEED_BONUS_DIVISOR;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    /// Waiting for `start`
    #[default]
    Menu,
    /// Active gameplay; the only phase in which ticks run
    Playing,
    /// Run ended with the win condition met
    Victory,
    /// Run ended on a hazard
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menu => "menu",
            Phase::Playing => "playing",
            Phase::Victory => "victory",
            Phase::GameOver => "gameover",
        }
    }

    /// Run is over and waiting for `reset`
    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Victory | Phase::GameOver)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an entity does to the player on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Coffee bean: caffeine, speed and score
    Reward,
    /// Pothole: ends the run
    Hazard,
}

impl EntityKind {
    /// Travel multiplier for this kind. Traffic moves as one.
    #[inline]
    pub fn travel_factor(&self) -> f32 {
        match self {
            EntityKind::Reward | EntityKind::Hazard => 1.0,
        }
    }
}

/// Lane change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    /// Toward lane 0
    Decrease,
    /// Toward the last lane
    Increase,
}

/// Something on the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique for the lifetime of the game, never reused
    pub id: u64,
    pub lane: u32,
    /// Distance travelled from the spawn edge
    pub travel: f32,
    pub kind: EntityKind,
}

/// The single live play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: Phase,
    /// Seed the session's spawn RNG was created from (for replays)
    pub seed: u64,
    /// Pipeline ticks run so far
    pub tick: u64,
    pub player_lane: u32,
    /// 0..=100
    pub caffeine: f32,
    /// Base speed, raised permanently by overloads
    pub base_speed: f32,
    /// `base_speed + caffeine * speed_per_caffeine`
    pub speed: f32,
    /// Metres covered
    pub distance: f64,
    pub score: u64,
    pub beans_collected: u32,
    pub max_speed_seen: f32,
    /// Caffeine has reached 100 at least once
    pub delivery_made: bool,
    /// Rewards collected at full caffeine
    pub overloads: u32,
    /// Score awarded by overloads so far
    pub overload_points: u64,
}

impl Session {
    /// Fresh session for a new run
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let speed = config.speed_for(config.base_speed, 0.0);
        Self {
            phase: Phase::Menu,
            seed,
            tick: 0,
            player_lane: config.start_lane.min(config.max_lane()),
            caffeine: 0.0,
            base_speed: config.base_speed,
            speed,
            distance: 0.0,
            score: 0,
            beans_collected: 0,
            max_speed_seen: speed,
            delivery_made: false,
            overloads: 0,
            overload_points: 0,
        }
    }

    /// Score components as shown on the results screen
    pub fn breakdown(&self, config: &GameConfig) -> ScoreBreakdown {
        ScoreBreakdown {
            distance_points: self.distance.max(0.0).floor() as u64,
            bean_bonus: self.beans_collected as u64 * config.reward_score,
            speed_bonus: (self.max_speed_seen / SPEED_BONUS_DIVISOR).max(0.0).floor() as u64,
            overload_bonus: self.overload_points,
        }
    }
}

/// Score decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoreBreakdown {
    /// One point per whole metre
    pub distance_points: u64,
    /// `reward_score` per bean
    pub bean_bonus: u64,
    /// One point per 10 units of the best speed reached
    pub speed_bonus: u64,
    /// Points from rewards collected at full caffeine
    pub overload_bonus: u64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u64 {
        self.distance_points + self.bean_bonus + self.speed_bonus + self.overload_bonus
    }
}

/// Notifications for the presentation layer, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned {
        id: u64,
        tick: u64,
        lane: u32,
        kind: EntityKind,
    },
    /// At most one per tick
    Collision { id: u64, kind: EntityKind },
    CaffeineGained { caffeine: f32, speed: f32 },
    /// Caffeine hit 100 for the first time
    DeliveryMade,
    /// Reward taken at full caffeine
    Overload { base_speed: f32, bonus: u64 },
    /// Exactly one per transition
    PhaseChanged { from: Phase, to: Phase },
}

/// Read-only view handed to renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub session: Session,
    pub entities: Vec<Entity>,
}

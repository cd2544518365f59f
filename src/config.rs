//! Game balance configuration
//!
//! Every tunable of the simulation lives here. Loaded from JSON, validated once
//! at construction so nothing can go wrong mid-tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LANE_COUNT, MAX_CAFFEINE};
use crate::error::ConfigError;
use crate::layout::Track;

/// When a session counts as won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WinPolicy {
    /// Victory the moment caffeine first reaches 100
    #[default]
    #[serde(alias = "caffeineOnly")]
    CaffeineOnly,
    /// Delivery at 100 caffeine, victory once `target_distance` is also covered
    #[serde(alias = "caffeinePlusDistance")]
    CaffeinePlusDistance,
}

impl WinPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinPolicy::CaffeineOnly => "caffeine_only",
            WinPolicy::CaffeinePlusDistance => "caffeine_plus_distance",
        }
    }
}

/// Simulation tunables
///
/// Positions along the track ("travel") start at 0 on the spawn edge and grow
/// toward the far boundary at `track_length`. Vectors are `(travel, across)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    // === Track ===
    /// Number of parallel lanes
    #[serde(alias = "laneCount")]
    pub lane_count: u32,
    /// Across-axis distance between lane centres
    #[serde(alias = "laneWidth")]
    pub lane_width: f32,
    /// Lane the player starts each session in
    #[serde(alias = "startLane")]
    pub start_lane: u32,
    /// Travel position of the far boundary; entities past it are dropped
    #[serde(alias = "trackLength")]
    pub track_length: f32,
    /// Travel position of the player's (fixed) centre
    #[serde(alias = "playerPosition")]
    pub player_position: f32,

    // === Spawning ===
    /// Spawn one entity every N ticks
    #[serde(alias = "spawnIntervalTicks")]
    pub spawn_interval_ticks: u32,
    /// Chance a spawn is a reward rather than a hazard
    #[serde(alias = "rewardProbability")]
    pub reward_probability: f64,

    // === Economy ===
    /// Speed with zero caffeine
    #[serde(alias = "baseSpeed")]
    pub base_speed: f32,
    /// Speed gained per point of caffeine
    #[serde(alias = "speedPerCaffeine")]
    pub speed_per_caffeine: f32,
    /// Permanent base speed gain for a reward collected at full caffeine
    #[serde(alias = "overloadSpeedIncrement")]
    pub overload_speed_increment: f32,
    /// Caffeine per reward
    #[serde(alias = "rewardCaffeine")]
    pub reward_caffeine: f32,
    /// Score per reward (and per bean in the score formula)
    #[serde(alias = "rewardScore")]
    pub reward_score: u64,
    /// Score for a reward collected at full caffeine
    #[serde(alias = "overloadScoreBonus")]
    pub overload_score_bonus: u64,
    /// Travel units per speed unit per second
    #[serde(alias = "travelRate")]
    pub travel_rate: f32,
    /// Metres of distance per speed unit per second
    #[serde(alias = "distancePerSpeedSecond")]
    pub distance_per_speed_second: f64,

    // === Collision ===
    #[serde(alias = "playerHalfExtents")]
    pub player_half_extents: Vec2,
    #[serde(alias = "entityHalfExtents")]
    pub entity_half_extents: Vec2,
    /// Shift applied to the player's box (the car's nose sits ahead of its centre)
    #[serde(alias = "collisionOffset")]
    pub collision_offset: Vec2,

    // === Winning ===
    #[serde(alias = "winPolicy")]
    pub win_policy: WinPolicy,
    /// Metres to cover after delivery under `CaffeinePlusDistance`
    #[serde(alias = "targetDistance")]
    pub target_distance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            lane_width: 60.0,
            start_lane: 1,
            track_length: 850.0,
            player_position: 700.0,

            spawn_interval_ticks: 45,
            reward_probability: 0.4,

            base_speed: 200.0,
            speed_per_caffeine: 1.5,
            overload_speed_increment: 10.0,
            reward_caffeine: 10.0,
            reward_score: 50,
            overload_score_bonus: 25,
            travel_rate: 1.8,
            distance_per_speed_second: 0.1,

            player_half_extents: Vec2::new(30.0, 24.0),
            entity_half_extents: Vec2::new(16.0, 16.0),
            collision_offset: Vec2::new(-30.0, 0.0),

            win_policy: WinPolicy::CaffeineOnly,
            target_distance: 1000.0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load config from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Copy the travel geometry of a screen layout
    pub fn with_track(mut self, track: Track) -> Self {
        self.track_length = track.length;
        self.player_position = track.player_position;
        self
    }

    /// Index of the last lane
    #[inline]
    pub fn max_lane(&self) -> u32 {
        self.lane_count.saturating_sub(1)
    }

    /// Speed for a given base speed and caffeine level
    #[inline]
    pub fn speed_for(&self, base_speed: f32, caffeine: f32) -> f32 {
        base_speed + caffeine * self.speed_per_caffeine
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::invalid("lane_count", "must be at least 1"));
        }
        if self.start_lane >= self.lane_count {
            return Err(ConfigError::invalid(
                "start_lane",
                format!("{} is outside 0..{}", self.start_lane, self.lane_count),
            ));
        }
        if self.spawn_interval_ticks == 0 {
            return Err(ConfigError::invalid(
                "spawn_interval_ticks",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.reward_probability) {
            return Err(ConfigError::invalid(
                "reward_probability",
                format!("{} is outside [0, 1]", self.reward_probability),
            ));
        }

        positive("lane_width", self.lane_width)?;
        positive("base_speed", self.base_speed)?;
        positive("travel_rate", self.travel_rate)?;
        positive("track_length", self.track_length)?;
        non_negative("speed_per_caffeine", self.speed_per_caffeine)?;
        non_negative("overload_speed_increment", self.overload_speed_increment)?;
        non_negative("player_position", self.player_position)?;

        if !(self.reward_caffeine > 0.0 && self.reward_caffeine <= MAX_CAFFEINE) {
            return Err(ConfigError::invalid(
                "reward_caffeine",
                format!("{} is outside (0, {MAX_CAFFEINE}]", self.reward_caffeine),
            ));
        }
        if !(self.distance_per_speed_second.is_finite() && self.distance_per_speed_second >= 0.0)
        {
            return Err(ConfigError::invalid(
                "distance_per_speed_second",
                "must be finite and non-negative",
            ));
        }
        if self.player_position > self.track_length {
            return Err(ConfigError::invalid(
                "player_position",
                format!(
                    "{} lies beyond the track end {}",
                    self.player_position, self.track_length
                ),
            ));
        }

        extents("player_half_extents", self.player_half_extents)?;
        extents("entity_half_extents", self.entity_half_extents)?;
        if !self.collision_offset.is_finite() {
            return Err(ConfigError::invalid("collision_offset", "must be finite"));
        }

        if self.win_policy == WinPolicy::CaffeinePlusDistance
            && !(self.target_distance.is_finite() && self.target_distance > 0.0)
        {
            return Err(ConfigError::invalid(
                "target_distance",
                "must be positive under caffeine_plus_distance",
            ));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} must be non-negative"),
        ))
    }
}

fn extents(field: &'static str, value: Vec2) -> Result<(), ConfigError> {
    if value.is_finite() && value.x >= 0.0 && value.y >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} must be finite and non-negative"),
        ))
    }
}

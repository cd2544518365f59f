//! Espresso Dash - a four-lane caffeine runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, economy, phases)
//! - `layout`: Orientation adapter between lanes/travel and screen space
//! - `config`: Data-driven game balance
//! - `records`: Best score/distance bookkeeping
//! - `persistence`: Durable record stores (file on native, LocalStorage on web)

pub mod config;
pub mod error;
pub mod layout;
pub mod persistence;
pub mod records;
pub mod sim;

pub use config::{GameConfig, WinPolicy};
pub use error::{ConfigError, GameError, StoreError};
pub use layout::{Layout, LayoutMode, Track, Viewport};
pub use records::{BestRecord, BestRecordStore, MemoryStore, RecordUpdate};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one logical frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Caffeine saturates here; reaching it is the delivery
    pub const MAX_CAFFEINE: f32 = 100.0;
    /// Speed bonus divisor: every 10 speed units of the best speed is a point
    pub const SPEED_BONUS_DIVISOR: f32 = 10.0;

    /// Number of lanes in the shipped design
    pub const DEFAULT_LANE_COUNT: u32 = 4;
}

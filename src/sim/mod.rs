//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod driver;
pub mod economy;
pub mod game;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use driver::FixedStep;
pub use economy::RewardOutcome;
pub use game::{Game, session_seed};
pub use spawn::Spawner;
pub use state::{
    Entity, EntityKind, GameEvent, Phase, ScoreBreakdown, Session, Snapshot, Steer,
};
pub use tick::{TickInput, tick};

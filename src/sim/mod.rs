//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied time deltas only (no wall-clock reads)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lanes;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, player_box, vehicle_box};
pub use lanes::{Direction, lane_center, lane_for_x};
pub use score::{compose_multiplier, continuous_delta, step_speed};
pub use spawn::spawn_traffic;
pub use state::{RngState, RunPhase, Tuning, Vehicle, World};
pub use tick::{TickEvent, TickInput, tick};

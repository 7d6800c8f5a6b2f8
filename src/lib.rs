//! Tunnel Racer - a six-lane traffic-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (traffic, collisions, scoring)
//! - `run`: Run lifecycle (start/pause/crash/reset, end-of-run report)
//! - `render`: Canvas 2D render pass and scrolling scenery
//! - `vehicles`: Selectable car catalog
//! - `settings` / `highscores` / `leaderboard`: Preferences, local bests,
//!   and the fire-and-forget score submission

pub mod highscores;
pub mod leaderboard;
pub mod render;
pub mod run;
pub mod settings;
pub mod sim;
pub mod vehicles;

pub use run::{RunController, RunOptions, RunReport};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// These are the defaults behind [`sim::Tuning`]; gameplay code reads them
/// through the tuning struct so tests can override individual values.
pub mod consts {
    /// Logical canvas size (the canvas element scales to fit)
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Road geometry: shoulders on both sides, six lanes between
    pub const ROAD_X: f32 = 50.0;
    pub const ROAD_WIDTH: f32 = 300.0;
    pub const LANES: usize = 6;
    pub const LANE_WIDTH: f32 = ROAD_WIDTH / LANES as f32;
    /// Pointer clamp margin inside the road edges
    pub const ROAD_MARGIN: f32 = 10.0;

    /// Player car: fixed row near the bottom, drawn 52x45
    pub const PLAYER_Y: f32 = 520.0;
    pub const PLAYER_HALF_W: f32 = 26.0;
    pub const PLAYER_HALF_H: f32 = 23.0;

    /// Traffic cars are drawn 38x37; collision box slightly tighter
    pub const TRAFFIC_HALF_W: f32 = 11.0;
    pub const TRAFFIC_HALF_H: f32 = 10.0;

    /// Base speed bounds; a run starts at MIN and steps toward MAX
    pub const MIN_SPEED: f32 = 1.5;
    pub const MAX_SPEED: f32 = 6.0;
    pub const SPEED_STEP: f32 = 0.6;

    /// Fixed-rate host timers (decoupled from the frame rate)
    pub const SPAWN_INTERVAL_MS: i32 = 700;
    pub const DIFFICULTY_INTERVAL_MS: i32 = 30_000;

    /// Cap on a single frame's raw delta, in seconds. Absorbs tab-hidden
    /// gaps and GC stalls so nothing teleports past the player row.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Spawn placement: above the visible top edge, staggered per batch slot
    pub const SPAWN_Y: f32 = -60.0;
    pub const SPAWN_STAGGER: f32 = 60.0;
    /// Vehicles are dropped once their y passes this bound
    pub const DESPAWN_Y: f32 = 650.0;
    /// Bounded retries for rejection-sampled lane choice
    pub const SPAWN_MAX_ATTEMPTS: u32 = 10;

    /// Sprite variants available per direction group
    pub const TRAFFIC_SPRITE_VARIANTS: usize = 5;

    /// Traffic behavior odds
    pub const OPPOSING_CHANCE: f64 = 0.5;
    pub const LANE_CHANGE_CHANCE: f64 = 0.2;

    /// Directional y-speed multipliers: oncoming traffic closes roughly
    /// twice as fast as same-direction traffic trails behind
    pub const SAME_DIR_SPEED_MULT: f32 = 3.0;
    pub const OPPOSING_SPEED_MULT: f32 = 6.0;

    /// Lane-change animation: fraction of remaining distance per 60fps
    /// unit, and the snap distance that ends the maneuver
    pub const LANE_LERP_FRAC: f32 = 0.05;
    pub const LANE_SNAP_EPS: f32 = 1.0;

    /// Scoring
    pub const SCORE_BASE_FACTOR: f32 = 1.8;
    pub const OPPOSING_LANE_BONUS: f32 = 1.5;
    pub const BONUS_RACE_MULTIPLIER: f32 = 2.5;
}

/// Normalize a raw frame delta (seconds) to a 60fps-equivalent scale,
/// clamping first so stalls never produce a giant step.
#[inline]
pub fn dt_scale(raw_dt: f32) -> f32 {
    raw_dt.clamp(0.0, consts::MAX_FRAME_DT) * 60.0
}

/// Clamp a pointer x-coordinate to the drivable road bounds.
#[inline]
pub fn clamp_to_road(x: f32) -> f32 {
    use consts::*;
    x.clamp(ROAD_X + ROAD_MARGIN, ROAD_X + ROAD_WIDTH - ROAD_MARGIN)
}

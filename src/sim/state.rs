//! Run state and core simulation types
//!
//! Everything a run mutates lives in one owned [`World`], threaded by
//! exclusive reference through the tick so there is no hidden shared state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lanes::{Direction, lane_center};
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Frozen by the player; the tick still fires but its body is a no-op
    Paused,
    /// Terminal: the player hit traffic. Not an error, the expected end state.
    Crashed,
}

/// A traffic vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub pos: Vec2,
    /// Lane currently occupied
    pub lane: usize,
    /// Lane being merged into; equals `lane` when driving straight
    pub target_lane: usize,
    pub dir: Direction,
    /// Set once a same-direction vehicle falls behind the player row
    pub passed: bool,
    /// Turn indicator: -1 left, 0 off, 1 right
    pub blinker: i8,
    /// Which sprite variant to draw
    pub sprite_index: usize,
}

impl Vehicle {
    /// Place a new vehicle at its lane center, above the visible top edge.
    /// `batch_slot` staggers vehicles spawned in the same tick.
    pub fn spawn(lane: usize, dir: Direction, sprite_index: usize, batch_slot: usize) -> Self {
        Self {
            pos: Vec2::new(
                lane_center(lane),
                SPAWN_Y - SPAWN_STAGGER * batch_slot as f32,
            ),
            lane,
            target_lane: lane,
            dir,
            passed: false,
            blinker: 0,
            sprite_index,
        }
    }

    /// Start a merge toward `target` and flip the indicator to match
    pub fn begin_lane_change(&mut self, target: usize) {
        if target != self.lane {
            self.target_lane = target;
            self.blinker = if target > self.lane { 1 } else { -1 };
        }
    }

    pub fn is_changing_lanes(&self) -> bool {
        self.target_lane != self.lane
    }

    /// Directional y-speed multiplier (closing vs. trailing motion)
    pub fn speed_mult(&self, tuning: &Tuning) -> f32 {
        match self.dir {
            Direction::Same => tuning.same_dir_speed_mult,
            Direction::Opposing => tuning.opposing_speed_mult,
        }
    }
}

/// Data-driven gameplay balance
///
/// Defaults mirror [`crate::consts`]; tests override single fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub min_speed: f32,
    pub max_speed: f32,
    pub speed_step: f32,
    pub opposing_chance: f64,
    pub lane_change_chance: f64,
    pub same_dir_speed_mult: f32,
    pub opposing_speed_mult: f32,
    pub score_base_factor: f32,
    pub opposing_lane_bonus: f32,
    pub bonus_race_multiplier: f32,
    pub lane_lerp_frac: f32,
    pub lane_snap_eps: f32,
    pub despawn_y: f32,
    pub spawn_max_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            speed_step: SPEED_STEP,
            opposing_chance: OPPOSING_CHANCE,
            lane_change_chance: LANE_CHANGE_CHANCE,
            same_dir_speed_mult: SAME_DIR_SPEED_MULT,
            opposing_speed_mult: OPPOSING_SPEED_MULT,
            score_base_factor: SCORE_BASE_FACTOR,
            opposing_lane_bonus: OPPOSING_LANE_BONUS,
            bonus_race_multiplier: BONUS_RACE_MULTIPLIER,
            lane_lerp_frac: LANE_LERP_FRAC,
            lane_snap_eps: LANE_SNAP_EPS,
            despawn_y: DESPAWN_Y,
            spawn_max_attempts: SPAWN_MAX_ATTEMPTS,
        }
    }
}

/// RNG state wrapper so a run can be reproduced from its seed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete per-run simulation state
///
/// Owned exclusively by the run controller; the tick takes `&mut World`.
/// The only value written from outside the tick is the pointer position,
/// and that arrives through [`super::TickInput`] as a single scalar.
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub rng_state: RngState,
    /// RNG driving spawn decisions
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: RunPhase,
    /// Host-set tab visibility; hidden behaves like paused
    pub visible: bool,
    /// Active traffic, in spawn order
    pub vehicles: Vec<Vehicle>,
    /// Player x, pointer-driven and clamped to the road
    pub player_x: f32,
    /// Fractional accumulator; displayed and reported floored
    pub score: f64,
    /// Base speed, stepped up by the difficulty timer, bounded
    /// [min_speed, max_speed], never lowered within a run
    pub speed: f32,
    /// Frozen product of vehicle x check-in x bonus-race multipliers
    pub multiplier: f32,
    /// Same-direction vehicles outrun this run
    pub passed_count: u32,
    /// Last spawn lane per direction group (anti-repeat)
    pub last_lane_same: Option<usize>,
    pub last_lane_opp: Option<usize>,
}

impl World {
    pub fn new(tuning: Tuning, multiplier: f32, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng_state,
            rng: rng_state.to_rng(),
            speed: tuning.min_speed,
            tuning,
            phase: RunPhase::Running,
            visible: true,
            vehicles: Vec::new(),
            player_x: lane_center(1),
            score: 0.0,
            multiplier,
            passed_count: 0,
            last_lane_same: None,
            last_lane_opp: None,
        }
    }

    /// Clear all per-run state for a restart, keeping tuning and the
    /// frozen multiplier, and reseeding the RNG.
    pub fn reset(&mut self, seed: u64) {
        self.rng_state = RngState::new(seed);
        self.rng = self.rng_state.to_rng();
        self.phase = RunPhase::Running;
        self.vehicles.clear();
        self.player_x = lane_center(1);
        self.score = 0.0;
        self.speed = self.tuning.min_speed;
        self.passed_count = 0;
        self.last_lane_same = None;
        self.last_lane_opp = None;
    }

    /// True while the tick should advance motion, spawning, and scoring
    pub fn is_live(&self) -> bool {
        self.phase == RunPhase::Running && self.visible
    }

    /// Score as displayed and reported
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn last_lane(&self, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Same => self.last_lane_same,
            Direction::Opposing => self.last_lane_opp,
        }
    }

    pub fn set_last_lane(&mut self, dir: Direction, lane: usize) {
        match dir {
            Direction::Same => self.last_lane_same = Some(lane),
            Direction::Opposing => self.last_lane_opp = Some(lane),
        }
    }
}

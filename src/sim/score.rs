//! Scoring and difficulty
//!
//! Continuous score accrues every frame from distance traveled; discrete
//! score comes from passing same-direction traffic. The run multiplier is
//! composed once at start and frozen. Difficulty is a host-timed step on
//! the base speed, capped and never lowered within a run.

use super::state::Tuning;
use crate::run::RunOptions;

/// Compose the run's frozen score multiplier:
/// vehicle multiplier x check-in streak bonus x bonus-race flag.
pub fn compose_multiplier(vehicle_mult: f32, options: &RunOptions, tuning: &Tuning) -> f32 {
    let check_in = options.check_in_multiplier.unwrap_or(1.0);
    let bonus = if options.bonus_race {
        tuning.bonus_race_multiplier
    } else {
        1.0
    };
    vehicle_mult * check_in * bonus
}

/// Continuous distance score for one tick, before the run multiplier.
///
/// Driving in the opposing-direction lanes is riskier and pays the lane
/// bonus; the fractional result is accumulated in `f64` so low speed and
/// small deltas never stall at integer boundaries.
pub fn continuous_delta(speed: f32, on_opposing: bool, dt_scale: f32, tuning: &Tuning) -> f64 {
    let lane_bonus = if on_opposing {
        tuning.opposing_lane_bonus
    } else {
        1.0
    };
    (speed * tuning.score_base_factor * lane_bonus * dt_scale) as f64
}

/// One difficulty step: raise the base speed, capped, never lowered.
pub fn step_speed(speed: f32, tuning: &Tuning) -> f32 {
    (speed + tuning.speed_step).min(tuning.max_speed).max(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_is_the_product_of_all_bonuses() {
        let tuning = Tuning::default();
        let plain = RunOptions::default();
        assert_eq!(compose_multiplier(1.0, &plain, &tuning), 1.0);

        let stacked = RunOptions {
            check_in_multiplier: Some(1.5),
            bonus_race: true,
        };
        // 2.0 x 1.5 x 2.5
        assert!((compose_multiplier(2.0, &stacked, &tuning) - 7.5).abs() < 1e-5);

        let check_in_only = RunOptions {
            check_in_multiplier: Some(1.25),
            bonus_race: false,
        };
        assert!((compose_multiplier(1.0, &check_in_only, &tuning) - 1.25).abs() < 1e-5);
    }

    #[test]
    fn base_tick_scores_speed_times_base_factor() {
        let tuning = Tuning::default();
        // speed=1.5, dt_scale=1, no lane bonus -> 1.5 x 1.8
        let delta = continuous_delta(1.5, false, 1.0, &tuning);
        assert!((delta - 2.7).abs() < 1e-5);
    }

    #[test]
    fn opposing_lanes_pay_the_lane_bonus() {
        let tuning = Tuning::default();
        let safe = continuous_delta(2.0, false, 1.0, &tuning);
        let risky = continuous_delta(2.0, true, 1.0, &tuning);
        assert!((risky / safe - 1.5).abs() < 1e-5);
    }

    #[test]
    fn delta_scales_linearly_with_dt() {
        let tuning = Tuning::default();
        let one = continuous_delta(3.0, false, 1.0, &tuning);
        let two = continuous_delta(3.0, false, 2.0, &tuning);
        assert!((two - 2.0 * one).abs() < 1e-4);
    }

    #[test]
    fn speed_steps_up_and_caps() {
        let tuning = Tuning::default();
        let mut speed = tuning.min_speed;
        let mut previous = speed;
        for _ in 0..20 {
            speed = step_speed(speed, &tuning);
            assert!(speed >= previous, "speed must never decrease");
            assert!(speed <= tuning.max_speed);
            previous = speed;
        }
        assert_eq!(speed, tuning.max_speed);
        // Stepping at the cap holds the cap
        assert_eq!(step_speed(tuning.max_speed, &tuning), tuning.max_speed);
    }
}

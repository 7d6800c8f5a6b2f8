//! Per-frame simulation update
//!
//! One tick advances the whole world: continuous scoring, lane-change
//! interpolation, directional motion, pass detection, collision, and
//! despawn. The host calls this from its animation-frame callback with
//! the real elapsed time; the clamp in [`crate::dt_scale`] makes motion
//! frame-rate independent and absorbs stalls.

use super::collision::{player_box, vehicle_box};
use super::lanes::{Direction, lane_center, lane_for_x};
use super::score::continuous_delta;
use super::state::{RunPhase, World};
use crate::consts::PLAYER_Y;
use crate::{clamp_to_road, dt_scale};

/// Input sampled for a single tick
///
/// The pointer position is the only value written from outside the tick;
/// input handlers store it between frames and it arrives here as one scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Latest pointer/touch x in canvas coordinates, if any
    pub pointer_x: Option<f32>,
}

/// Events produced by one tick, in occurrence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// A same-direction vehicle fell behind the player row
    VehiclePassed,
    /// The player hit traffic; the run is over. Emitted at most once per
    /// tick even when several vehicles overlap in the same frame.
    Crashed,
}

/// Advance the world by one frame.
///
/// While paused, hidden, or crashed the body is a no-op; the host keeps
/// rescheduling the frame callback so resumption needs no re-init.
pub fn tick(world: &mut World, input: &TickInput, raw_dt: f32) -> Vec<TickEvent> {
    let mut events = Vec::new();
    if world.phase != RunPhase::Running || !world.visible {
        return events;
    }

    let dts = dt_scale(raw_dt);
    if let Some(x) = input.pointer_x {
        world.player_x = clamp_to_road(x);
    }

    // Continuous distance score, with the risk bonus for driving against
    // oncoming traffic
    let on_opposing = Direction::of_lane(lane_for_x(world.player_x)) == Direction::Opposing;
    world.score +=
        continuous_delta(world.speed, on_opposing, dts, &world.tuning) * world.multiplier as f64;

    let speed = world.speed;
    let tuning = world.tuning.clone();
    let player = player_box(world.player_x);

    let mut passes: u32 = 0;
    let mut crashed = false;

    for v in &mut world.vehicles {
        // Lane-change animation: chase the target lane's center by a
        // fixed fraction of the remaining distance, snap when close
        if v.is_changing_lanes() {
            let target_x = lane_center(v.target_lane);
            v.pos.x += (target_x - v.pos.x) * tuning.lane_lerp_frac * dts;
            if (v.pos.x - target_x).abs() < tuning.lane_snap_eps {
                v.lane = v.target_lane;
                v.blinker = 0;
            }
        }

        v.pos.y += speed * v.speed_mult(&tuning) * dts;

        // A same-direction vehicle dropping behind the player row counts
        // as passed, once
        if !v.passed && v.dir == Direction::Same && v.pos.y > PLAYER_Y {
            v.passed = true;
            passes += 1;
        }

        // First detected overlap ends the run; no grace period
        if !crashed && player.overlaps(&vehicle_box(v)) {
            crashed = true;
        }
    }

    // Discrete pass score: one multiplier-scaled unit each
    world.passed_count += passes;
    world.score += passes as f64 * world.multiplier as f64;
    for _ in 0..passes {
        events.push(TickEvent::VehiclePassed);
    }

    // Drop vehicles past the bottom bound
    let despawn_y = world.tuning.despawn_y;
    world.vehicles.retain(|v| v.pos.y <= despawn_y);

    if crashed {
        world.phase = RunPhase::Crashed;
        events.push(TickEvent::Crashed);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DESPAWN_Y, MIN_SPEED, SCORE_BASE_FACTOR};
    use crate::sim::spawn::spawn_traffic;
    use crate::sim::state::{Tuning, Vehicle};

    const FRAME: f32 = 1.0 / 60.0;

    fn world() -> World {
        World::new(Tuning::default(), 1.0, 42)
    }

    fn centered_input() -> TickInput {
        TickInput {
            pointer_x: Some(lane_center(1)),
        }
    }

    #[test]
    fn base_tick_adds_speed_times_base_factor() {
        let mut w = world();
        // speed=1.5, multiplier=1, dt_scale=1, lane 1 (no bonus)
        tick(&mut w, &centered_input(), FRAME);
        assert!((w.score - (MIN_SPEED * SCORE_BASE_FACTOR) as f64).abs() < 1e-3);
    }

    #[test]
    fn opposing_lane_earns_the_risk_bonus() {
        let mut w = world();
        let input = TickInput {
            pointer_x: Some(lane_center(4)),
        };
        tick(&mut w, &input, FRAME);
        let expected = (MIN_SPEED * SCORE_BASE_FACTOR * 1.5) as f64;
        assert!((w.score - expected).abs() < 1e-3);
    }

    #[test]
    fn score_is_monotonic_while_running() {
        let mut w = world();
        let mut previous = 0.0;
        for i in 0..600 {
            if i % 40 == 0 {
                spawn_traffic(&mut w);
            }
            tick(&mut w, &centered_input(), FRAME);
            if w.phase != RunPhase::Running {
                break;
            }
            assert!(w.score >= previous, "score regressed at tick {i}");
            previous = w.score;
        }
    }

    #[test]
    fn paused_and_hidden_ticks_are_no_ops() {
        let mut w = world();
        w.vehicles.push(Vehicle::spawn(0, Direction::Same, 0, 0));
        let y_before = w.vehicles[0].pos.y;

        w.phase = RunPhase::Paused;
        let events = tick(&mut w, &centered_input(), FRAME);
        assert!(events.is_empty());
        assert_eq!(w.score, 0.0);
        assert_eq!(w.vehicles[0].pos.y, y_before);

        w.phase = RunPhase::Running;
        w.visible = false;
        tick(&mut w, &centered_input(), FRAME);
        assert_eq!(w.score, 0.0);
        assert_eq!(w.vehicles[0].pos.y, y_before);
    }

    #[test]
    fn passing_awards_one_multiplier_unit_exactly_once() {
        let mut w = World::new(Tuning::default(), 2.5, 42);
        let mut v = Vehicle::spawn(0, Direction::Same, 0, 0);
        // Just above the player row, about to fall behind
        v.pos.y = PLAYER_Y - 1.0;
        w.vehicles.push(v);

        // Keep the player far from lane 0 so no collision interferes
        let input = TickInput {
            pointer_x: Some(lane_center(2)),
        };
        let continuous = |w: &World| {
            continuous_delta(w.speed, false, 1.0, &w.tuning) * w.multiplier as f64
        };

        let events = tick(&mut w, &input, FRAME);
        assert_eq!(events, vec![TickEvent::VehiclePassed]);
        assert_eq!(w.passed_count, 1);
        let expected = continuous(&w) + 2.5;
        assert!((w.score - expected).abs() < 1e-3);

        // Second tick: still behind the row, no second award
        let events = tick(&mut w, &input, FRAME);
        assert!(events.is_empty());
        assert_eq!(w.passed_count, 1);
    }

    #[test]
    fn opposing_vehicles_never_count_as_passed() {
        let mut w = world();
        let mut v = Vehicle::spawn(5, Direction::Opposing, 0, 0);
        v.pos.y = PLAYER_Y - 1.0;
        w.vehicles.push(v);
        let events = tick(&mut w, &centered_input(), FRAME);
        assert!(events.is_empty());
        assert_eq!(w.passed_count, 0);
    }

    #[test]
    fn collision_ends_the_run() {
        let mut w = world();
        let mut v = Vehicle::spawn(1, Direction::Same, 0, 0);
        v.pos.y = PLAYER_Y;
        w.vehicles.push(v);

        let events = tick(&mut w, &centered_input(), FRAME);
        assert!(events.contains(&TickEvent::Crashed));
        assert_eq!(w.phase, RunPhase::Crashed);

        // Crashed world no longer ticks
        let score = w.score;
        let events = tick(&mut w, &centered_input(), FRAME);
        assert!(events.is_empty());
        assert_eq!(w.score, score);
    }

    #[test]
    fn two_overlapping_vehicles_crash_exactly_once() {
        let mut w = world();
        for _ in 0..2 {
            let mut v = Vehicle::spawn(1, Direction::Same, 0, 0);
            v.pos.y = PLAYER_Y;
            w.vehicles.push(v);
        }
        let events = tick(&mut w, &centered_input(), FRAME);
        let crashes = events
            .iter()
            .filter(|e| **e == TickEvent::Crashed)
            .count();
        assert_eq!(crashes, 1);
    }

    #[test]
    fn vehicles_past_the_bottom_bound_are_removed() {
        let mut w = world();
        let mut v = Vehicle::spawn(0, Direction::Same, 0, 0);
        v.pos.y = DESPAWN_Y + 1.0;
        v.passed = true;
        w.vehicles.push(v);
        // Player far away in the opposing lanes
        let input = TickInput {
            pointer_x: Some(lane_center(4)),
        };
        tick(&mut w, &input, FRAME);
        assert!(w.vehicles.is_empty());
    }

    #[test]
    fn lane_change_converges_then_stops_interpolating() {
        let mut w = world();
        let mut v = Vehicle::spawn(2, Direction::Same, 0, 0);
        // Far above the road so it cannot despawn mid-maneuver
        v.pos.y = -5000.0;
        v.begin_lane_change(1);
        w.vehicles.push(v);

        let input = TickInput {
            pointer_x: Some(lane_center(4)),
        };
        let mut converged_at = None;
        for i in 0..300 {
            tick(&mut w, &input, FRAME);
            let v = &w.vehicles[0];
            if !v.is_changing_lanes() {
                converged_at = Some(i);
                break;
            }
        }
        let at = converged_at.expect("lane change never converged");
        assert!(at < 200, "took {at} frames to converge");

        let v = &w.vehicles[0];
        assert_eq!(v.lane, 1);
        assert_eq!(v.blinker, 0);
        assert!((v.pos.x - lane_center(1)).abs() < 1.0);

        // Once snapped, x no longer moves
        let x = w.vehicles[0].pos.x;
        tick(&mut w, &input, FRAME);
        assert_eq!(w.vehicles[0].pos.x, x);
    }

    #[test]
    fn long_stall_cannot_teleport_traffic_past_the_player() {
        let mut w = world();
        let mut v = Vehicle::spawn(4, Direction::Opposing, 0, 0);
        v.pos.y = 400.0;
        w.vehicles.push(v);

        // 5 hidden seconds arrive as one huge delta; the clamp caps the
        // step at 0.1s-equivalent: 1.5 x 6 x 6 = 54 units
        let events = tick(&mut w, &centered_input(), 5.0);
        assert!(events.is_empty());
        let y = w.vehicles[0].pos.y;
        assert!((y - 454.0).abs() < 1e-3, "vehicle jumped to {y}");
        assert_eq!(w.phase, RunPhase::Running);
    }

    #[test]
    fn pointer_is_clamped_to_the_road() {
        let mut w = world();
        let input = TickInput {
            pointer_x: Some(-200.0),
        };
        tick(&mut w, &input, FRAME);
        assert_eq!(w.player_x, 60.0);
    }
}

//! Traffic spawner
//!
//! Invoked by the host on a fixed real-time interval, decoupled from the
//! frame rate. Each invocation spawns a batch of 1-2 vehicles with
//! rejection-sampled lanes: never the lane last used for that direction,
//! never a lane already taken earlier in the same batch. Sampling is
//! bounded; a slot that exhausts its attempts is dropped for this tick.

use rand::Rng;

use super::lanes::Direction;
use super::state::{Vehicle, World};
use crate::consts::TRAFFIC_SPRITE_VARIANTS;

/// Pick a lane for `dir` by rejection sampling.
///
/// Rejects the direction's last-used lane and any lane already chosen in
/// this batch. Returns `None` once the attempt budget is spent; the caller
/// skips that vehicle rather than retrying later.
fn pick_lane<R: Rng>(
    rng: &mut R,
    dir: Direction,
    last: Option<usize>,
    used: &[usize],
    max_attempts: u32,
) -> Option<usize> {
    let lanes = dir.lanes();
    for _ in 0..max_attempts {
        let lane = lanes[rng.random_range(0..lanes.len())];
        if Some(lane) == last || used.contains(&lane) {
            continue;
        }
        return Some(lane);
    }
    None
}

/// Lane one step toward the direction's road edge, clamped to the group
fn edgeward_lane(lane: usize, dir: Direction) -> usize {
    let (lo, hi) = dir.lane_range();
    match dir {
        Direction::Same => lane.saturating_sub(1).max(lo),
        Direction::Opposing => (lane + 1).min(hi),
    }
}

/// Spawn this tick's traffic batch into the world.
///
/// No-op while the run is paused, crashed, or the tab is hidden; the host
/// keeps its interval timer running and this check happens at invocation.
pub fn spawn_traffic(world: &mut World) {
    if !world.is_live() {
        return;
    }

    let count = world.rng.random_range(1..=2usize);
    let mut used_same: Vec<usize> = Vec::with_capacity(2);
    let mut used_opp: Vec<usize> = Vec::with_capacity(2);

    for slot in 0..count {
        let dir = if world.rng.random_bool(world.tuning.opposing_chance) {
            Direction::Opposing
        } else {
            Direction::Same
        };
        let used = match dir {
            Direction::Same => &used_same,
            Direction::Opposing => &used_opp,
        };

        let last = world.last_lane(dir);
        let Some(lane) = pick_lane(
            &mut world.rng,
            dir,
            last,
            used,
            world.tuning.spawn_max_attempts,
        ) else {
            // Slot dropped under load; bounded work per tick wins
            continue;
        };

        match dir {
            Direction::Same => used_same.push(lane),
            Direction::Opposing => used_opp.push(lane),
        }
        world.set_last_lane(dir, lane);

        let sprite_index = world.rng.random_range(0..TRAFFIC_SPRITE_VARIANTS);
        let mut vehicle = Vehicle::spawn(lane, dir, sprite_index, slot);

        if world.rng.random_bool(world.tuning.lane_change_chance) {
            let target = edgeward_lane(lane, dir);
            vehicle.begin_lane_change(target);
        }

        world.vehicles.push(vehicle);
    }
}

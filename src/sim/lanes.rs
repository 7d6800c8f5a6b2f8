//! Static lane geometry
//!
//! Six fixed lanes across the road, split into two direction groups:
//! lanes 0-2 carry traffic moving with the player, lanes 3-5 carry
//! oncoming traffic. The lane -> x mapping never changes.

use serde::{Deserialize, Serialize};

use crate::consts::{LANE_WIDTH, LANES, ROAD_X};

/// Which way a lane's traffic moves relative to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Moving with the player; passed by outrunning it
    Same,
    /// Oncoming; closes distance roughly twice as fast
    Opposing,
}

impl Direction {
    /// The three lanes belonging to this direction group
    pub fn lanes(self) -> [usize; 3] {
        match self {
            Direction::Same => [0, 1, 2],
            Direction::Opposing => [3, 4, 5],
        }
    }

    /// Direction group a lane index belongs to
    pub fn of_lane(lane: usize) -> Direction {
        if lane < 3 {
            Direction::Same
        } else {
            Direction::Opposing
        }
    }

    /// The lane index at this group's road edge (lane changes drift
    /// toward it: same-direction toward 0, opposing toward 5)
    pub fn edge_lane(self) -> usize {
        match self {
            Direction::Same => 0,
            Direction::Opposing => 5,
        }
    }

    /// Inclusive lane bounds for this group
    pub fn lane_range(self) -> (usize, usize) {
        match self {
            Direction::Same => (0, 2),
            Direction::Opposing => (3, 5),
        }
    }
}

/// Fixed horizontal center of a lane
#[inline]
pub fn lane_center(lane: usize) -> f32 {
    debug_assert!(lane < LANES);
    ROAD_X + LANE_WIDTH * (lane as f32 + 0.5)
}

/// Nearest lane index for an x-coordinate, clamped to the road
#[inline]
pub fn lane_for_x(x: f32) -> usize {
    let raw = ((x - ROAD_X - LANE_WIDTH / 2.0) / LANE_WIDTH).round() as i32;
    raw.clamp(0, LANES as i32 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_cover_all_six_lanes_without_overlap() {
        let same = Direction::Same.lanes();
        let opp = Direction::Opposing.lanes();
        for lane in 0..LANES {
            let in_same = same.contains(&lane);
            let in_opp = opp.contains(&lane);
            assert!(in_same != in_opp, "lane {lane} must be in exactly one group");
            assert_eq!(
                Direction::of_lane(lane),
                if in_same { Direction::Same } else { Direction::Opposing }
            );
        }
    }

    #[test]
    fn lane_centers_are_fixed_and_evenly_spaced() {
        assert_eq!(lane_center(0), 75.0);
        assert_eq!(lane_center(5), 325.0);
        for lane in 0..LANES - 1 {
            let gap = lane_center(lane + 1) - lane_center(lane);
            assert!((gap - LANE_WIDTH).abs() < 1e-4);
        }
    }

    #[test]
    fn lane_for_x_round_trips_centers() {
        for lane in 0..LANES {
            assert_eq!(lane_for_x(lane_center(lane)), lane);
        }
        // Off-road coordinates clamp to the outer lanes
        assert_eq!(lane_for_x(0.0), 0);
        assert_eq!(lane_for_x(400.0), 5);
    }

    #[test]
    fn edge_lanes_sit_inside_their_group() {
        assert_eq!(Direction::Same.edge_lane(), 0);
        assert_eq!(Direction::Opposing.edge_lane(), 5);
        assert_eq!(Direction::Same.lane_range(), (0, 2));
        assert_eq!(Direction::Opposing.lane_range(), (3, 5));
    }
}

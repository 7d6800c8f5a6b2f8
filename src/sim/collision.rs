//! Axis-aligned collision boxes
//!
//! Both the player and traffic use fixed-size AABBs; the overlap test is
//! the same in both directions and any overlap immediately ends the run.

use glam::Vec2;

use super::state::Vehicle;
use crate::consts::*;

/// An axis-aligned box described by its center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Symmetric overlap test: true when the boxes intersect on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() < self.half.y + other.half.y
    }
}

/// The player's collision box at a given x (y and size are fixed)
#[inline]
pub fn player_box(player_x: f32) -> Aabb {
    Aabb::new(
        Vec2::new(player_x, PLAYER_Y),
        Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H),
    )
}

/// A traffic vehicle's collision box (same size for both directions)
#[inline]
pub fn vehicle_box(vehicle: &Vehicle) -> Aabb {
    Aabb::new(vehicle.pos, Vec2::new(TRAFFIC_HALF_W, TRAFFIC_HALF_H))
}

//! Scrolling decoration state
//!
//! Lane dashes, tunnel neon dots and shoulder streaks. Purely cosmetic:
//! nothing here feeds back into the simulation, but the scroll math shares
//! the frame's dt scale so decorations stay in step with traffic. Each
//! element wraps back above the canvas after leaving the bottom edge.

use rand::Rng;

use crate::consts::{LANE_WIDTH, ROAD_X};

/// Palette cycled across neon dots and shoulder streaks
pub const NEON_COLORS: [&str; 5] = ["#00a8ff", "#ff0066", "#00ffcc", "#ffaa00", "#aa66ff"];

/// Lane boundaries carrying dashed markings. Boundaries 0 and 6 are the
/// road edges and boundary 3 is the solid center divider.
pub const DASHED_BOUNDARIES: [usize; 4] = [1, 2, 4, 5];

/// Vertical gap between dashes on one boundary
pub const DASH_GAP: f32 = 160.0;
/// Drawn dash dimensions
pub const DASH_W: f32 = 4.0;
pub const DASH_H: f32 = 90.0;

/// Dashes scroll faster than traffic to sell the road speed
pub const DASH_SCROLL_FACTOR: f32 = 4.0;
/// Neons and streaks drift slightly slower than the dashes
pub const DECOR_SCROLL_FACTOR: f32 = 3.5;

const DASH_WRAP_Y: f32 = 660.0;
const DASH_RESET_Y: f32 = -80.0;
const NEON_WRAP_Y: f32 = 650.0;
const NEON_RESET_Y: f32 = -30.0;
const STREAK_WRAP_Y: f32 = 700.0;

/// One dashed lane-marking segment
#[derive(Debug, Clone, Copy)]
pub struct Dash {
    pub x: f32,
    pub y: f32,
}

/// One neon dot on the tunnel wall
#[derive(Debug, Clone, Copy)]
pub struct Neon {
    pub x: f32,
    pub y: f32,
    pub color_index: usize,
}

/// One glowing streak on the road shoulder
#[derive(Debug, Clone, Copy)]
pub struct Streak {
    pub x: f32,
    pub y: f32,
    pub h: f32,
    pub color_index: usize,
}

/// All scrolling decoration state for one run
#[derive(Debug, Clone, Default)]
pub struct Scenery {
    pub dashes: Vec<Dash>,
    pub neons: Vec<Neon>,
    pub streaks: Vec<Streak>,
}

impl Scenery {
    /// Seed the decoration layout. Dash positions are deterministic;
    /// neon/streak placement draws from the caller's RNG. Counts come
    /// from the quality settings and may be zero.
    pub fn new<R: Rng>(rng: &mut R, neon_count: usize, streak_count: usize) -> Self {
        let mut dashes = Vec::new();
        for boundary in DASHED_BOUNDARIES {
            let x = ROAD_X + boundary as f32 * LANE_WIDTH;
            let mut y = 0.0;
            while y < 600.0 {
                dashes.push(Dash { x, y });
                y += DASH_GAP;
            }
        }

        let neons = (0..neon_count)
            .map(|i| {
                let x = if rng.random_bool(0.5) {
                    12.0 + rng.random::<f32>() * 20.0
                } else {
                    368.0 + rng.random::<f32>() * 20.0
                };
                Neon {
                    x,
                    y: rng.random::<f32>() * 700.0,
                    color_index: i % NEON_COLORS.len(),
                }
            })
            .collect();

        let streaks = (0..streak_count)
            .map(|i| {
                let x = if rng.random_bool(0.5) {
                    8.0 + rng.random::<f32>() * 25.0
                } else {
                    367.0 + rng.random::<f32>() * 25.0
                };
                Streak {
                    x,
                    y: rng.random::<f32>() * 800.0,
                    h: 40.0 + rng.random::<f32>() * 80.0,
                    color_index: i % NEON_COLORS.len(),
                }
            })
            .collect();

        Self {
            dashes,
            neons,
            streaks,
        }
    }

    /// Advance the scroll for one frame. `dt_scale` is the same scaled dt
    /// the simulation tick uses, so decorations freeze with the world
    /// while paused or hidden (the host simply stops calling this).
    pub fn scroll(&mut self, speed: f32, dt_scale: f32) {
        let dash_step = speed * DASH_SCROLL_FACTOR * dt_scale;
        for dash in &mut self.dashes {
            dash.y += dash_step;
            if dash.y > DASH_WRAP_Y {
                dash.y = DASH_RESET_Y;
            }
        }

        let decor_step = speed * DECOR_SCROLL_FACTOR * dt_scale;
        for neon in &mut self.neons {
            neon.y += decor_step;
            if neon.y > NEON_WRAP_Y {
                neon.y = NEON_RESET_Y;
            }
        }
        for streak in &mut self.streaks {
            streak.y += decor_step;
            if streak.y > STREAK_WRAP_Y {
                streak.y = -streak.h;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn scenery(neons: usize, streaks: usize) -> Scenery {
        let mut rng = Pcg32::seed_from_u64(7);
        Scenery::new(&mut rng, neons, streaks)
    }

    #[test]
    fn dashes_cover_the_four_dashed_boundaries() {
        let scenery = scenery(0, 0);
        // 4 boundaries x 4 dashes each (y = 0, 160, 320, 480)
        assert_eq!(scenery.dashes.len(), 16);
        for dash in &scenery.dashes {
            let offset = (dash.x - ROAD_X) / LANE_WIDTH;
            let boundary = offset.round() as usize;
            assert!((offset - boundary as f32).abs() < 1e-4);
            assert!(DASHED_BOUNDARIES.contains(&boundary), "x={}", dash.x);
        }
    }

    #[test]
    fn placement_respects_the_shoulder_bands() {
        let scenery = scenery(28, 24);
        assert_eq!(scenery.neons.len(), 28);
        assert_eq!(scenery.streaks.len(), 24);
        for neon in &scenery.neons {
            let left = (12.0..=32.0).contains(&neon.x);
            let right = (368.0..=388.0).contains(&neon.x);
            assert!(left || right, "neon off the walls: x={}", neon.x);
        }
        for streak in &scenery.streaks {
            assert!((40.0..=120.0).contains(&streak.h));
        }
    }

    #[test]
    fn placement_is_deterministic_per_seed() {
        let a = scenery(28, 24);
        let b = scenery(28, 24);
        for (na, nb) in a.neons.iter().zip(&b.neons) {
            assert_eq!(na.x, nb.x);
            assert_eq!(na.y, nb.y);
        }
    }

    #[test]
    fn scroll_moves_at_the_two_factors() {
        let mut scenery = scenery(1, 1);
        scenery.dashes[0].y = 100.0;
        scenery.neons[0].y = 100.0;
        scenery.streaks[0].y = 100.0;

        // speed 2, dt_scale 1 frame worth
        scenery.scroll(2.0, 1.0);
        assert!((scenery.dashes[0].y - 108.0).abs() < 1e-4);
        assert!((scenery.neons[0].y - 107.0).abs() < 1e-4);
        assert!((scenery.streaks[0].y - 107.0).abs() < 1e-4);
    }

    #[test]
    fn elements_wrap_back_above_the_canvas() {
        let mut scenery = scenery(1, 1);
        scenery.dashes[0].y = 659.0;
        scenery.neons[0].y = 649.0;
        scenery.streaks[0].y = 699.0;
        let h = scenery.streaks[0].h;

        scenery.scroll(6.0, 1.0);
        assert_eq!(scenery.dashes[0].y, -80.0);
        assert_eq!(scenery.neons[0].y, -30.0);
        assert_eq!(scenery.streaks[0].y, -h);
    }

    #[test]
    fn zero_counts_leave_only_dashes() {
        let scenery = scenery(0, 0);
        assert!(scenery.neons.is_empty());
        assert!(scenery.streaks.is_empty());
        assert!(!scenery.dashes.is_empty());
    }
}

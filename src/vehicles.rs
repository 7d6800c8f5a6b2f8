//! Selectable car catalog
//!
//! Each car has two linked images (game sprite and menu frame) plus a
//! placeholder color used whenever a sprite fails to load. Multipliers
//! feed [`crate::sim::compose_multiplier`] at run start.

/// A selectable car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleDef {
    pub id: u32,
    pub name: &'static str,
    /// Top-down sprite drawn during a run
    pub sprite: &'static str,
    /// Larger frame shown on the selection screen
    pub menu_sprite: &'static str,
    pub free: bool,
    pub score_multiplier: f32,
    /// Solid fill drawn when the sprite is missing or still loading
    pub fallback_color: &'static str,
}

/// All selectable cars, indexed by id
pub const VEHICLES: [VehicleDef; 6] = [
    VehicleDef {
        id: 0,
        name: "ciric",
        sprite: "/cars/car1-game.png",
        menu_sprite: "/cars/car1-menu.png",
        free: true,
        score_multiplier: 1.0,
        fallback_color: "#00a8ff",
    },
    VehicleDef {
        id: 1,
        name: "liner",
        sprite: "/cars/car2-game.png",
        menu_sprite: "/cars/car2-menu.png",
        free: true,
        score_multiplier: 1.0,
        fallback_color: "#00cc88",
    },
    VehicleDef {
        id: 2,
        name: "cilnia",
        sprite: "/cars/car3-game.png",
        menu_sprite: "/cars/car3-menu.png",
        free: true,
        score_multiplier: 1.0,
        fallback_color: "#ff6688",
    },
    VehicleDef {
        id: 3,
        name: "xx7",
        sprite: "/cars/car4-game.png",
        menu_sprite: "/cars/car4-menu.png",
        free: false,
        score_multiplier: 1.5,
        fallback_color: "#ffaa00",
    },
    VehicleDef {
        id: 4,
        name: "pupra",
        sprite: "/cars/car5-game.png",
        menu_sprite: "/cars/car5-menu.png",
        free: false,
        score_multiplier: 2.0,
        fallback_color: "#aa66ff",
    },
    VehicleDef {
        id: 5,
        name: "ltr",
        sprite: "/cars/car6-game.png",
        menu_sprite: "/cars/car6-menu.png",
        free: false,
        score_multiplier: 3.0,
        fallback_color: "#00ffcc",
    },
];

/// Look up a car by id
pub fn vehicle_by_id(id: u32) -> Option<&'static VehicleDef> {
    VEHICLES.iter().find(|v| v.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_catalog_positions() {
        for (i, v) in VEHICLES.iter().enumerate() {
            assert_eq!(v.id as usize, i);
            assert_eq!(vehicle_by_id(v.id), Some(v));
        }
        assert_eq!(vehicle_by_id(99), None);
    }

    #[test]
    fn free_cars_carry_no_multiplier_edge() {
        for v in VEHICLES.iter().filter(|v| v.free) {
            assert_eq!(v.score_multiplier, 1.0);
        }
        for v in VEHICLES.iter().filter(|v| !v.free) {
            assert!(v.score_multiplier > 1.0);
        }
    }
}

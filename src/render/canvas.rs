//! Canvas-2D painter (wasm only)
//!
//! Draws one frame from the simulation world plus the scenery state.
//! Sprites load asynchronously; until an image is complete (or if it
//! never loads) the painter falls back to a solid rectangle of the same
//! size, so a missing asset costs looks, never a frame.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, LANE_WIDTH, PLAYER_HALF_H, PLAYER_HALF_W, PLAYER_Y, ROAD_WIDTH, ROAD_X,
    TRAFFIC_SPRITE_VARIANTS,
};
use crate::render::scenery::{DASH_H, DASH_W, NEON_COLORS, Scenery};
use crate::settings::Settings;
use crate::sim::{Direction, World};
use crate::vehicles::VehicleDef;

const TRAFFIC_DRAW_W: f64 = 38.0;
const TRAFFIC_DRAW_H: f64 = 37.0;
const SAME_DIR_FALLBACK: &str = "#22cc88";
const OPPOSING_FALLBACK: &str = "#ff3355";
const BLINKER_COLOR: &str = "#ffcc33";
const BLINKER_PERIOD_FRAMES: u32 = 20;

/// All images the painter draws, loaded once at startup
pub struct Sprites {
    player: HtmlImageElement,
    traffic_same: Vec<HtmlImageElement>,
    traffic_opposing: Vec<HtmlImageElement>,
    tunnel_bg: HtmlImageElement,
    shoulder: HtmlImageElement,
    asphalt: HtmlImageElement,
    lane_line: HtmlImageElement,
    center_line: HtmlImageElement,
}

impl Sprites {
    /// Kick off loading for every image. Returns immediately; readiness
    /// is checked per draw.
    pub fn load(document: &Document, player_sprite: &str) -> Result<Self, JsValue> {
        let image = |src: &str| -> Result<HtmlImageElement, JsValue> {
            let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
            img.set_src(src);
            Ok(img)
        };
        Ok(Self {
            player: image(player_sprite)?,
            traffic_same: (1..=TRAFFIC_SPRITE_VARIANTS)
                .map(|i| image(&format!("/cars/same{i}.png")))
                .collect::<Result<_, _>>()?,
            traffic_opposing: (1..=TRAFFIC_SPRITE_VARIANTS)
                .map(|i| image(&format!("/cars/opp{i}.png")))
                .collect::<Result<_, _>>()?,
            tunnel_bg: image("/road/tunnel-bg.png")?,
            shoulder: image("/road/shoulder.png")?,
            asphalt: image("/road/asphalt.png")?,
            lane_line: image("/road/lane-line.png")?,
            center_line: image("/road/center-line.png")?,
        })
    }
}

fn ready(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0
}

/// Per-run painter bound to one canvas context
pub struct Painter {
    ctx: CanvasRenderingContext2d,
    sprites: Sprites,
    player_fallback: String,
    glow: bool,
    blinkers: bool,
    frame: u32,
}

impl Painter {
    pub fn new(
        canvas: &HtmlCanvasElement,
        sprites: Sprites,
        vehicle: &VehicleDef,
        settings: &Settings,
    ) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            sprites,
            player_fallback: vehicle.fallback_color.to_string(),
            glow: settings.effective_glow(),
            blinkers: settings.blinkers,
            frame: 0,
        })
    }

    /// Paint one complete frame, back to front
    pub fn draw_frame(&mut self, world: &World, scenery: &Scenery) {
        self.frame = self.frame.wrapping_add(1);
        self.draw_road();
        self.draw_lane_markings(scenery);
        self.draw_decor(scenery);
        self.draw_player(world.player_x);
        self.draw_traffic(world);
    }

    fn draw_road(&self) {
        let ctx = &self.ctx;
        if ready(&self.sprites.tunnel_bg) {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &self.sprites.tunnel_bg,
                0.0,
                0.0,
                CANVAS_WIDTH as f64,
                CANVAS_HEIGHT as f64,
            );
        } else {
            ctx.set_fill_style_str("#0f0f12");
            ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        }

        if ready(&self.sprites.shoulder) {
            let mut y = 0.0;
            while y < CANVAS_HEIGHT as f64 {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &self.sprites.shoulder,
                    25.0,
                    y,
                    50.0,
                    50.0,
                );
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &self.sprites.shoulder,
                    325.0,
                    y,
                    50.0,
                    50.0,
                );
                y += 50.0;
            }
        } else {
            ctx.set_fill_style_str("#1a1a1e");
            ctx.fill_rect(25.0, 0.0, 50.0, CANVAS_HEIGHT as f64);
            ctx.fill_rect(325.0, 0.0, 50.0, CANVAS_HEIGHT as f64);
        }

        if ready(&self.sprites.asphalt) {
            let mut y = 0.0;
            while y < CANVAS_HEIGHT as f64 {
                let mut x = ROAD_X as f64;
                while x < (ROAD_X + ROAD_WIDTH) as f64 {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &self.sprites.asphalt,
                        x,
                        y,
                        100.0,
                        100.0,
                    );
                    x += 100.0;
                }
                y += 100.0;
            }
        } else {
            ctx.set_fill_style_str("#252528");
            ctx.fill_rect(ROAD_X as f64, 0.0, ROAD_WIDTH as f64, CANVAS_HEIGHT as f64);
        }
    }

    fn draw_lane_markings(&self, scenery: &Scenery) {
        let ctx = &self.ctx;
        let dash_sprite_ready = ready(&self.sprites.lane_line);
        if !dash_sprite_ready {
            ctx.set_fill_style_str("#cccccc");
        }
        for dash in &scenery.dashes {
            let x = (dash.x - DASH_W / 2.0) as f64;
            if dash_sprite_ready {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &self.sprites.lane_line,
                    x,
                    dash.y as f64,
                    DASH_W as f64,
                    DASH_H as f64,
                );
            } else {
                ctx.fill_rect(x, dash.y as f64, DASH_W as f64, DASH_H as f64);
            }
        }

        // Solid double center divider between the two directions
        let center = (ROAD_X + LANE_WIDTH * 3.0) as f64;
        if ready(&self.sprites.center_line) {
            for x in [center - 6.0, center + 6.0] {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &self.sprites.center_line,
                    x,
                    0.0,
                    3.0,
                    CANVAS_HEIGHT as f64,
                );
            }
        } else {
            ctx.set_fill_style_str("#ffffff");
            ctx.fill_rect(center - 6.0, 0.0, 3.0, CANVAS_HEIGHT as f64);
            ctx.fill_rect(center + 6.0, 0.0, 3.0, CANVAS_HEIGHT as f64);
        }
    }

    fn draw_decor(&self, scenery: &Scenery) {
        let ctx = &self.ctx;
        for neon in &scenery.neons {
            let color = NEON_COLORS[neon.color_index];
            ctx.set_fill_style_str(color);
            if self.glow {
                ctx.set_shadow_color(color);
                ctx.set_shadow_blur(12.0);
            }
            ctx.begin_path();
            let _ = ctx.arc(
                neon.x as f64,
                neon.y as f64,
                4.0,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
            ctx.set_shadow_blur(0.0);
        }
        for streak in &scenery.streaks {
            let color = NEON_COLORS[streak.color_index];
            ctx.set_fill_style_str(color);
            if self.glow {
                ctx.set_shadow_color(color);
                ctx.set_shadow_blur(10.0);
            }
            ctx.fill_rect(
                (streak.x - 2.0) as f64,
                streak.y as f64,
                4.0,
                streak.h as f64,
            );
            ctx.set_shadow_blur(0.0);
        }
    }

    fn draw_player(&self, player_x: f32) {
        let ctx = &self.ctx;
        // Sprite footprint matches the collision box
        let w = (PLAYER_HALF_W * 2.0) as f64;
        let h = (PLAYER_HALF_H * 2.0) as f64;
        let x = (player_x - PLAYER_HALF_W) as f64;
        let y = (PLAYER_Y - PLAYER_HALF_H) as f64;
        if ready(&self.sprites.player) {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &self.sprites.player,
                x,
                y,
                w,
                h,
            );
        } else {
            ctx.set_fill_style_str(&self.player_fallback);
            if self.glow {
                ctx.set_shadow_color(&self.player_fallback);
                ctx.set_shadow_blur(6.0);
            }
            ctx.fill_rect(x, y, w, h);
            ctx.set_shadow_blur(0.0);
            ctx.set_stroke_style_str("rgba(255,255,255,0.6)");
            ctx.set_line_width(2.0);
            ctx.stroke_rect(x, y, w, h);
        }
    }

    fn draw_traffic(&self, world: &World) {
        let ctx = &self.ctx;
        let blink_on = (self.frame / (BLINKER_PERIOD_FRAMES / 2)) % 2 == 0;
        for vehicle in &world.vehicles {
            let x = vehicle.pos.x as f64 - TRAFFIC_DRAW_W / 2.0;
            let y = vehicle.pos.y as f64 - TRAFFIC_DRAW_H / 2.0;
            let (pool, fallback) = match vehicle.dir {
                Direction::Same => (&self.sprites.traffic_same, SAME_DIR_FALLBACK),
                Direction::Opposing => (&self.sprites.traffic_opposing, OPPOSING_FALLBACK),
            };
            let sprite = &pool[vehicle.sprite_index % pool.len()];
            if ready(sprite) {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    sprite,
                    x,
                    y,
                    TRAFFIC_DRAW_W,
                    TRAFFIC_DRAW_H,
                );
            } else {
                ctx.set_fill_style_str(fallback);
                ctx.fill_rect(x, y, TRAFFIC_DRAW_W, TRAFFIC_DRAW_H);
            }

            if self.blinkers && vehicle.blinker != 0 && blink_on {
                let side = if vehicle.blinker > 0 {
                    x + TRAFFIC_DRAW_W - 3.0
                } else {
                    x - 2.0
                };
                ctx.set_fill_style_str(BLINKER_COLOR);
                ctx.fill_rect(side, y + TRAFFIC_DRAW_H / 2.0 - 2.5, 5.0, 5.0);
            }
        }
    }
}

//! Tunnel Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use tunnel_racer::consts::*;
    use tunnel_racer::highscores::HighScores;
    use tunnel_racer::render::canvas::{Painter, Sprites};
    use tunnel_racer::render::Scenery;
    use tunnel_racer::run::{RunController, RunOptions};
    use tunnel_racer::sim::{spawn_traffic, step_speed, RunPhase, TickInput, Tuning};
    use tunnel_racer::{clamp_to_road, dt_scale, leaderboard, vehicles, Settings};

    /// Interval timer handles. Both must be cleared on every exit path
    /// (crash, reload) or the callbacks keep firing against a dead run.
    #[derive(Default)]
    struct Timers {
        spawn: Option<i32>,
        difficulty: Option<i32>,
    }

    impl Timers {
        fn clear(&mut self) {
            let window = web_sys::window().unwrap();
            if let Some(handle) = self.spawn.take() {
                window.clear_interval_with_handle(handle);
            }
            if let Some(handle) = self.difficulty.take() {
                window.clear_interval_with_handle(handle);
            }
            log::info!("interval timers cleared");
        }

        fn is_armed(&self) -> bool {
            self.spawn.is_some() || self.difficulty.is_some()
        }
    }

    /// Game instance holding all state
    struct Game {
        controller: RunController,
        scenery: Scenery,
        painter: Painter,
        settings: Settings,
        highscores: Rc<RefCell<HighScores>>,
        input: TickInput,
        timers: Timers,
        last_time: f64,
        /// rAF keeps rescheduling while true
        looping: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Run one frame: tick the simulation, scroll the scenery,
        /// paint, refresh the HUD, and tear down on the crash edge.
        fn frame(&mut self, time: f64) {
            let raw_dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            self.last_time = time;

            let was_live = self.controller.world().is_live();
            self.controller.tick(&self.input, raw_dt, js_sys::Date::now());
            if was_live {
                let speed = self.controller.world().speed;
                self.scenery.scroll(speed, dt_scale(raw_dt));
            }

            self.painter
                .draw_frame(self.controller.world(), &self.scenery);
            self.track_fps(time);
            self.update_hud();

            if self.controller.phase() == RunPhase::Crashed && self.timers.is_armed() {
                self.timers.clear();
                self.looping = false;
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.controller.score().to_string()));
            }

            if let Some(el) = document.query_selector("#hud-speed .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.1}", self.controller.world().speed)));
            }

            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                let best = self.highscores.borrow().top_score().unwrap_or(0);
                el.set_text_content(Some(&best.max(self.controller.score()).to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("pause-menu") {
                if self.controller.phase() == RunPhase::Paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if self.controller.phase() == RunPhase::Crashed {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.controller.score().to_string()));
                    }
                    if let Some(rank_el) = document.get_element_by_id("final-rank") {
                        let text = self
                            .highscores
                            .borrow()
                            .potential_rank(self.controller.score())
                            .map(|r| format!("#{r}"))
                            .unwrap_or_default();
                        rank_el.set_text_content(Some(&text));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Quick restart: same vehicle and frozen multiplier, fresh world
        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.controller.reset(seed, js_sys::Date::now());
            self.input = TickInput::default();
            self.last_time = 0.0;
        }
    }

    /// Read the menu's selections out of LocalStorage. The selection
    /// screen is plain DOM and writes these keys before loading the game.
    fn selected_context() -> (&'static vehicles::VehicleDef, String, Option<String>) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        let get = |key: &str| -> Option<String> {
            storage.as_ref().and_then(|s| s.get_item(key).ok()).flatten()
        };
        let vehicle = get("tunnel_racer_vehicle")
            .and_then(|id| id.parse::<u32>().ok())
            .and_then(vehicles::vehicle_by_id)
            .unwrap_or(&vehicles::VEHICLES[0]);
        let nickname = get("tunnel_racer_nickname").unwrap_or_else(|| "player".to_string());
        let avatar = get("tunnel_racer_avatar");
        (vehicle, nickname, avatar)
    }

    /// Per-run bonuses arrive via query string (`?bonus=1&checkin=1.25`),
    /// stamped by the page that launched the run.
    fn run_options() -> RunOptions {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let param = |key: &str| -> Option<String> {
            search
                .trim_start_matches('?')
                .split('&')
                .find_map(|pair| pair.strip_prefix(&format!("{key}=")).map(str::to_string))
        };
        RunOptions {
            check_in_multiplier: param("checkin").and_then(|v| v.parse().ok()),
            bonus_race: param("bonus").is_some_and(|v| v == "1"),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tunnel Racer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let settings = Settings::load();
        let highscores = Rc::new(RefCell::new(HighScores::load()));
        let (vehicle, nickname, avatar) = selected_context();
        let options = run_options();

        let seed = js_sys::Date::now() as u64;
        let mut controller = RunController::start(
            vehicle,
            nickname,
            avatar,
            &options,
            Tuning::default(),
            seed,
            js_sys::Date::now(),
        );

        // End-of-run: submit to the shared leaderboard (fire-and-forget)
        // and fold into the local table. Fires at most once per run.
        {
            let highscores = highscores.clone();
            controller.on_run_end(move |report| {
                leaderboard::submit(&report);
                let mut table = highscores.borrow_mut();
                if let Some(rank) = table.add_run(
                    report.final_score,
                    report.vehicle_id,
                    report.duration_ms,
                    js_sys::Date::now(),
                ) {
                    log::info!("new local high score, rank {rank}");
                }
                table.save();
            });
        }

        let sprites = Sprites::load(&document, vehicle.sprite).expect("sprite elements");
        let painter = Painter::new(&canvas, sprites, vehicle, &settings).expect("2d context");

        let mut decor_rng = rand_pcg::Pcg32::seed_from_u64(seed);
        let scenery = Scenery::new(
            &mut decor_rng,
            settings.neon_count(),
            settings.streak_count(),
        );

        let game = Rc::new(RefCell::new(Game {
            controller,
            scenery,
            painter,
            settings,
            highscores,
            input: TickInput::default(),
            timers: Timers::default(),
            last_time: 0.0,
            looping: true,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        log::info!("Game initialized with seed: {seed}");

        arm_timers(game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_overlay_buttons(game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Tunnel Racer running!");
    }

    /// Install the spawn and difficulty interval timers. Both callbacks
    /// are no-ops while paused or hidden (the world gates itself), so
    /// they only need clearing when the run ends.
    fn arm_timers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        let spawn_handle = {
            let game = game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                spawn_traffic(game.borrow_mut().controller.world_mut());
            });
            let handle = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    SPAWN_INTERVAL_MS,
                )
                .expect("spawn interval");
            closure.forget();
            handle
        };

        let difficulty_handle = {
            let game = game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let mut g = game.borrow_mut();
                let world = g.controller.world_mut();
                if world.is_live() {
                    world.speed = step_speed(world.speed, &world.tuning);
                    log::info!("difficulty up: speed={}", world.speed);
                }
            });
            let handle = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    DIFFICULTY_INTERVAL_MS,
                )
                .expect("difficulty interval");
            closure.forget();
            handle
        };

        let mut g = game.borrow_mut();
        g.timers.spawn = Some(spawn_handle);
        g.timers.difficulty = Some(difficulty_handle);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move: steer to the pointer's canvas x
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let scale = CANVAS_WIDTH as f64 / rect.width().max(1.0);
                let x = (event.client_x() as f64 - rect.left()) * scale;
                game.borrow_mut().input.pointer_x = Some(clamp_to_road(x as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let scale = CANVAS_WIDTH as f64 / rect.width().max(1.0);
                    let x = (touch.client_x() as f64 - rect.left()) * scale;
                    game.borrow_mut().input.pointer_x = Some(clamp_to_road(x as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard pause toggle
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "Escape" | "p" | "P" => game.borrow_mut().controller.toggle_pause(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.frame(time);
            g.looping
        };
        // The crash frame is the last scheduled one; restart re-arms
        if keep_going {
            request_animation_frame(game);
        } else {
            log::info!("frame loop stopped");
        }
    }

    fn setup_overlay_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Restart: fresh world, same vehicle context
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    if g.controller.phase() != RunPhase::Crashed {
                        return;
                    }
                    g.restart();
                    g.looping = true;
                }
                arm_timers(game.clone());
                request_animation_frame(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resume button on the pause menu
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().controller.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back to the selection menu: drop everything via reload
        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().timers.clear();
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize): gates spawning,
        // motion, and scoring; the dt clamp absorbs the gap on return.
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible =
                    document_clone.visibility_state() != web_sys::VisibilityState::Hidden;
                game.borrow_mut().controller.set_visible(visible);
                log::info!("visibility: {}", if visible { "shown" } else { "hidden" });
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.controller.phase() == RunPhase::Running {
                    g.controller.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tunnel_racer::run::{RunController, RunOptions};
    use tunnel_racer::sim::{spawn_traffic, step_speed, RunPhase, TickInput, Tuning};
    use tunnel_racer::vehicles;

    env_logger::init();
    log::info!("Tunnel Racer (native) starting...");
    log::info!("The playable build is wasm - run with `trunk serve` for the web version");

    // Headless demo run: fixed 60fps frames, host timers emulated by
    // frame counting, straight-line steering.
    let vehicle = &vehicles::VEHICLES[0];
    let mut controller = RunController::start(
        vehicle,
        "headless",
        None,
        &RunOptions::default(),
        Tuning::default(),
        0xC0FFEE,
        0.0,
    );
    controller.on_run_end(|report| {
        log::info!(
            "headless run over: score={} duration={}ms",
            report.final_score,
            report.duration_ms
        );
    });

    const FRAME: f32 = 1.0 / 60.0;
    let input = TickInput {
        pointer_x: Some(200.0),
    };
    let mut frame = 0u32;
    while controller.phase() != RunPhase::Crashed && frame < 36_000 {
        if frame % 42 == 0 {
            spawn_traffic(controller.world_mut());
        }
        if frame > 0 && frame % 1800 == 0 {
            let world = controller.world_mut();
            world.speed = step_speed(world.speed, &world.tuning);
        }
        controller.tick(&input, FRAME, frame as f64 * 1000.0 / 60.0);
        frame += 1;
    }
    println!(
        "survived {} frames, final score {}",
        frame,
        controller.score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

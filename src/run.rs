//! Run lifecycle
//!
//! Owns the simulation [`World`] for one play session and the frozen run
//! context (vehicle, nickname, avatar). Drives the tick, handles
//! pause/resume and quick restarts, and fires the end-of-run report
//! exactly once per run. The host owns the scheduling handles (frame
//! callback plus the two interval timers) and must release them on every
//! exit path; this controller stays platform-free so the lifecycle is
//! testable without a browser.

use crate::sim::{RunPhase, TickEvent, TickInput, Tuning, World, compose_multiplier, tick};
use crate::vehicles::VehicleDef;

/// Per-run bonuses, supplied by external collaborators and frozen at start
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Daily check-in streak bonus (the backend sends 1, 1.25, or 1.5)
    pub check_in_multiplier: Option<f32>,
    /// Bonus-race event flag
    pub bonus_race: bool,
}

/// The single end-of-run report, consumed by the leaderboard collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Floored final score
    pub final_score: u64,
    pub vehicle_id: u32,
    pub nickname: String,
    pub avatar: Option<String>,
    /// Wall-clock run length, floored at zero
    pub duration_ms: u64,
}

type RunEndHandler = Box<dyn FnMut(RunReport)>;

/// State machine for one play session:
/// `running -> {paused <-> running} -> crashed -> running (reset)`.
/// Dropping the controller discards the run context entirely.
pub struct RunController {
    world: World,
    vehicle: &'static VehicleDef,
    nickname: String,
    avatar: Option<String>,
    started_at_ms: f64,
    submitted: bool,
    on_run_end: Option<RunEndHandler>,
}

impl RunController {
    /// Start a run: reset all per-run state, freeze the score multiplier,
    /// record the start timestamp, and enter `running`.
    pub fn start(
        vehicle: &'static VehicleDef,
        nickname: impl Into<String>,
        avatar: Option<String>,
        options: &RunOptions,
        tuning: Tuning,
        seed: u64,
        now_ms: f64,
    ) -> Self {
        let multiplier = compose_multiplier(vehicle.score_multiplier, options, &tuning);
        let nickname = nickname.into();
        log::info!(
            "run started: car={} multiplier={multiplier} seed={seed}",
            vehicle.name
        );
        Self {
            world: World::new(tuning, multiplier, seed),
            vehicle,
            nickname,
            avatar,
            started_at_ms: now_ms,
            submitted: false,
            on_run_end: None,
        }
    }

    /// Install the end-of-run callback. Fired at most once per run; must
    /// not block (the leaderboard submission is fire-and-forget).
    pub fn on_run_end(&mut self, handler: impl FnMut(RunReport) + 'static) {
        self.on_run_end = Some(Box::new(handler));
    }

    /// Advance one frame. On the crash transition the final score is
    /// frozen and the report fires, guarded by the submitted flag.
    pub fn tick(&mut self, input: &TickInput, raw_dt: f32, now_ms: f64) -> Vec<TickEvent> {
        let events = tick(&mut self.world, input, raw_dt);
        if events.contains(&TickEvent::Crashed) {
            self.report(now_ms);
        }
        events
    }

    fn report(&mut self, now_ms: f64) {
        if self.submitted {
            return;
        }
        self.submitted = true;
        let report = RunReport {
            final_score: self.world.display_score(),
            vehicle_id: self.vehicle.id,
            nickname: self.nickname.clone(),
            avatar: self.avatar.clone(),
            duration_ms: (now_ms - self.started_at_ms).max(0.0) as u64,
        };
        log::info!(
            "run over: score={} duration={}ms passes={}",
            report.final_score,
            report.duration_ms,
            self.world.passed_count
        );
        if let Some(handler) = self.on_run_end.as_mut() {
            handler(report);
        }
    }

    pub fn pause(&mut self) {
        if self.world.phase == RunPhase::Running {
            self.world.phase = RunPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.world.phase == RunPhase::Paused {
            self.world.phase = RunPhase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.world.phase {
            RunPhase::Running => self.pause(),
            RunPhase::Paused => self.resume(),
            RunPhase::Crashed => {}
        }
    }

    /// Tab visibility, pause-equivalent: spawning, motion, and scoring
    /// are suppressed while hidden, and the dt clamp absorbs the gap on
    /// return so there is no time-jump penalty.
    pub fn set_visible(&mut self, visible: bool) {
        self.world.visible = visible;
    }

    /// Quick restart from `crashed`: same vehicle/nickname/avatar and
    /// frozen multiplier, everything per-run cleared.
    pub fn reset(&mut self, seed: u64, now_ms: f64) {
        self.world.reset(seed);
        self.submitted = false;
        self.started_at_ms = now_ms;
        log::info!("run restarted: seed={seed}");
    }

    pub fn phase(&self) -> RunPhase {
        self.world.phase
    }

    /// Live score for display (floored)
    pub fn score(&self) -> u64 {
        self.world.display_score()
    }

    pub fn is_active(&self) -> bool {
        self.world.phase != RunPhase::Crashed
    }

    pub fn vehicle(&self) -> &'static VehicleDef {
        self.vehicle
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_Y;
    use crate::sim::lanes::{Direction, lane_center};
    use crate::sim::state::Vehicle;
    use crate::vehicles;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME: f32 = 1.0 / 60.0;

    fn controller(vehicle_id: u32, options: &RunOptions) -> RunController {
        let vehicle = vehicles::vehicle_by_id(vehicle_id).unwrap();
        RunController::start(
            vehicle,
            "tester",
            None,
            options,
            Tuning::default(),
            42,
            1_000.0,
        )
    }

    fn reports(ctl: &mut RunController) -> Rc<RefCell<Vec<RunReport>>> {
        let sink = Rc::new(RefCell::new(Vec::new()));
        let clone = sink.clone();
        ctl.on_run_end(move |r| clone.borrow_mut().push(r));
        sink
    }

    fn park_vehicle_on_player(ctl: &mut RunController) {
        let mut v = Vehicle::spawn(1, Direction::Same, 0, 0);
        v.pos.y = PLAYER_Y;
        ctl.world_mut().vehicles.push(v);
    }

    #[test]
    fn start_freezes_the_composed_multiplier() {
        let options = RunOptions {
            check_in_multiplier: Some(1.5),
            bonus_race: true,
        };
        // Car 4 carries a 2x multiplier: 2 x 1.5 x 2.5
        let ctl = controller(4, &options);
        assert!((ctl.world().multiplier - 7.5).abs() < 1e-5);
    }

    #[test]
    fn crash_reports_exactly_once() {
        let mut ctl = controller(0, &RunOptions::default());
        let sink = reports(&mut ctl);
        park_vehicle_on_player(&mut ctl);

        let input = TickInput {
            pointer_x: Some(lane_center(1)),
        };
        ctl.tick(&input, FRAME, 31_000.0);
        assert_eq!(ctl.phase(), RunPhase::Crashed);
        assert!(!ctl.is_active());

        // Further ticks must not re-report
        ctl.tick(&input, FRAME, 32_000.0);
        ctl.tick(&input, FRAME, 33_000.0);

        let reports = sink.borrow();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.vehicle_id, 0);
        assert_eq!(report.nickname, "tester");
        assert_eq!(report.duration_ms, 30_000);
        assert_eq!(report.final_score, ctl.score());
    }

    #[test]
    fn simultaneous_collisions_still_report_once() {
        let mut ctl = controller(0, &RunOptions::default());
        let sink = reports(&mut ctl);
        park_vehicle_on_player(&mut ctl);
        park_vehicle_on_player(&mut ctl);

        let input = TickInput {
            pointer_x: Some(lane_center(1)),
        };
        ctl.tick(&input, FRAME, 2_000.0);
        assert_eq!(sink.borrow().len(), 1);
    }

    #[test]
    fn duration_is_floored_at_zero() {
        let mut ctl = controller(0, &RunOptions::default());
        let sink = reports(&mut ctl);
        park_vehicle_on_player(&mut ctl);
        // Clock skew: crash timestamp before the start timestamp
        ctl.tick(
            &TickInput {
                pointer_x: Some(lane_center(1)),
            },
            FRAME,
            0.0,
        );
        assert_eq!(sink.borrow()[0].duration_ms, 0);
    }

    #[test]
    fn reset_starts_a_fresh_run_with_the_same_context() {
        let mut ctl = controller(5, &RunOptions::default());
        let sink = reports(&mut ctl);
        park_vehicle_on_player(&mut ctl);
        let input = TickInput {
            pointer_x: Some(lane_center(1)),
        };
        ctl.tick(&input, FRAME, 5_000.0);
        assert_eq!(ctl.phase(), RunPhase::Crashed);

        ctl.reset(77, 10_000.0);
        assert_eq!(ctl.phase(), RunPhase::Running);
        assert_eq!(ctl.score(), 0);
        assert!(ctl.world().vehicles.is_empty());
        // Car 5 context and its 3x multiplier survive the reset
        assert_eq!(ctl.vehicle().id, 5);
        assert!((ctl.world().multiplier - 3.0).abs() < 1e-5);

        // A second crash after reset reports again (new run)
        park_vehicle_on_player(&mut ctl);
        ctl.tick(&input, FRAME, 12_500.0);
        let reports = sink.borrow();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].duration_ms, 2_500);
    }

    #[test]
    fn pause_and_resume_gate_the_tick() {
        let mut ctl = controller(0, &RunOptions::default());
        let input = TickInput {
            pointer_x: Some(lane_center(1)),
        };

        ctl.pause();
        assert_eq!(ctl.phase(), RunPhase::Paused);
        ctl.tick(&input, FRAME, 2_000.0);
        assert_eq!(ctl.score(), 0);

        ctl.resume();
        ctl.tick(&input, FRAME, 3_000.0);
        assert!(ctl.world().score > 0.0);

        // Toggle flips between the two live states
        ctl.toggle_pause();
        assert_eq!(ctl.phase(), RunPhase::Paused);
        ctl.toggle_pause();
        assert_eq!(ctl.phase(), RunPhase::Running);
    }

    #[test]
    fn resume_does_not_revive_a_crashed_run() {
        let mut ctl = controller(0, &RunOptions::default());
        park_vehicle_on_player(&mut ctl);
        ctl.tick(
            &TickInput {
                pointer_x: Some(lane_center(1)),
            },
            FRAME,
            2_000.0,
        );
        assert_eq!(ctl.phase(), RunPhase::Crashed);
        ctl.resume();
        ctl.toggle_pause();
        assert_eq!(ctl.phase(), RunPhase::Crashed);
    }

    #[test]
    fn hidden_tab_behaves_like_pause() {
        let mut ctl = controller(0, &RunOptions::default());
        ctl.set_visible(false);
        ctl.tick(
            &TickInput {
                pointer_x: Some(lane_center(1)),
            },
            FRAME,
            2_000.0,
        );
        assert_eq!(ctl.score(), 0);
        ctl.set_visible(true);
        ctl.tick(
            &TickInput {
                pointer_x: Some(lane_center(1)),
            },
            FRAME,
            3_000.0,
        );
        assert!(ctl.score() > 0 || ctl.world().score > 0.0);
    }
}

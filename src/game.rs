//! Session lifecycle and the frame loop.
//!
//! The host page drives the engine through three exports: [`start_game`]
//! kicks off profile loading and, once data arrives, builds the session and
//! schedules the animation-frame loop; [`stop_game`] tears everything down;
//! [`game_state`] reports the current lifecycle state. One session exists at
//! a time, held in a thread local the frame closure re-borrows each tick.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::entities::{AvatarSprite, EnemySpawner, Hero, SpawnConfig};
use crate::input::{InputAggregator, InputMode};
use crate::profile::ProfileDirectory;
use crate::stage::{Stage, TextMeasure};
use crate::viewport::FitViewport;

pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;

const STAGE_FONT: &str = "16px 'Arial'";
const MILLIS_PER_SECOND: f64 = 1000.0;

/// Lifecycle of the one game session.
///
/// `Paused` is reserved; no transition reaches it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Stopped,
    Loading,
    Playing,
    Paused,
}

impl GameState {
    pub fn as_str(self) -> &'static str {
        match self {
            GameState::Stopped => "STOPPED",
            GameState::Loading => "LOADING",
            GameState::Playing => "PLAYING",
            GameState::Paused => "PAUSED",
        }
    }
}

/// Frame timing: delta from consecutive animation-frame timestamps plus a
/// once-per-second frame counter.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    frames: u32,
    second_acc: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now_ms` and return the delta in seconds, plus the frame
    /// count when a full second has elapsed. The first tick and timestamps
    /// running backwards both yield a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> (f64, Option<u32>) {
        let last = self.last_ms.unwrap_or(now_ms);
        let delta = ((now_ms - last) / MILLIS_PER_SECOND).max(0.0);
        self.last_ms = Some(now_ms);

        self.frames += 1;
        self.second_acc += delta;
        let fps = if self.second_acc >= 1.0 {
            self.second_acc = 0.0;
            let frames = self.frames;
            self.frames = 0;
            Some(frames)
        } else {
            None
        };
        (delta, fps)
    }
}

/// Text measurement against the live canvas in the stage's font.
struct CanvasText<'a>(&'a CanvasRenderingContext2d);

impl TextMeasure for CanvasText<'_> {
    fn measure(&self, text: &str) -> (f64, f64) {
        self.0.set_font(STAGE_FONT);
        match self.0.measure_text(text) {
            Ok(metrics) => (
                metrics.width(),
                metrics.actual_bounding_box_ascent() + metrics.actual_bounding_box_descent(),
            ),
            Err(_) => (0.0, 0.0),
        }
    }
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct GameSession {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: FitViewport,
    input: InputAggregator,
    stage: Stage,
    clock: FrameClock,
    frame: Option<i32>,
    // Keeps the frame closure alive for the session's lifetime.
    _tick: FrameCallback,
}

thread_local! {
    static SESSION: std::cell::RefCell<Option<GameSession>> = const { std::cell::RefCell::new(None) };
    static STATE: std::cell::Cell<GameState> = const { std::cell::Cell::new(GameState::Stopped) };
}

fn set_state(state: GameState) {
    STATE.with(|s| s.set(state));
    log::info!("{}", state.as_str());
}

fn current_state() -> GameState {
    STATE.with(|s| s.get())
}

/// Begin a session on `canvas`. `load_profiles` is a host callback returning
/// (a promise of) the profile payload as a JSON string; loading runs
/// asynchronously and the loop starts once it resolves. A failure rolls the
/// state back to STOPPED and alerts the user.
#[wasm_bindgen]
pub fn start_game(canvas: HtmlCanvasElement, load_profiles: js_sys::Function) -> Result<(), JsValue> {
    if current_state() != GameState::Stopped {
        log::warn!("start requested while {}", current_state().as_str());
        return Ok(());
    }

    // A crashed session may have left listeners behind.
    teardown_session();
    set_state(GameState::Loading);

    let pending = match load_profiles.call0(&JsValue::NULL) {
        Ok(pending) => pending,
        Err(err) => {
            abort_loading(&err);
            return Ok(());
        }
    };
    let promise = js_sys::Promise::resolve(&pending);

    spawn_local(async move {
        let outcome = JsFuture::from(promise).await;
        // The host may stop the game while the data is still in flight; a
        // late result must not resurrect the session.
        if current_state() != GameState::Loading {
            log::info!("profile load finished after stop, discarding");
            return;
        }
        match outcome {
            Ok(payload) => {
                if let Err(err) = begin_session(canvas, &payload) {
                    abort_loading(&err);
                } else {
                    set_state(GameState::Playing);
                }
            }
            Err(err) => abort_loading(&err),
        }
    });

    Ok(())
}

/// Roll a failed or abandoned start back to STOPPED.
fn cancel_loading() {
    teardown_session();
    set_state(GameState::Stopped);
}

fn abort_loading(err: &JsValue) {
    cancel_loading();
    log::error!("failed to load chat data: {err:?}");
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message("Failed to load chat data. Please check console.");
    }
}

fn begin_session(canvas: HtmlCanvasElement, payload: &JsValue) -> Result<(), JsValue> {
    let payload = payload
        .as_string()
        .ok_or_else(|| JsValue::from_str("profile payload must be a JSON string"))?;
    let directory = ProfileDirectory::from_json(&payload)?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    canvas.set_width(canvas.client_width() as u32);
    canvas.set_height(canvas.client_height() as u32);

    let mut viewport = FitViewport::new(WORLD_WIDTH, WORLD_HEIGHT)?;
    viewport.resize(canvas.client_width() as f64, canvas.client_height() as f64);

    let mut input = InputAggregator::new(
        &[InputMode::Pointer, InputMode::Keyboard, InputMode::Gamepad],
        &canvas,
    )?;

    let mut stage = Stage::new();
    stage.add_actor(Box::new(EnemySpawner::new(
        directory.enemy_candidates(),
        SpawnConfig::default(),
    )));

    let avatar = match directory.player() {
        Some(profile) => AvatarSprite::for_profile(&profile),
        None => {
            log::warn!("local profile is not displayable, using a placeholder");
            AvatarSprite::caption_only("Unknown")
        }
    };
    let mut hero = Hero::new(avatar);
    hero.set_position(100.0, viewport.world_height() - 300.0);
    stage.add_actor(Box::new(hero));

    // Listeners install last, after every fallible setup step.
    input.activate();
    let (tick, first_frame) = schedule_loop();
    SESSION.with(|cell| {
        cell.replace(Some(GameSession {
            canvas,
            ctx,
            viewport,
            input,
            stage,
            clock: FrameClock::new(),
            // Holding the first handle lets a stop that lands before the
            // first frame cancel it, instead of leaving the browser with a
            // callback into a dropped closure.
            frame: first_frame,
            _tick: tick,
        }))
    });
    Ok(())
}

fn schedule_loop() -> (FrameCallback, Option<i32>) {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if current_state() != GameState::Playing {
            return;
        }
        SESSION.with(|cell| {
            if let Some(session) = cell.borrow_mut().as_mut() {
                frame_tick(session, ts);
            }
        });
        if let Some(w) = web_sys::window() {
            if let Ok(handle) =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            {
                SESSION.with(|cell| {
                    if let Some(session) = cell.borrow_mut().as_mut() {
                        session.frame = Some(handle);
                    }
                });
            }
        }
    }) as Box<dyn FnMut(f64)>));
    let first = web_sys::window().and_then(|w| {
        w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .ok()
    });
    (g, first)
}

fn frame_tick(session: &mut GameSession, now_ms: f64) {
    let (delta, fps) = session.clock.tick(now_ms);
    if let Some(fps) = fps {
        log::debug!("FPS: {fps}");
    }

    let input = session.input.poll(delta);
    let measure = CanvasText(&session.ctx);
    session
        .stage
        .act(delta, &input, &session.viewport, &measure);

    // Track the surface size every frame; the host page resizes freely.
    session.canvas.set_width(session.canvas.client_width() as u32);
    session.canvas.set_height(session.canvas.client_height() as u32);
    session.viewport.resize(
        session.canvas.client_width() as f64,
        session.canvas.client_height() as f64,
    );

    let ctx = &session.ctx;
    let _ = ctx.reset_transform();
    ctx.clear_rect(
        0.0,
        0.0,
        session.canvas.width() as f64,
        session.canvas.height() as f64,
    );
    ctx.save();
    let _ = ctx.translate(session.viewport.offset_x(), session.viewport.offset_y());
    let _ = ctx.scale(session.viewport.scale(), session.viewport.scale());

    ctx.set_stroke_style_str("blue");
    ctx.stroke_rect(
        0.0,
        0.0,
        session.viewport.world_width(),
        session.viewport.world_height(),
    );

    session.stage.draw(ctx);

    ctx.restore();
}

/// Drop the current session, restoring listeners, cancelling the pending
/// animation frame and clearing the canvas. Returns whether one existed.
fn teardown_session() -> bool {
    let Some(mut session) = SESSION.with(|cell| cell.take()) else {
        return false;
    };
    session.input.deactivate();
    if let Some(handle) = session.frame.take() {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle);
        }
    }
    let _ = session.ctx.reset_transform();
    session.ctx.clear_rect(
        0.0,
        0.0,
        session.canvas.width() as f64,
        session.canvas.height() as f64,
    );
    true
}

/// Stop the running session. Stopping twice logs an anomaly and does nothing
/// else.
#[wasm_bindgen]
pub fn stop_game() {
    set_state(GameState::Stopped);
    if !teardown_session() {
        log::error!("no game to stop");
    }
}

/// Current lifecycle state as its screaming-case name.
#[wasm_bindgen]
pub fn game_state() -> String {
    current_state().as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // State-machine tests rely on the test harness giving each test its own
    // thread, and with it fresh thread-local state.

    #[test]
    fn stop_while_loading_wins_over_a_late_load_result() {
        set_state(GameState::Loading);
        stop_game();
        // A resolving profile promise re-checks the state before building
        // the session; after the stop it must not find LOADING anymore.
        assert_eq!(current_state(), GameState::Stopped);
        assert_eq!(game_state(), "STOPPED");
    }

    #[test]
    fn failed_start_rolls_back_to_stopped() {
        set_state(GameState::Loading);
        cancel_loading();
        assert_eq!(current_state(), GameState::Stopped);
        // A retry is not refused afterwards.
        assert_ne!(game_state(), "LOADING");
    }

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        let (delta, fps) = clock.tick(123.0);
        assert_eq!(delta, 0.0);
        assert_eq!(fps, None);
    }

    #[test]
    fn delta_is_seconds_between_timestamps() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        let (delta, _) = clock.tick(1016.0);
        assert!((delta - 0.016).abs() < 1e-9);
    }

    #[test]
    fn backwards_timestamp_clamps_to_zero() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        let (delta, _) = clock.tick(900.0);
        assert_eq!(delta, 0.0);
    }

    #[test]
    fn fps_reported_once_per_second() {
        let mut clock = FrameClock::new();
        let mut now = 0.0;
        clock.tick(now);
        let mut reports = Vec::new();
        for _ in 0..150 {
            now += 1000.0 / 60.0;
            if let (_, Some(fps)) = clock.tick(now) {
                reports.push(fps);
            }
        }
        // 150 simulated frames at 60 fps cover two full seconds.
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|&fps| (59..=62).contains(&fps)));
    }
}

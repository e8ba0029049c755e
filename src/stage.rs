//! Actor roster with deterministic per-frame processing.
//!
//! A [`Stage`] owns boxed [`Actor`]s in insertion order. Per frame it runs
//! every actor's `act` once and then every actor's `draw` once, in that
//! order. Actors never hold references to each other; cross-actor effects go
//! through [`ActCtx`] commands (spawn, kill, remove) that the stage applies
//! between actors, so the roster is never mutated while an actor borrows it.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use web_sys::CanvasRenderingContext2d;

use crate::input::InputSnapshot;
use crate::viewport::FitViewport;

const ACTOR_ID_LEN: usize = 24;

/// Random alphanumeric actor handle, unique within one stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorId(String);

impl ActorId {
    fn random() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ACTOR_ID_LEN)
            .map(char::from)
            .collect();
        ActorId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Axis-aligned box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Position, extent and visibility shared by every actor. `id` is the stage
/// attachment handle; it is `None` until the actor joins a stage.
#[derive(Debug, Clone, Default)]
pub struct ActorBody {
    pub id: Option<ActorId>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
}

impl ActorBody {
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Text extent probe. The canvas 2d context implements this on wasm; tests
/// substitute a fixed-metrics stand-in.
pub trait TextMeasure {
    /// Width and height of `text` in the stage's current font.
    fn measure(&self, text: &str) -> (f64, f64);
}

/// Fixed per-character metrics for native tests and headless sizing.
#[derive(Debug, Clone, Copy)]
pub struct FixedTextMeasure {
    pub char_width: f64,
    pub line_height: f64,
}

impl TextMeasure for FixedTextMeasure {
    fn measure(&self, text: &str) -> (f64, f64) {
        (text.chars().count() as f64 * self.char_width, self.line_height)
    }
}

/// A hittable target as seen by other actors during one `act` pass.
#[derive(Debug, Clone)]
pub struct TargetBox {
    pub id: ActorId,
    pub bounds: Rect,
}

enum StageCommand {
    Spawn(Box<dyn Actor>),
    Kill(ActorId),
    Remove(ActorId),
}

/// Everything an actor may observe or request during its `act` slot.
pub struct ActCtx<'a> {
    pub delta: f64,
    pub input: &'a InputSnapshot,
    viewport: &'a FitViewport,
    targets: &'a [TargetBox],
    measure: &'a dyn TextMeasure,
    commands: &'a mut Vec<StageCommand>,
}

impl<'a> ActCtx<'a> {
    pub fn world_width(&self) -> f64 {
        self.viewport.world_width()
    }

    pub fn world_height(&self) -> f64 {
        self.viewport.world_height()
    }

    pub fn viewport(&self) -> &'a FitViewport {
        self.viewport
    }

    /// Hittable boxes of the other actors, captured before this `act` slot.
    pub fn targets(&self) -> &'a [TargetBox] {
        self.targets
    }

    pub fn measure_text(&self, text: &str) -> (f64, f64) {
        self.measure.measure(text)
    }

    /// Add an actor after the current slot. The newcomer is drawn this frame
    /// but acts for the first time next frame.
    pub fn spawn(&mut self, actor: Box<dyn Actor>) {
        self.commands.push(StageCommand::Spawn(actor));
    }

    /// Retire an actor through its death hook. Killing an id twice in one
    /// frame runs the hook once; the second request finds nothing.
    pub fn kill(&mut self, id: ActorId) {
        self.commands.push(StageCommand::Kill(id));
    }

    /// Silently detach an actor without the death hook (e.g. a bullet
    /// leaving the world).
    pub fn remove(&mut self, id: ActorId) {
        self.commands.push(StageCommand::Remove(id));
    }
}

pub trait Actor {
    fn body(&self) -> &ActorBody;
    fn body_mut(&mut self) -> &mut ActorBody;

    fn act(&mut self, _ctx: &mut ActCtx<'_>) {}

    fn draw(&self, _ctx: &CanvasRenderingContext2d) {}

    /// Hit box offered to projectiles; `None` means not hittable.
    fn target_box(&self) -> Option<Rect> {
        None
    }

    /// Runs exactly once when the actor is killed (not on plain removal).
    fn on_death(&mut self) {}
}

struct Slot {
    id: ActorId,
    // Empty only while the actor runs its own `act`.
    actor: Option<Box<dyn Actor>>,
}

#[derive(Default)]
pub struct Stage {
    slots: Vec<Slot>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: &ActorId) -> bool {
        self.slots.iter().any(|s| s.id == *id)
    }

    /// Attach an actor at the end of the roster and hand it its id. Ids are
    /// drawn randomly and re-drawn on the (astronomically unlikely) collision
    /// with a current member.
    pub fn add_actor(&mut self, mut actor: Box<dyn Actor>) -> ActorId {
        let mut id = ActorId::random();
        while self.contains(&id) {
            id = ActorId::random();
        }
        actor.body_mut().id = Some(id.clone());
        self.slots.push(Slot {
            id: id.clone(),
            actor: Some(actor),
        });
        id
    }

    /// Detach by id. Unknown ids are logged and ignored so double removal in
    /// one frame is harmless.
    pub fn remove_actor(&mut self, id: &ActorId) -> Option<Box<dyn Actor>> {
        let pos = self.slots.iter().position(|s| s.id == *id);
        match pos {
            Some(pos) => {
                let mut slot = self.slots.remove(pos);
                if let Some(actor) = slot.actor.as_mut() {
                    actor.body_mut().id = None;
                }
                slot.actor
            }
            None => {
                log::warn!("tried to remove actor {id} which is not on the stage");
                None
            }
        }
    }

    fn collect_targets(&self, except: &ActorId) -> Vec<TargetBox> {
        self.slots
            .iter()
            .filter(|s| s.id != *except)
            .filter_map(|s| {
                let actor = s.actor.as_ref()?;
                let bounds = actor.target_box()?;
                Some(TargetBox {
                    id: s.id.clone(),
                    bounds,
                })
            })
            .collect()
    }

    /// Run one `act` pass. The roster is snapshotted up front, so actors
    /// spawned during the pass do not act this frame and actors removed
    /// mid-pass are skipped when their slot comes up. Commands queued by an
    /// actor are applied before the next actor runs.
    pub fn act(
        &mut self,
        delta: f64,
        input: &InputSnapshot,
        viewport: &FitViewport,
        measure: &dyn TextMeasure,
    ) {
        let roster: Vec<ActorId> = self.slots.iter().map(|s| s.id.clone()).collect();
        let mut commands = Vec::new();

        for id in roster {
            let Some(pos) = self.slots.iter().position(|s| s.id == id) else {
                continue;
            };
            let Some(mut actor) = self.slots[pos].actor.take() else {
                continue;
            };

            let targets = self.collect_targets(&id);
            {
                let mut ctx = ActCtx {
                    delta,
                    input,
                    viewport,
                    targets: &targets,
                    measure,
                    commands: &mut commands,
                };
                actor.act(&mut ctx);
            }

            // The slot cannot have moved while the actor was out; commands
            // only apply afterwards.
            self.slots[pos].actor = Some(actor);
            self.apply_commands(&mut commands);
        }
    }

    fn apply_commands(&mut self, commands: &mut Vec<StageCommand>) {
        for command in commands.drain(..) {
            match command {
                StageCommand::Spawn(actor) => {
                    self.add_actor(actor);
                }
                StageCommand::Kill(id) => {
                    if self.contains(&id) {
                        if let Some(mut actor) = self.remove_actor(&id) {
                            actor.on_death();
                        }
                    }
                }
                StageCommand::Remove(id) => {
                    self.remove_actor(&id);
                }
            }
        }
    }

    /// Draw every visible actor in insertion order.
    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        for slot in &self.slots {
            if let Some(actor) = slot.actor.as_ref() {
                if actor.body().visible {
                    actor.draw(ctx);
                }
            }
        }
    }

    /// Ids in insertion order, for diagnostics and tests.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.slots.iter().map(|s| s.id.clone()).collect()
    }

    pub fn actor(&self, id: &ActorId) -> Option<&dyn Actor> {
        self.slots
            .iter()
            .find(|s| s.id == *id)
            .and_then(|s| s.actor.as_deref())
    }
}

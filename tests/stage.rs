// Stage / actor-roster tests (native) for the `chat-arcade` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chat_arcade::input::InputSnapshot;
use chat_arcade::stage::{ActCtx, Actor, ActorBody, ActorId, FixedTextMeasure, Rect, Stage};
use chat_arcade::viewport::FitViewport;

const MEASURE: FixedTextMeasure = FixedTextMeasure {
    char_width: 8.0,
    line_height: 16.0,
};

fn world() -> FitViewport {
    let mut viewport = FitViewport::new(800.0, 600.0).unwrap();
    viewport.resize(800.0, 600.0);
    viewport
}

/// Test actor that records when it acts and can run an arbitrary script
/// against the act context.
struct Probe {
    body: ActorBody,
    name: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
    deaths: Rc<Cell<usize>>,
    script: Option<Box<dyn FnMut(&mut ActCtx<'_>)>>,
}

impl Probe {
    fn new(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Self {
        Self {
            body: ActorBody::default(),
            name,
            log: log.clone(),
            deaths: Rc::new(Cell::new(0)),
            script: None,
        }
    }

    fn scripted(
        name: &'static str,
        log: &Rc<RefCell<Vec<&'static str>>>,
        script: impl FnMut(&mut ActCtx<'_>) + 'static,
    ) -> Self {
        let mut probe = Self::new(name, log);
        probe.script = Some(Box::new(script));
        probe
    }
}

impl Actor for Probe {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn act(&mut self, ctx: &mut ActCtx<'_>) {
        self.log.borrow_mut().push(self.name);
        if let Some(script) = self.script.as_mut() {
            script(ctx);
        }
    }

    fn target_box(&self) -> Option<Rect> {
        Some(self.body.bounds())
    }

    fn on_death(&mut self) {
        self.deaths.set(self.deaths.get() + 1);
    }
}

#[test]
fn actor_ids_are_unique_24_char_alphanumerics() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut stage = Stage::new();
    let mut ids = Vec::new();
    for _ in 0..50 {
        ids.push(stage.add_actor(Box::new(Probe::new("p", &log))));
    }
    for id in &ids {
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }
    let mut deduped: Vec<_> = ids.iter().map(|id| id.as_str().to_string()).collect();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
}

#[test]
fn actors_act_in_insertion_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let viewport = world();
    let mut stage = Stage::new();
    stage.add_actor(Box::new(Probe::new("a", &log)));
    stage.add_actor(Box::new(Probe::new("b", &log)));
    stage.add_actor(Box::new(Probe::new("c", &log)));

    stage.act(0.016, &InputSnapshot::default(), &viewport, &MEASURE);
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn actor_spawned_during_a_frame_first_acts_next_frame() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let viewport = world();
    let mut stage = Stage::new();

    let spawn_log = log.clone();
    let mut spawned = false;
    stage.add_actor(Box::new(Probe::scripted("parent", &log, move |ctx| {
        if !spawned {
            spawned = true;
            ctx.spawn(Box::new(Probe::new("child", &spawn_log)));
        }
    })));

    stage.act(0.016, &InputSnapshot::default(), &viewport, &MEASURE);
    // The child joined mid-frame but its act slot was not in the roster.
    assert_eq!(stage.len(), 2);
    assert_eq!(*log.borrow(), vec!["parent"]);

    stage.act(0.016, &InputSnapshot::default(), &viewport, &MEASURE);
    assert_eq!(*log.borrow(), vec!["parent", "parent", "child"]);
}

#[test]
fn killed_actor_dies_once_and_skips_its_act() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let viewport = world();
    let mut stage = Stage::new();

    // The killer acts first; its target id is filled in once known.
    let target: Rc<RefCell<Option<ActorId>>> = Rc::new(RefCell::new(None));
    let kill_target = target.clone();
    stage.add_actor(Box::new(Probe::scripted("killer", &log, move |ctx| {
        if let Some(id) = kill_target.borrow().clone() {
            ctx.kill(id.clone());
            ctx.kill(id);
        }
    })));

    let victim = Probe::new("victim", &log);
    let deaths = victim.deaths.clone();
    let victim_id = stage.add_actor(Box::new(victim));
    *target.borrow_mut() = Some(victim_id.clone());

    stage.act(0.016, &InputSnapshot::default(), &viewport, &MEASURE);

    assert_eq!(*log.borrow(), vec!["killer"]);
    assert_eq!(deaths.get(), 1);
    assert_eq!(stage.len(), 1);
    assert!(!stage.contains(&victim_id));
}

#[test]
fn removing_a_foreign_id_is_a_no_op() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut other = Stage::new();
    let foreign = other.add_actor(Box::new(Probe::new("x", &log)));

    let mut stage = Stage::new();
    stage.add_actor(Box::new(Probe::new("y", &log)));
    assert!(stage.remove_actor(&foreign).is_none());
    assert_eq!(stage.len(), 1);
}

#[test]
fn removal_clears_the_actor_attachment() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut stage = Stage::new();
    let id = stage.add_actor(Box::new(Probe::new("p", &log)));
    let actor = stage.remove_actor(&id).unwrap();
    assert!(actor.body().id.is_none());
    assert!(!stage.contains(&id));
}

#[test]
fn rect_contains_is_edge_inclusive() {
    let rect = Rect {
        x: 10.0,
        y: 20.0,
        width: 30.0,
        height: 40.0,
    };
    assert!(rect.contains(10.0, 20.0));
    assert!(rect.contains(40.0, 60.0));
    assert!(rect.contains(25.0, 30.0));
    assert!(!rect.contains(9.9, 30.0));
    assert!(!rect.contains(25.0, 60.1));
}

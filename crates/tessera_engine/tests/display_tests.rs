//! Lifecycle tests for GridDisplay and DisplayController, driven through
//! mock collaborators over the unit graphics context.

use std::sync::{mpsc::Sender, Arc};

use parking_lot::Mutex;
use tessera_engine::{
    Compile, DisplayController, DisplayServices, EngineResult, Grid, GridDisplay, Inspect,
    Operation, Persistence, PixelBounds, Rect, Surface, Thumbnail, Tile, TileNode, ViewportState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Compile(u64),
    Dispose(u64),
    StartFrame,
    FactoryRun,
}

type Log = Arc<Mutex<Vec<Event>>>;

const BOUNDS: PixelBounds = PixelBounds {
    x: 0,
    y: 0,
    width: 400,
    height: 400,
};

struct MockTile {
    id: u64,
    log: Log,
}

impl Tile<()> for MockTile {
    fn draw(&mut self, _ctx: &(), _bounds: PixelBounds, _time: f32, _dst: Rect, _src: Rect) {}

    fn dispose(&mut self, _ctx: &()) {
        self.log.lock().push(Event::Dispose(self.id));
    }
}

struct MockCompiler {
    log: Log,
    next_id: u64,
}

impl Compile<()> for MockCompiler {
    fn compile(&mut self, _ctx: &(), _source: &str) -> EngineResult<Box<dyn Tile<()>>> {
        let id = self.next_id;
        self.next_id += 1;
        self.log.lock().push(Event::Compile(id));
        Ok(Box::new(MockTile {
            id,
            log: self.log.clone(),
        }))
    }
}

struct MockSurface {
    log: Log,
}

impl Surface<()> for MockSurface {
    fn start_frame(&mut self, _ctx: &(), _bounds: PixelBounds) {
        self.log.lock().push(Event::StartFrame);
    }
}

#[derive(Default)]
struct MockPersistence {
    saves: Arc<Mutex<Vec<TileNode>>>,
    open_senders: Arc<Mutex<Vec<Sender<TileNode>>>>,
}

impl Persistence for MockPersistence {
    fn save(&mut self, node: &TileNode, _thumbnail: Option<Thumbnail>) -> EngineResult<()> {
        self.saves.lock().push(node.clone());
        Ok(())
    }

    fn open(&mut self, reply: Sender<TileNode>) -> EngineResult<()> {
        self.open_senders.lock().push(reply);
        Ok(())
    }
}

#[derive(Default)]
struct MockInspector {
    last: Arc<Mutex<Option<String>>>,
}

impl Inspect for MockInspector {
    fn inspect(&mut self, body: &str) {
        *self.last.lock() = Some(body.to_string());
    }
}

struct Harness {
    log: Log,
    controller: DisplayController<()>,
    saves: Arc<Mutex<Vec<TileNode>>>,
    open_senders: Arc<Mutex<Vec<Sender<TileNode>>>>,
    inspected: Arc<Mutex<Option<String>>>,
}

fn harness() -> Harness {
    let log: Log = Arc::default();
    let persistence = MockPersistence::default();
    let inspector = MockInspector::default();
    let saves = persistence.saves.clone();
    let open_senders = persistence.open_senders.clone();
    let inspected = inspector.last.clone();
    let services = DisplayServices::<()> {
        viewport: ViewportState::default().shared(),
        compiler: Arc::new(Mutex::new(MockCompiler {
            log: log.clone(),
            next_id: 0,
        })),
        persistence: Arc::new(Mutex::new(persistence)),
        inspector: Arc::new(Mutex::new(inspector)),
    };
    let controller = DisplayController::new(services, Box::new(MockSurface { log: log.clone() }));
    Harness {
        log,
        controller,
        saves,
        open_senders,
        inspected,
    }
}

fn with_grid() -> Harness {
    let mut h = harness();
    h.controller
        .set_display(&(), GridDisplay::factory(TileNode::seed_grid()))
        .unwrap();
    h
}

fn set_operation(h: &Harness, operation: Operation) {
    h.controller.viewport().lock().operation = operation;
}

fn compiles(log: &Log) -> usize {
    log.lock().iter().filter(|e| matches!(e, Event::Compile(_))).count()
}

fn disposes(log: &Log) -> usize {
    log.lock().iter().filter(|e| matches!(e, Event::Dispose(_))).count()
}

#[test]
fn test_grid_construction_compiles_25_tiles() {
    let h = with_grid();
    assert_eq!(compiles(&h.log), 25);
    assert_eq!(disposes(&h.log), 0);
}

#[test]
fn test_dispose_releases_exactly_25_tiles() {
    let mut h = with_grid();
    h.controller.dispose(&());
    assert_eq!(disposes(&h.log), 25);
    assert!(!h.controller.has_display());
}

#[test]
fn test_click_after_dispose_routes_nowhere() {
    let mut h = with_grid();
    h.controller.dispose(&());
    let before = h.log.lock().len();
    set_operation(&h, Operation::Variations);
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    assert_eq!(h.log.lock().len(), before);
}

#[test]
fn test_swap_disposes_old_display_before_factory_runs() {
    let mut h = with_grid();
    let log = h.log.clone();
    h.controller
        .set_display(
            &(),
            Box::new(move |ctx, services| {
                log.lock().push(Event::FactoryRun);
                GridDisplay::factory(TileNode::seed_grid())(ctx, services)
            }),
        )
        .unwrap();

    let events = h.log.lock().clone();
    let factory_pos = events.iter().position(|e| *e == Event::FactoryRun).unwrap();
    let disposes_before = events[..factory_pos]
        .iter()
        .filter(|e| matches!(e, Event::Dispose(_)))
        .count();
    assert_eq!(disposes_before, 25);
    // and the new grid compiled after the old one was gone
    assert_eq!(compiles(&h.log), 50);
}

#[test]
fn test_variations_click_spawns_a_new_grid() {
    let mut h = with_grid();
    set_operation(&h, Operation::Variations);
    h.controller
        .handle_click(&(), (200.0, 200.0), (400.0, 400.0))
        .unwrap();
    assert_eq!(compiles(&h.log), 50);
    assert_eq!(disposes(&h.log), 25);
    assert!(h.controller.has_display());
}

#[test]
fn test_save_click_hands_node_to_persistence_without_grid_change() {
    let mut h = with_grid();
    set_operation(&h, Operation::Save);
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    assert_eq!(h.saves.lock().len(), 1);
    assert_eq!(compiles(&h.log), 25);
    assert_eq!(disposes(&h.log), 0);
}

#[test]
fn test_inspect_click_presents_the_node_as_json() {
    let mut h = with_grid();
    set_operation(&h, Operation::Inspect);
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    let body = h.inspected.lock().clone().unwrap();
    assert!(serde_json::from_str::<TileNode>(&body).is_ok());
}

#[test]
fn test_pan_click_is_a_no_op() {
    let mut h = with_grid();
    set_operation(&h, Operation::Pan);
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    assert_eq!(compiles(&h.log), 25);
    assert_eq!(disposes(&h.log), 0);
    assert!(h.saves.lock().is_empty());
}

#[test]
fn test_far_edge_click_operates_on_the_edge_cell() {
    let mut h = harness();
    h.controller
        .set_display(
            &(),
            GridDisplay::factory(Grid::from_fn(|row, col| {
                TileNode::Const((row * 10 + col) as f32)
            })),
        )
        .unwrap();
    set_operation(&h, Operation::Save);
    h.controller
        .handle_click(&(), (400.0, 10.0), (400.0, 400.0))
        .unwrap();
    h.controller
        .handle_click(&(), (10.0, 400.0), (400.0, 400.0))
        .unwrap();
    let saves = h.saves.lock();
    assert_eq!(saves[0], TileNode::Const(4.0));
    assert_eq!(saves[1], TileNode::Const(40.0));
}

#[test]
fn test_open_completion_replaces_the_cell() {
    let mut h = with_grid();
    set_operation(&h, Operation::Open);
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    // nothing happens until the load resolves
    assert_eq!(compiles(&h.log), 25);

    let sender = h.open_senders.lock().remove(0);
    sender.send(TileNode::random()).unwrap();
    h.controller.draw(&(), BOUNDS);

    assert_eq!(compiles(&h.log), 26);
    assert_eq!(disposes(&h.log), 1);
}

#[test]
fn test_replacing_twice_disposes_first_before_second_compile() {
    let mut h = with_grid();
    set_operation(&h, Operation::Open);
    let node = TileNode::random();
    for _ in 0..2 {
        h.controller
            .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
            .unwrap();
        let sender = h.open_senders.lock().remove(0);
        sender.send(node.clone()).unwrap();
        h.controller.draw(&(), BOUNDS);
    }

    // same node twice still yields two distinct compiled tiles
    assert_eq!(compiles(&h.log), 27);
    assert_eq!(disposes(&h.log), 2);

    let events = h.log.lock().clone();
    let second_compile = events.iter().position(|e| *e == Event::Compile(26)).unwrap();
    let first_dispose = events.iter().position(|e| *e == Event::Dispose(25)).unwrap();
    assert!(first_dispose < second_compile);
}

#[test]
fn test_stale_open_completion_is_discarded() {
    let mut h = with_grid();
    set_operation(&h, Operation::Open);
    // two loads race for the same cell
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    let first = h.open_senders.lock().remove(0);
    let second = h.open_senders.lock().remove(0);

    second.send(TileNode::random()).unwrap();
    h.controller.draw(&(), BOUNDS);
    assert_eq!(compiles(&h.log), 26);

    // the earlier request resolves after the cell moved on
    first.send(TileNode::random()).unwrap();
    h.controller.draw(&(), BOUNDS);
    assert_eq!(compiles(&h.log), 26);
    assert_eq!(disposes(&h.log), 1);
}

#[test]
fn test_open_completion_applies_even_on_skipped_frames() {
    let mut h = with_grid();
    h.controller.viewport().lock().set_frame_rate_reduction(10);
    set_operation(&h, Operation::Open);
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    let sender = h.open_senders.lock().remove(0);
    sender.send(TileNode::random()).unwrap();

    // first tick of 10 renders nothing, but the load still lands
    h.controller.draw(&(), BOUNDS);
    let frames = h
        .log
        .lock()
        .iter()
        .filter(|e| **e == Event::StartFrame)
        .count();
    assert_eq!(frames, 0);
    assert_eq!(compiles(&h.log), 26);
    assert_eq!(disposes(&h.log), 1);
}

#[test]
fn test_cancelled_open_leaves_the_cell_untouched() {
    let mut h = with_grid();
    set_operation(&h, Operation::Open);
    h.controller
        .handle_click(&(), (10.0, 10.0), (400.0, 400.0))
        .unwrap();
    h.open_senders.lock().clear(); // dialog dismissed
    h.controller.draw(&(), BOUNDS);
    assert_eq!(compiles(&h.log), 25);
    assert_eq!(disposes(&h.log), 0);
}

#[test]
fn test_frame_rate_reduction_skips_ticks() {
    let mut h = with_grid();
    h.controller.viewport().lock().set_frame_rate_reduction(3);
    for _ in 0..9 {
        h.controller.draw(&(), BOUNDS);
    }
    let frames = h
        .log
        .lock()
        .iter()
        .filter(|e| **e == Event::StartFrame)
        .count();
    assert_eq!(frames, 3);
}

#[test]
fn test_wheel_zoom_reaches_clamp() {
    let mut h = harness();
    for _ in 0..100 {
        h.controller.handle_wheel(-1.0);
    }
    assert_eq!(h.controller.viewport().lock().zoom(), tessera_engine::ZOOM_MIN);
    for _ in 0..100 {
        h.controller.handle_wheel(1.0);
    }
    assert_eq!(h.controller.viewport().lock().zoom(), tessera_engine::ZOOM_MAX);
}

#[test]
fn test_pointer_move_pans_only_with_pan_operation_and_button() {
    let mut h = harness();
    set_operation(&h, Operation::Inspect);
    h.controller
        .handle_pointer_move((10.0, 0.0), (400.0, 400.0), true);
    assert_eq!(h.controller.viewport().lock().center, (0.0, 0.0));

    set_operation(&h, Operation::Pan);
    h.controller
        .handle_pointer_move((10.0, 0.0), (400.0, 400.0), false);
    assert_eq!(h.controller.viewport().lock().center, (0.0, 0.0));

    h.controller
        .handle_pointer_move((10.0, 0.0), (400.0, 400.0), true);
    assert!((h.controller.viewport().lock().center.0 - (-0.5)).abs() < 1e-6);
}

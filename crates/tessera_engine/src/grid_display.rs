use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::{
    cell_at, cell_rect, cell_window, glsl, grid_positions, Display, DisplayFactory,
    DisplayServices, EngineResult, Grid, Operation, PixelBounds, Tile, TileNode,
};

/// Thumbnail resolution hint handed to persistence on save.
pub const SAVE_THUMBNAIL_SIZE: u32 = 200;

struct PendingLoad {
    row: usize,
    col: usize,
    /// Cell generation at request time; a completion arriving after the
    /// cell was replaced is stale and gets discarded.
    generation: u64,
    rx: Receiver<TileNode>,
}

/// One 5×5 tile matrix bound to the shared viewport.
///
/// Exclusively owns the compiled programs of all its cells; a cell holding
/// `None` (failed or not-yet-completed compile) is skipped by the
/// renderer.
pub struct GridDisplay<C> {
    nodes: Grid<TileNode>,
    tiles: Grid<Option<Box<dyn Tile<C>>>>,
    generations: Grid<u64>,
    pending: Vec<PendingLoad>,
    services: DisplayServices<C>,
}

impl<C: 'static> GridDisplay<C> {
    pub fn new(ctx: &C, nodes: Grid<TileNode>, services: DisplayServices<C>) -> Self {
        let tiles = {
            let mut compiler = services.compiler.lock();
            nodes.map(|row, col, node| match compiler.compile(ctx, &glsl::fragment_source(node)) {
                Ok(tile) => Some(tile),
                Err(err) => {
                    log::error!("compiling tile ({row}, {col}) failed: {err}");
                    None
                }
            })
        };
        Self {
            nodes,
            tiles,
            generations: Grid::from_fn(|_, _| 0),
            pending: Vec::new(),
            services,
        }
    }

    /// Factory form used for display swaps; the controller invokes it only
    /// after disposing the previous display.
    pub fn factory(nodes: Grid<TileNode>) -> DisplayFactory<C> {
        Box::new(move |ctx, services| {
            Ok(Box::new(GridDisplay::new(ctx, nodes, services.clone())) as Box<dyn Display<C>>)
        })
    }

    /// Replaces one cell: store the node, dispose the old program, compile
    /// and store the new one, in that order, so a cell never holds two
    /// live programs.
    fn replace_cell(&mut self, ctx: &C, row: usize, col: usize, node: TileNode) {
        let source = glsl::fragment_source(&node);
        self.nodes.set(row, col, node);
        *self.generations.get_mut(row, col) += 1;
        if let Some(mut old) = self.tiles.get_mut(row, col).take() {
            old.dispose(ctx);
        }
        let compiled = match self.services.compiler.lock().compile(ctx, &source) {
            Ok(tile) => Some(tile),
            Err(err) => {
                log::error!("recompiling tile ({row}, {col}) failed: {err}");
                None
            }
        };
        self.tiles.set(row, col, compiled);
    }

    fn poll_pending(&mut self, ctx: &C) {
        let mut i = 0;
        while i < self.pending.len() {
            match self.pending[i].rx.try_recv() {
                Ok(node) => {
                    let load = self.pending.swap_remove(i);
                    if *self.generations.get(load.row, load.col) == load.generation {
                        self.replace_cell(ctx, load.row, load.col, node);
                    } else {
                        log::info!(
                            "discarding stale load for cell ({}, {})",
                            load.row,
                            load.col
                        );
                    }
                }
                Err(TryRecvError::Empty) => i += 1,
                Err(TryRecvError::Disconnected) => {
                    // load was cancelled, cell keeps its prior content
                    self.pending.swap_remove(i);
                }
            }
        }
    }
}

impl<C: 'static> Display<C> for GridDisplay<C> {
    fn tick(&mut self, ctx: &C) {
        self.poll_pending(ctx);
    }

    fn draw(&mut self, ctx: &C, bounds: PixelBounds, time: f32) {
        let viewport = self.services.viewport.lock().clone();
        for (row, col) in grid_positions() {
            if let Some(tile) = self.tiles.get_mut(row, col) {
                let dst = cell_rect(row, col);
                let src = cell_window(&viewport, row, col);
                tile.draw(ctx, bounds, time, dst, src);
            }
        }
    }

    fn on_click(
        &mut self,
        ctx: &C,
        offset: (f32, f32),
        client: (f32, f32),
    ) -> EngineResult<Option<DisplayFactory<C>>> {
        let (row, col) = cell_at(offset, client);
        // evaluated once per click, never cached
        let operation = self.services.viewport.lock().operation;
        match operation {
            Operation::Variations => {
                let nodes = self.nodes.get(row, col).variations_grid();
                Ok(Some(GridDisplay::factory(nodes)))
            }
            Operation::Save => {
                let node = self.nodes.get(row, col).clone();
                let thumbnail = self
                    .tiles
                    .get_mut(row, col)
                    .as_mut()
                    .and_then(|tile| tile.thumbnail(ctx, SAVE_THUMBNAIL_SIZE));
                self.services.persistence.lock().save(&node, thumbnail)?;
                Ok(None)
            }
            Operation::Open => {
                let (tx, rx) = mpsc::channel();
                self.services.persistence.lock().open(tx)?;
                self.pending.push(PendingLoad {
                    row,
                    col,
                    generation: *self.generations.get(row, col),
                    rx,
                });
                Ok(None)
            }
            Operation::Inspect => {
                let body = serde_json::to_string_pretty(self.nodes.get(row, col))?;
                self.services.inspector.lock().inspect(&body);
                Ok(None)
            }
            Operation::Pan => Ok(None),
        }
    }

    fn dispose(&mut self, ctx: &C) {
        for (row, col) in grid_positions() {
            if let Some(mut tile) = self.tiles.get_mut(row, col).take() {
                tile.dispose(ctx);
            }
        }
        self.pending.clear();
    }
}

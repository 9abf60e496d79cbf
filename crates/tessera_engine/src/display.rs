//! Collaborator contracts of the grid/viewport core.
//!
//! Everything is generic over the graphics context type `C` (the glow
//! context in the application, `()` in tests) so the lifecycle machinery
//! can be exercised without a GPU.

use std::sync::{mpsc::Sender, Arc};

use parking_lot::Mutex;

use crate::{EngineResult, PixelBounds, Rect, SharedViewport, TileNode};

/// Raw RGBA pixels of an offscreen tile render, used for save thumbnails.
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A compiled tile program. Owned exclusively by one grid cell; must be
/// disposed exactly once, at replacement or when the owning display is
/// disposed.
pub trait Tile<C>: Send {
    /// Renders the tile into the normalized destination rect `dst`,
    /// sampling the parameter-space window `src`.
    fn draw(&mut self, ctx: &C, bounds: PixelBounds, time: f32, dst: Rect, src: Rect);

    /// Offscreen render at roughly `size` pixels. Backends without
    /// offscreen support return `None`.
    fn thumbnail(&mut self, _ctx: &C, _size: u32) -> Option<Thumbnail> {
        None
    }

    fn dispose(&mut self, ctx: &C);
}

/// The shader compiler collaborator.
pub trait Compile<C>: Send {
    fn compile(&mut self, ctx: &C, source: &str) -> EngineResult<Box<dyn Tile<C>>>;
}

/// Frame-begin hook on the render target (clear, scissor).
pub trait Surface<C>: Send {
    fn start_frame(&mut self, ctx: &C, bounds: PixelBounds);
}

/// Save/open of tile definitions. Save is fire-and-forget from the grid's
/// perspective; open delivers its completion at most once over the sender
/// (a dropped sender means the load never resolves and the cell keeps its
/// prior content).
pub trait Persistence: Send {
    fn save(&mut self, node: &TileNode, thumbnail: Option<Thumbnail>) -> EngineResult<()>;
    fn open(&mut self, reply: Sender<TileNode>) -> EngineResult<()>;
}

/// Synchronous presentation of structured text to the user.
pub trait Inspect: Send {
    fn inspect(&mut self, body: &str);
}

/// Anything the controller can host: draw per tick, interpret clicks,
/// release resources. [`crate::GridDisplay`] is one variant; non-grid
/// displays need no controller changes.
pub trait Display<C>: Send {
    /// Applies any ready asynchronous completions. The controller calls
    /// this every tick, including ticks the frame-rate reduction skips.
    fn tick(&mut self, _ctx: &C) {}

    fn draw(&mut self, ctx: &C, bounds: PixelBounds, time: f32);

    /// Interprets a click at `offset` within a `client`-sized canvas.
    /// Returning a factory asks the controller to swap displays.
    fn on_click(
        &mut self,
        ctx: &C,
        offset: (f32, f32),
        client: (f32, f32),
    ) -> EngineResult<Option<DisplayFactory<C>>>;

    fn dispose(&mut self, ctx: &C);
}

/// Deferred display construction. The controller runs the factory only
/// after the previous display has been disposed.
pub type DisplayFactory<C> =
    Box<dyn FnOnce(&C, &DisplayServices<C>) -> EngineResult<Box<dyn Display<C>>> + Send>;

/// The shared collaborators handed to every display the controller
/// constructs.
pub struct DisplayServices<C> {
    pub viewport: SharedViewport,
    pub compiler: Arc<Mutex<dyn Compile<C>>>,
    pub persistence: Arc<Mutex<dyn Persistence>>,
    pub inspector: Arc<Mutex<dyn Inspect>>,
}

impl<C> Clone for DisplayServices<C> {
    fn clone(&self) -> Self {
        Self {
            viewport: self.viewport.clone(),
            compiler: self.compiler.clone(),
            persistence: self.persistence.clone(),
            inspector: self.inspector.clone(),
        }
    }
}

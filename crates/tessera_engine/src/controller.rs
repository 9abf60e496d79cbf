use crate::{
    Display, DisplayFactory, DisplayServices, EngineResult, Operation, PixelBounds,
    SharedViewport, Surface, FRAME_TIME_STEP, ZOOM_STEP,
};

/// Owns the active display, the frame clock and the viewport-level input
/// interpretation (wheel → zoom, drag → pan). At most one display is alive
/// at any time.
pub struct DisplayController<C> {
    services: DisplayServices<C>,
    surface: Box<dyn Surface<C>>,
    display: Option<Box<dyn Display<C>>>,
    time: f32,
    frame_number: u64,
}

impl<C> DisplayController<C> {
    pub fn new(services: DisplayServices<C>, surface: Box<dyn Surface<C>>) -> Self {
        Self {
            services,
            surface,
            display: None,
            time: 0.0,
            frame_number: 0,
        }
    }

    pub fn viewport(&self) -> SharedViewport {
        self.services.viewport.clone()
    }

    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }

    /// Swaps the active display. The previous display is disposed
    /// synchronously *before* the factory runs, so no two displays'
    /// resources ever coexist.
    pub fn set_display(&mut self, ctx: &C, factory: DisplayFactory<C>) -> EngineResult<()> {
        if let Some(mut old) = self.display.take() {
            old.dispose(ctx);
        }
        self.display = Some(factory(ctx, &self.services)?);
        Ok(())
    }

    /// One controller tick: advance the synthetic clock, let the display
    /// apply pending completions, then render unless this tick is skipped
    /// by the frame-rate reduction.
    pub fn draw(&mut self, ctx: &C, bounds: PixelBounds) {
        self.time += FRAME_TIME_STEP;
        self.frame_number += 1;
        if let Some(display) = &mut self.display {
            display.tick(ctx);
        }
        let reduction = self.services.viewport.lock().frame_rate_reduction();
        if self.frame_number % reduction != 0 {
            return;
        }
        self.surface.start_frame(ctx, bounds);
        if let Some(display) = &mut self.display {
            display.draw(ctx, bounds, self.time);
        }
    }

    /// Wheel event with DOM-style sign: positive `delta_y` zooms out.
    pub fn handle_wheel(&mut self, delta_y: f32) {
        let mut viewport = self.services.viewport.lock();
        if delta_y > 0.0 {
            viewport.zoom_by(ZOOM_STEP);
        } else if delta_y < 0.0 {
            viewport.zoom_by(-ZOOM_STEP);
        }
    }

    /// Pointer movement; pans only while the pan operation is selected and
    /// the primary button is held.
    pub fn handle_pointer_move(
        &mut self,
        delta: (f32, f32),
        client: (f32, f32),
        primary_down: bool,
    ) {
        let mut viewport = self.services.viewport.lock();
        if viewport.operation == Operation::Pan && primary_down {
            viewport.pan_by(delta, client);
        }
    }

    /// Routes a click to the active display and applies a requested
    /// display swap. No-op without a display.
    pub fn handle_click(
        &mut self,
        ctx: &C,
        offset: (f32, f32),
        client: (f32, f32),
    ) -> EngineResult<()> {
        let factory = match &mut self.display {
            Some(display) => display.on_click(ctx, offset, client)?,
            None => None,
        };
        if let Some(factory) = factory {
            self.set_display(ctx, factory)?;
        }
        Ok(())
    }

    pub fn dispose(&mut self, ctx: &C) {
        if let Some(mut display) = self.display.take() {
            display.dispose(ctx);
        }
    }
}

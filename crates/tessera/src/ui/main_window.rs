use std::sync::Arc;

use eframe::glow;
use parking_lot::Mutex;
use tessera_engine::{
    DisplayController, DisplayServices, GridDisplay, Operation, PixelBounds, SharedViewport,
    TileNode, ViewportState,
};
use tessera_gui::{GlCompiler, GlSurface};

use crate::{load_tile, Args, FilePersistence, InspectSink, Options};

pub struct MainWindow {
    controller: Arc<Mutex<DisplayController<glow::Context>>>,
    viewport: SharedViewport,
    inspected: Arc<Mutex<Option<String>>>,
}

impl MainWindow {
    pub fn new(cc: &eframe::CreationContext<'_>, args: &Args) -> Self {
        let gl = cc
            .gl
            .clone()
            .expect("tessera requires the glow render backend");

        let options = Options::load_options();
        let mut state = ViewportState::default();
        state.set_frame_rate_reduction(
            args.frame_rate_reduction.unwrap_or(options.frame_rate_reduction),
        );
        state.continuous = options.continuous;
        state.operation = options.operation;
        let viewport = state.shared();

        let inspect = InspectSink::default();
        let inspected = inspect.text();
        let services = DisplayServices {
            viewport: viewport.clone(),
            compiler: Arc::new(Mutex::new(GlCompiler)),
            persistence: Arc::new(Mutex::new(FilePersistence::default())),
            inspector: Arc::new(Mutex::new(inspect)),
        };

        let mut nodes = TileNode::seed_grid();
        if let Some(path) = &args.path {
            match load_tile(path) {
                Ok(node) => {
                    nodes = node.variations_grid();
                }
                Err(err) => log::error!("Error loading tile from {path:?}: {err}"),
            }
        }

        let mut controller = DisplayController::new(services, Box::new(GlSurface));
        if let Err(err) = controller.set_display(gl.as_ref(), GridDisplay::factory(nodes)) {
            log::error!("Error building the start grid: {err}");
        }

        Self {
            controller: Arc::new(Mutex::new(controller)),
            viewport,
            inspected,
        }
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        let mut viewport = self.viewport.lock();
        ui.horizontal(|ui| {
            for (operation, label) in [
                (Operation::Pan, "Pan"),
                (Operation::Variations, "Variations"),
                (Operation::Save, "Save"),
                (Operation::Open, "Open"),
                (Operation::Inspect, "Inspect"),
            ] {
                if ui
                    .selectable_label(viewport.operation == operation, label)
                    .clicked()
                {
                    viewport.operation = operation;
                }
            }
            ui.separator();
            ui.checkbox(&mut viewport.continuous, "Continuous");
            ui.separator();
            let mut reduction = viewport.frame_rate_reduction();
            if ui
                .add(egui::Slider::new(&mut reduction, 1..=10).text("Frame skip"))
                .changed()
            {
                viewport.set_frame_rate_reduction(reduction);
            }
        });
    }

    fn grid_ui(&mut self, ui: &mut egui::Ui, frame: &eframe::Frame) {
        let size = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let client = (rect.width(), rect.height());

        if response.hovered() {
            let scroll_y = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_y != 0.0 {
                // egui scroll up is positive, wheel-zoom expects the
                // opposite sign (positive zooms out)
                self.controller.lock().handle_wheel(-scroll_y);
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.controller
                .lock()
                .handle_pointer_move((delta.x, delta.y), client, true);
        }

        if response.clicked() {
            if let (Some(pos), Some(gl)) = (response.interact_pointer_pos(), frame.gl()) {
                let offset = pos - rect.min;
                if let Err(err) =
                    self.controller
                        .lock()
                        .handle_click(gl, (offset.x, offset.y), client)
                {
                    log::error!("Error handling grid click: {err}");
                }
            }
        }

        let controller = self.controller.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let bounds = pixel_bounds(&info);
                controller.lock().draw(painter.gl(), bounds);
            })),
        };
        ui.painter().add(callback);
    }

    fn inspect_ui(&mut self, ctx: &egui::Context) {
        let body = self.inspected.lock().clone();
        let Some(body) = body else {
            return;
        };
        let mut open = true;
        egui::Window::new("Tile definition")
            .open(&mut open)
            .vscroll(true)
            .show(ctx, |ui| {
                ui.monospace(&body);
                if ui.button("Copy").clicked() {
                    ui.output_mut(|o| o.copied_text = body.clone());
                }
            });
        if !open {
            *self.inspected.lock() = None;
        }
    }

    fn store_options(&self) {
        let viewport = self.viewport.lock();
        Options {
            frame_rate_reduction: viewport.frame_rate_reduction(),
            continuous: viewport.continuous,
            operation: viewport.operation,
        }
        .store_options();
    }
}

impl eframe::App for MainWindow {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar_ui(ui);
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.grid_ui(ui, frame);
            });
        self.inspect_ui(ctx);

        // the tiles animate on the synthetic clock
        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.store_options();
        if let Some(gl) = gl {
            self.controller.lock().dispose(gl);
        }
    }
}

/// Converts the callback's logical viewport rect to physical pixels with a
/// GL bottom-left origin.
fn pixel_bounds(info: &egui::PaintCallbackInfo) -> PixelBounds {
    let ppp = info.pixels_per_point;
    let rect = info.viewport;
    PixelBounds {
        x: (rect.left() * ppp) as i32,
        y: (info.screen_size_px[1] as f32 - rect.max.y * ppp) as i32,
        width: (rect.width() * ppp) as i32,
        height: (rect.height() * ppp) as i32,
    }
}

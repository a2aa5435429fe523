use eframe::egui;
use tracing::debug;

use mandelview_render::{FractalSession, TickOutcome};

use crate::config::ExplorerConfig;
use crate::input::WheelAccumulator;

pub(crate) struct MandelviewApp {
    pub(crate) session: FractalSession,
    /// Last uploaded raster and the generation it came from.
    pub(crate) texture: Option<(egui::TextureHandle, u64)>,
    pub(crate) wheel: WheelAccumulator,
    started: bool,
}

impl MandelviewApp {
    pub(crate) fn new(ctx: &egui::Context, config: &ExplorerConfig) -> Self {
        ctx.set_visuals(egui::Visuals::dark());
        let width = config.window_width as u32;
        let height = config.window_height as u32;
        let session = FractalSession::new(config.session_settings(), width, height);
        Self {
            session,
            texture: None,
            wheel: WheelAccumulator::default(),
            started: false,
        }
    }

    /// Upload the snapshot raster if it changed since the last frame.
    pub(crate) fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(snap) = self.session.snapshot() else {
            return;
        };
        if matches!(self.texture, Some((_, generation)) if generation == snap.generation) {
            return;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [snap.width() as usize, snap.height() as usize],
            &snap.buffer.pixels,
        );
        match self.texture.as_mut() {
            Some((tex, generation)) => {
                tex.set(image, egui::TextureOptions::LINEAR);
                *generation = snap.generation;
            }
            None => {
                let tex = ctx.load_texture("fractal", image, egui::TextureOptions::LINEAR);
                self.texture = Some((tex, snap.generation));
            }
        }
    }
}

impl eframe::App for MandelviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let width = available.x.max(1.0) as u32;
                let height = available.y.max(1.0) as u32;
                self.session.resize(width, height);
                if !self.started {
                    // First frame: the canvas size is now known.
                    debug!(width, height, "Initial canvas size");
                    if !self.session.is_pending() {
                        self.session.recompute();
                    }
                    self.started = true;
                }

                let (response, painter) =
                    ui.allocate_painter(available, egui::Sense::click_and_drag());
                self.handle_input(ctx, &response);

                let TickOutcome { redraw, pending } = self.session.tick();
                self.sync_texture(ctx);
                self.draw_canvas(&painter, response.rect);

                if redraw || pending {
                    ctx.request_repaint();
                }
            });
    }
}

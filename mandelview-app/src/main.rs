mod app;
mod canvas;
mod config;
mod input;

use eframe::egui;
use tracing::{error, info};

use crate::app::MandelviewApp;
use crate::config::{ExplorerConfig, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Mandelview");

    let config = ExplorerConfig::load();
    if config.arbitrary_precision && !mandelview_core::supports_arbitrary_precision() {
        info!("Arbitrary precision not compiled in, starting in standard mode");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mandelview")
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Mandelview",
        options,
        Box::new(move |cc| Ok(Box::new(MandelviewApp::new(&cc.egui_ctx, &config)))),
    );
    if let Err(e) = &result {
        error!("Window failed: {e}");
    }
    result
}

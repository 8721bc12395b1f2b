mod app;

use console_core::ConsoleConfig;
use eframe::egui;

use crate::app::ConsoleApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = ConsoleConfig::load(None).unwrap_or_else(|e| {
        log::warn!("{:#}; using default settings", e);
        ConsoleConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Admin Console")
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Admin Console",
        options,
        Box::new(|cc| Ok(Box::new(ConsoleApp::new(cc, config)))),
    )
}

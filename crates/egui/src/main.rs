mod app;
mod config;

use app::{SoundBoardApp, build_board};
use config::Config;
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load();
    log::info!(
        "Assets from {}, data in {}",
        config.assets_dir.display(),
        config.data_dir.display()
    );

    let board = build_board(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sound Board",
        options,
        Box::new(|_cc| Ok(Box::new(SoundBoardApp::new(board)))),
    )
}

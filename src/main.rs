mod cli;
mod core;
mod gui;
mod hotkeys;
mod video;

use clap::Parser;
use eframe::egui;
use crate::cli::CliArgs;
use crate::core::AppConfig;
use crate::gui::FrameCruiserApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    config.apply_args(&args);
    let startup_directory = config.startup_directory(&args);

    // Resolved once; the session never re-checks motion support
    let detector = video::detector_for(&config.motion);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_title("ZM Frame Cruiser"),
        ..Default::default()
    };

    eframe::run_native(
        "ZM Frame Cruiser",
        options,
        Box::new(move |cc| {
            match FrameCruiserApp::new(cc, config, detector, startup_directory) {
                Ok(app) => Ok(Box::new(app)),
                Err(e) => {
                    eprintln!("Failed to initialize app: {}", e);
                    std::process::exit(1);
                }
            }
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

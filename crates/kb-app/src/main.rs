//! Main application entry point

use anyhow::{Context, Result};
use eframe::egui;
use tracing::info;

mod app;
mod config;

use app::KpiBoardApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting KPI Board");

    let config = AppConfig::load();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the file loading runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        default_theme: if config.theme.dark_mode {
            eframe::Theme::Dark
        } else {
            eframe::Theme::Light
        },
        ..Default::default()
    };

    eframe::run_native(
        "KPI Board",
        options,
        Box::new(move |cc| Box::new(KpiBoardApp::new(cc, config, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

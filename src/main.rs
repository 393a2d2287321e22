// hide console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use stencil_editor::app::StencilEditorApp;
use stencil_editor::{EditorConfig, EditorError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), EditorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EditorConfig::from_env()?;
    tracing::info!(
        mask_width = config.mask_width,
        mask_height = config.mask_height,
        zoom_min = config.zoom.min,
        zoom_max = config.zoom.max,
        "starting stencil editor"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas_width + 320.0, config.canvas_height + 140.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Stencil Editor",
        options,
        Box::new(move |cc| Ok(Box::new(StencilEditorApp::new(cc, config)))),
    )?;
    Ok(())
}

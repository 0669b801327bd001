#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use flipbook::FlipbookApp;

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("Flipbook"),
        ..Default::default()
    };
    eframe::run_native(
        "Flipbook",
        native_options,
        Box::new(|cc| Ok(Box::new(FlipbookApp::new(cc)?))),
    )
}

//! LickHouse - a desktop library for guitar licks
//!
//! Browse, create, and edit tablature snippets stored as .lick files.

mod app;
mod fretboard_view;
mod theme;

use app::LickHouseApp;
use eframe::NativeOptions;

fn main() -> eframe::Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([760.0, 520.0])
            .with_title("LickHouse"),
        ..Default::default()
    };

    eframe::run_native(
        "LickHouse",
        options,
        Box::new(|cc| {
            theme::LickTheme::default().apply(&cc.egui_ctx);
            Box::new(LickHouseApp::new(cc))
        }),
    )
}

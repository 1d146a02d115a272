// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

mod gui;

use eframe::egui;
use log::error;
use vlsi_dialogs::db::reader::DesignReader;
use vlsi_dialogs::Database;

const SAMPLE_DESIGN: &str = include_str!("../demos/sample.dsn");

fn initial_design() -> (Database, Option<String>) {
    let reader = DesignReader::new();
    if let Some(path) = std::env::args().nth(1) {
        match reader.read(&path) {
            Ok(db) => return (db, Some(path)),
            Err(e) => error!("Cannot open {}: {}; using the sample design", path, e),
        }
    }
    match reader.read_str(SAMPLE_DESIGN) {
        Ok(db) => (db, None),
        Err(e) => {
            error!("Built-in sample design is unreadable: {}", e);
            (
                Database::new(vlsi_dialogs::db::Technology::mocmos(), "empty"),
                None,
            )
        }
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let (db, path) = initial_design();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "VLSI Layout Editor",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(gui::EditorApp::new(db, path)))
        }),
    )
}

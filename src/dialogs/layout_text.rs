// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Layout text dialog
//!
//! Renders a message with a system font and turns every lit pixel into an
//! instance of a primitive node, so the text can be fabricated on a layer.

use std::collections::HashSet;

use eframe::egui;
use log::{info, warn};

use super::EditSnapshot;
use crate::db::{CellId, Database, NodeInst};
use crate::job::{Job, JobError, JobSink};
use crate::prefs::{LayoutTextPrefs, Preferences};
use crate::raster::{
    place_bitmaps, rasterize_message, Bitmap, FontCatalog, Placement, PlacementParams,
    RasterError, TextStyle,
};

/// Creates one primitive node per placement.
pub struct PlaceLayoutTextJob {
    pub cell: CellId,
    pub primitive: String,
    pub placements: Vec<Placement>,
}

impl Job for PlaceLayoutTextJob {
    fn name(&self) -> &str {
        "Place layout text"
    }

    fn run(&mut self, db: &mut Database) -> Result<String, JobError> {
        if db.technology.find_primitive(&self.primitive).is_none() {
            return Err(JobError::NotFound(format!("primitive {}", self.primitive)));
        }
        let cell = db
            .cell_mut(self.cell)
            .ok_or_else(|| JobError::NotFound("cell".to_string()))?;

        let mut used: HashSet<String> = cell.nodes.iter().map(|n| n.name.clone()).collect();
        let mut counter = 1usize;
        for placement in &self.placements {
            let name = loop {
                let candidate = format!("text@{}", counter);
                counter += 1;
                if !used.contains(&candidate) {
                    break candidate;
                }
            };
            used.insert(name.clone());
            cell.add_node(NodeInst::new(
                &name,
                &self.primitive,
                placement.center,
                placement.size,
                placement.size,
            ));
        }
        Ok(format!(
            "Placed {} {} nodes in {}",
            self.placements.len(),
            self.primitive,
            cell.describe()
        ))
    }
}

fn text_style(prefs: &LayoutTextPrefs) -> TextStyle {
    TextStyle {
        bold: prefs.bold,
        italic: prefs.italic,
        underline: prefs.underline,
    }
}

/// Rasterises the message in `prefs` with its font and style.
pub fn render_lines(catalog: &FontCatalog, prefs: &LayoutTextPrefs) -> Result<Vec<Bitmap>, RasterError> {
    let font = catalog.get(&prefs.font)?;
    Ok(rasterize_message(font, &prefs.message, prefs.size, text_style(prefs)))
}

/// Grid placements for the message in `prefs`.
pub fn build_placements(
    catalog: &FontCatalog,
    prefs: &LayoutTextPrefs,
) -> Result<Vec<Placement>, RasterError> {
    let lines = render_lines(catalog, prefs)?;
    Ok(place_bitmaps(
        &lines,
        &PlacementParams {
            scale: prefs.scale,
            separation: prefs.separation,
            invert: prefs.invert,
        },
    ))
}

/// Stacks the line bitmaps into one black-on-white image.
pub fn preview_image(lines: &[Bitmap], invert: bool) -> egui::ColorImage {
    let width = lines.iter().map(|b| b.width).max().unwrap_or(0).max(1);
    let height = lines.iter().map(|b| b.height).sum::<usize>().max(1);
    let mut image = egui::ColorImage::new([width, height], egui::Color32::WHITE);
    let mut top = 0;
    for bitmap in lines {
        for y in 0..bitmap.height {
            for x in 0..width {
                if bitmap.is_on(x, y) != invert {
                    image[(x, top + y)] = egui::Color32::BLACK;
                }
            }
        }
        top += bitmap.height;
    }
    image
}

pub struct LayoutTextDialog {
    pub visible: bool,
    preview: Option<(String, egui::TextureHandle)>,
    preview_error: Option<String>,
}

impl Default for LayoutTextDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTextDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            preview: None,
            preview_error: None,
        }
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.preview = None;
    }

    /// Rasterises the message and enqueues the placement job for the current cell.
    pub fn commit(
        &self,
        sink: &dyn JobSink,
        catalog: &FontCatalog,
        prefs: &Preferences,
        snapshot: &EditSnapshot<'_>,
    ) -> bool {
        let text = &prefs.layout_text;
        let Some(cell) = snapshot.cell else {
            warn!("Layout text: no cell in the edit window");
            return false;
        };
        if text.message.trim().is_empty() {
            warn!("Layout text: message is empty");
            return false;
        }
        if snapshot.db.technology.find_primitive(&text.primitive).is_none() {
            warn!("Layout text: unknown primitive {}", text.primitive);
            return false;
        }
        let placements = match build_placements(catalog, text) {
            Ok(placements) => placements,
            Err(e) => {
                warn!("Layout text: {}", e);
                return false;
            }
        };
        info!(
            "Layout text: {} pixels of '{}' in {}",
            placements.len(),
            text.message,
            text.font
        );
        sink.submit(Box::new(PlaceLayoutTextJob {
            cell,
            primitive: text.primitive.clone(),
            placements,
        }));
        true
    }

    fn refresh_preview(&mut self, ctx: &egui::Context, catalog: &FontCatalog, prefs: &LayoutTextPrefs) {
        let key = format!("{:?}", prefs);
        if self.preview.as_ref().is_some_and(|(k, _)| *k == key) {
            return;
        }
        self.preview = None;
        self.preview_error = None;
        if prefs.message.is_empty() {
            return;
        }
        match render_lines(catalog, prefs) {
            Ok(lines) => {
                let image = preview_image(&lines, prefs.invert);
                let texture =
                    ctx.load_texture("layout_text_preview", image, egui::TextureOptions::NEAREST);
                self.preview = Some((key, texture));
            }
            Err(e) => self.preview_error = Some(e.to_string()),
        }
    }

    pub fn render(
        &mut self,
        ctx: &egui::Context,
        catalog: &mut FontCatalog,
        snapshot: &EditSnapshot<'_>,
        sink: &dyn JobSink,
        prefs: &mut Preferences,
    ) {
        if !self.visible {
            return;
        }

        let mut open = true;
        egui::Window::new("Layout Text")
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                let text = &mut prefs.layout_text;
                egui::Grid::new("layout_text_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Font:");
                        ui.horizontal(|ui| {
                            egui::ComboBox::from_id_salt("layout_text_font")
                                .selected_text(&text.font)
                                .show_ui(ui, |ui| {
                                    for name in catalog.names() {
                                        if ui.selectable_label(text.font == name, name).clicked() {
                                            text.font = name.to_string();
                                        }
                                    }
                                });
                            if ui.button("Load...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("Font files", &["ttf", "otf"])
                                    .pick_file()
                                {
                                    match catalog.load_file(&path) {
                                        Ok(name) => text.font = name,
                                        Err(e) => warn!("Layout text: {}", e),
                                    }
                                }
                            }
                        });
                        ui.end_row();

                        ui.label("Size (pixels):");
                        ui.add(egui::DragValue::new(&mut text.size).range(1.0..=200.0));
                        ui.end_row();

                        ui.label("Scale (lambda/pixel):");
                        ui.add(egui::DragValue::new(&mut text.scale).speed(0.1).range(0.01..=100.0));
                        ui.end_row();

                        ui.label("Separation (lambda):");
                        ui.add(egui::DragValue::new(&mut text.separation).speed(0.1).range(0.0..=100.0));
                        ui.end_row();

                        ui.label("Primitive:");
                        egui::ComboBox::from_id_salt("layout_text_primitive")
                            .selected_text(&text.primitive)
                            .show_ui(ui, |ui| {
                                for primitive in &snapshot.db.technology.primitives {
                                    ui.selectable_value(
                                        &mut text.primitive,
                                        primitive.name.clone(),
                                        &primitive.name,
                                    );
                                }
                            });
                        ui.end_row();
                    });

                ui.horizontal(|ui| {
                    ui.checkbox(&mut text.bold, "Bold");
                    ui.checkbox(&mut text.italic, "Italic");
                    ui.checkbox(&mut text.underline, "Underline");
                    ui.checkbox(&mut text.invert, "Invert");
                });

                ui.label("Message:");
                ui.add(
                    egui::TextEdit::multiline(&mut text.message)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );

                self.refresh_preview(ui.ctx(), catalog, &prefs.layout_text);
                ui.separator();
                if let Some((_, texture)) = &self.preview {
                    let size = texture.size_vec2();
                    let zoom = (360.0 / size.x.max(1.0)).clamp(1.0, 4.0);
                    egui::ScrollArea::both().max_height(160.0).show(ui, |ui| {
                        ui.image((texture.id(), size * zoom));
                    });
                } else if let Some(error) = &self.preview_error {
                    ui.colored_label(egui::Color32::from_rgb(244, 67, 54), error);
                } else {
                    ui.weak("Type a message to see a preview.");
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Create").clicked() {
                        self.commit(sink, catalog, prefs, snapshot);
                    }
                    if ui.button("Close").clicked() {
                        self.visible = false;
                    }
                });
            });

        if !open || !self.visible {
            self.close();
        }
    }
}

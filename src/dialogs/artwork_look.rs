// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Artwork look dialog: colour, stipple pattern and outline style of the
//! highlighted nodes and arcs.

use eframe::egui;
use log::{info, warn};

use super::{DialogWatch, EditSnapshot};
use crate::db::{
    ColorIndex, Database, Look, OutlineStyle, Technology, MAX_TRANSPARENT_SLOT,
};
use crate::highlight::Highlight;
use crate::job::{Job, JobError, JobSink};
use crate::prefs::Preferences;

/// Applies one look to a set of nodes and arcs.
pub struct SetLookJob {
    pub targets: Vec<Highlight>,
    pub look: Look,
}

impl Job for SetLookJob {
    fn name(&self) -> &str {
        "Change artwork look"
    }

    fn run(&mut self, db: &mut Database) -> Result<String, JobError> {
        let mut changed = 0;
        for target in &self.targets {
            let Some(cell) = db.cell_mut(target.cell()) else {
                continue;
            };
            match *target {
                Highlight::Node(_, node) => {
                    if let Some(node) = cell.node_mut(node) {
                        node.look = self.look;
                        changed += 1;
                    }
                }
                Highlight::Arc(_, arc) => {
                    if let Some(arc) = cell.arc_mut(arc) {
                        arc.look = self.look;
                        changed += 1;
                    }
                }
                Highlight::Export(..) => {}
            }
        }
        if changed == 0 {
            return Err(JobError::NotFound("highlighted geometry".to_string()));
        }
        Ok(format!("Changed the look of {} objects", changed))
    }
}

fn look_of(db: &Database, target: Highlight) -> Option<Look> {
    let cell = db.cell(target.cell())?;
    match target {
        Highlight::Node(_, node) => cell.node(node).map(|n| n.look),
        Highlight::Arc(_, arc) => cell.arc(arc).map(|a| a.look),
        Highlight::Export(..) => None,
    }
}

pub struct ArtworkLookDialog {
    pub visible: bool,
    watch: Option<DialogWatch>,
    targets: Vec<Highlight>,
    /// 0 means "no transparent layer"; the RGB colour is used instead.
    transparent_slot: u8,
    pub color: [u8; 3],
    pub use_pattern: bool,
    pub pattern: [u16; 16],
    pub outline_style: OutlineStyle,
}

impl Default for ArtworkLookDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtworkLookDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            watch: None,
            targets: Vec::new(),
            transparent_slot: 0,
            color: [0, 0, 0],
            use_pattern: false,
            pattern: [0xFFFF; 16],
            outline_style: OutlineStyle::NoOutline,
        }
    }

    pub fn open(&mut self, snapshot: &EditSnapshot<'_>, watch: DialogWatch, prefs: &Preferences) {
        self.visible = true;
        self.watch = Some(watch);
        self.load(snapshot, prefs);
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.watch = None;
    }

    pub fn needs_reload(&self) -> bool {
        self.watch.as_ref().is_some_and(|w| w.changed())
    }

    pub fn is_enabled(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn targets(&self) -> &[Highlight] {
        &self.targets
    }

    /// Mirrors the first highlighted node or arc into the dialog.
    pub fn load(&mut self, snapshot: &EditSnapshot<'_>, prefs: &Preferences) {
        self.targets = snapshot
            .highlighter
            .highlighted()
            .iter()
            .copied()
            .filter(|h| matches!(h, Highlight::Node(..) | Highlight::Arc(..)))
            .collect();
        let Some(look) = self
            .targets
            .iter()
            .find_map(|target| look_of(snapshot.db, *target))
        else {
            info!("Artwork look: nothing highlighted");
            self.targets.clear();
            return;
        };
        self.set_from_look(&look, prefs);
    }

    fn set_from_look(&mut self, look: &Look, prefs: &Preferences) {
        self.transparent_slot = 0;
        self.color = [0, 0, 0];
        if let Some(index) = look.color {
            if let Some(slot) = index.transparent_slot() {
                self.transparent_slot = slot;
            } else if let Some(rgb) = index.rgb() {
                self.color = rgb;
            }
        }
        match look.pattern {
            Some(pattern) => {
                self.use_pattern = true;
                self.pattern = pattern;
            }
            None => {
                self.use_pattern = false;
                self.pattern = prefs.artwork_pattern;
            }
        }
        self.outline_style = look.outline_style.unwrap_or_default();
    }

    pub fn transparent_slot(&self) -> u8 {
        self.transparent_slot
    }

    /// Slots above the last transparent layer are clamped to it.
    pub fn set_transparent_slot(&mut self, slot: u8) {
        self.transparent_slot = slot.min(MAX_TRANSPARENT_SLOT);
    }

    /// Palette index for the staged colour; unset exactly when no transparent
    /// layer is chosen and the colour is black.
    pub fn color_index(&self) -> Option<ColorIndex> {
        if self.transparent_slot != 0 {
            return ColorIndex::from_transparent(self.transparent_slot.min(MAX_TRANSPARENT_SLOT));
        }
        if self.color == [0, 0, 0] {
            return None;
        }
        Some(ColorIndex::from_rgb(self.color))
    }

    /// The look a commit would apply. An unset colour clears everything.
    pub fn staged_look(&self) -> Look {
        match self.color_index() {
            None => Look::default(),
            Some(color) => Look {
                color: Some(color),
                pattern: self.use_pattern.then_some(self.pattern),
                outline_style: self.use_pattern.then_some(self.outline_style),
            },
        }
    }

    pub fn toggle_pattern_bit(&mut self, row: usize, col: usize) {
        if row < 16 && col < 16 {
            self.pattern[row] ^= 0x8000 >> col;
        }
    }

    pub fn pattern_bit(&self, row: usize, col: usize) -> bool {
        row < 16 && col < 16 && self.pattern[row] & (0x8000 >> col) != 0
    }

    /// Enqueues one job for every highlighted node and arc.
    pub fn commit(&mut self, sink: &dyn JobSink, prefs: &mut Preferences) -> bool {
        if self.targets.is_empty() {
            warn!("Artwork look: no geometry selected");
            return false;
        }
        if self.use_pattern {
            prefs.artwork_pattern = self.pattern;
        }
        sink.submit(Box::new(SetLookJob {
            targets: self.targets.clone(),
            look: self.staged_look(),
        }));
        true
    }

    pub fn render(
        &mut self,
        ctx: &egui::Context,
        tech: &Technology,
        sink: &dyn JobSink,
        prefs: &mut Preferences,
    ) {
        if !self.visible {
            return;
        }

        let mut open = true;
        egui::Window::new("Artwork Look")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                if !self.is_enabled() {
                    ui.label("Select artwork nodes or arcs to edit their look.");
                    return;
                }
                ui.label(format!("{} objects selected", self.targets.len()));
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Transparent layer:");
                    let selected = match tech.transparent_layer(self.transparent_slot) {
                        Some(layer) => format!("{} ({})", self.transparent_slot, layer.name),
                        None if self.transparent_slot == 0 => "None".to_string(),
                        None => self.transparent_slot.to_string(),
                    };
                    egui::ComboBox::from_id_salt("artwork_transparent")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.transparent_slot, 0, "None");
                            for slot in 1..=MAX_TRANSPARENT_SLOT {
                                let label = match tech.transparent_layer(slot) {
                                    Some(layer) => format!("{} ({})", slot, layer.name),
                                    None => slot.to_string(),
                                };
                                ui.selectable_value(&mut self.transparent_slot, slot, label);
                            }
                        });
                });

                ui.add_enabled_ui(self.transparent_slot == 0, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Color:");
                        ui.color_edit_button_srgb(&mut self.color);
                    });
                });
                if self.color_index().is_none() {
                    ui.weak("Black with no transparent layer clears the look.");
                }
                ui.separator();

                ui.checkbox(&mut self.use_pattern, "Use stipple pattern");
                ui.add_enabled_ui(self.use_pattern, |ui| {
                    self.render_pattern_grid(ui);
                    ui.horizontal(|ui| {
                        ui.label("Preset:");
                        egui::ComboBox::from_id_salt("artwork_preset")
                            .selected_text("Copy from layer")
                            .show_ui(ui, |ui| {
                                for layer in &tech.layers {
                                    if ui.selectable_label(false, &layer.name).clicked() {
                                        self.pattern = layer.pattern;
                                    }
                                }
                            });
                        if ui.button("Clear").clicked() {
                            self.pattern = [0; 16];
                        }
                        if ui.button("Solid").clicked() {
                            self.pattern = [0xFFFF; 16];
                        }
                    });
                    ui.horizontal(|ui| {
                        ui.label("Outline:");
                        egui::ComboBox::from_id_salt("artwork_outline")
                            .selected_text(self.outline_style.label())
                            .show_ui(ui, |ui| {
                                for style in OutlineStyle::ALL {
                                    ui.selectable_value(
                                        &mut self.outline_style,
                                        style,
                                        style.label(),
                                    );
                                }
                            });
                    });
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        self.commit(sink, prefs);
                    }
                    if ui.button("OK").clicked() {
                        if self.commit(sink, prefs) {
                            self.close();
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        self.close();
                    }
                });
            });

        if !open {
            self.close();
        }
    }

    fn render_pattern_grid(&mut self, ui: &mut egui::Ui) {
        const CELL: f32 = 12.0;
        let (rect, response) =
            ui.allocate_exact_size(egui::Vec2::splat(CELL * 16.0), egui::Sense::click());
        let painter = ui.painter_at(rect);
        let fill = match self.color_index().and_then(ColorIndex::rgb) {
            Some([r, g, b]) => egui::Color32::from_rgb(r, g, b),
            None => ui.visuals().strong_text_color(),
        };
        for row in 0..16 {
            for col in 0..16 {
                let cell = egui::Rect::from_min_size(
                    rect.min + egui::vec2(col as f32 * CELL, row as f32 * CELL),
                    egui::Vec2::splat(CELL),
                );
                if self.pattern_bit(row, col) {
                    painter.rect_filled(cell.shrink(1.0), 0.0, fill);
                }
                painter.rect_stroke(
                    cell,
                    0.0,
                    egui::Stroke::new(0.5, egui::Color32::GRAY),
                    egui::StrokeKind::Inside,
                );
            }
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - rect.min;
                let col = (local.x / CELL).floor() as usize;
                let row = (local.y / CELL).floor() as usize;
                self.toggle_pattern_bit(row, col);
            }
        }
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Export properties dialog
//!
//! Edits the name, flags and characteristic of one export. A characteristic
//! change is carried over to the same-named export in the other views of the
//! cell (schematic, icon, ...).

use eframe::egui;
use log::{debug, info};

use super::{DialogWatch, EditSnapshot};
use crate::db::{is_valid_name, CellId, Database, ExportId, PortCharacteristic};
use crate::highlight::Highlight;
use crate::job::{Job, JobError, JobSink};

/// Editable fields of an export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportFields {
    pub name: String,
    pub body_only: bool,
    pub always_drawn: bool,
    pub characteristic: PortCharacteristic,
    /// Only meaningful for reference characteristics.
    pub reference_name: String,
}

impl ExportFields {
    /// Reference name as it would be stored: `None` unless the characteristic
    /// is a reference and the text is non-blank.
    pub fn effective_reference(&self) -> Option<String> {
        let trimmed = self.reference_name.trim();
        (self.characteristic.is_reference() && !trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

pub struct ChangeExportJob {
    pub cell: CellId,
    pub export: ExportId,
    pub new_name: Option<String>,
    pub body_only: bool,
    pub always_drawn: bool,
    pub characteristic: Option<(PortCharacteristic, Option<String>)>,
}

impl Job for ChangeExportJob {
    fn name(&self) -> &str {
        "Change export"
    }

    fn run(&mut self, db: &mut Database) -> Result<String, JobError> {
        let siblings: Vec<CellId> = db
            .cell_group(self.cell)
            .into_iter()
            .filter(|id| *id != self.cell)
            .collect();
        let cell = db
            .cell_mut(self.cell)
            .ok_or_else(|| JobError::NotFound("cell".to_string()))?;
        let old_name = cell
            .export(self.export)
            .map(|e| e.name.clone())
            .ok_or_else(|| JobError::NotFound("export".to_string()))?;

        if let Some(new_name) = &self.new_name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(JobError::Invalid("export name cannot be empty".to_string()));
            }
            if !is_valid_name(new_name) {
                return Err(JobError::Invalid(format!(
                    "export name '{}' contains spaces or one of ; ( ) #",
                    new_name
                )));
            }
            if let Some(other) = cell.find_export(new_name) {
                if other != self.export {
                    return Err(JobError::Invalid(format!(
                        "export name '{}' is already used in {}",
                        new_name,
                        cell.describe()
                    )));
                }
            }
        }

        if let Some((_, Some(reference))) = &self.characteristic {
            if !is_valid_name(reference) {
                return Err(JobError::Invalid(format!(
                    "reference name '{}' contains spaces or one of ; ( ) #",
                    reference
                )));
            }
        }

        let mut report = Vec::new();
        if let Some(export) = cell.export_mut(self.export) {
            if let Some(new_name) = &self.new_name {
                export.name = new_name.trim().to_string();
                report.push(format!("Renamed export {} to {}", old_name, export.name));
            }
            export.body_only = self.body_only;
            export.always_drawn = self.always_drawn;
            if let Some((characteristic, reference)) = &self.characteristic {
                export.characteristic = *characteristic;
                export.reference_name = reference.clone();
            }
        }

        if let Some((characteristic, reference)) = &self.characteristic {
            let mut views = Vec::new();
            for sibling in siblings {
                let Some(sibling_cell) = db.cell_mut(sibling) else {
                    continue;
                };
                let Some(id) = sibling_cell.find_export(&old_name) else {
                    continue;
                };
                if let Some(export) = sibling_cell.export_mut(id) {
                    export.characteristic = *characteristic;
                    export.reference_name = reference.clone();
                    views.push(sibling_cell.view.label());
                }
            }
            if !views.is_empty() {
                report.push(format!(
                    "Also changed the characteristic in the {} view(s)",
                    views.join(", ")
                ));
            }
        }

        if report.is_empty() {
            report.push(format!("Updated export {}", old_name));
        }
        Ok(report.join("; "))
    }
}

pub struct ExportPropertiesDialog {
    pub visible: bool,
    watch: Option<DialogWatch>,
    target: Option<(CellId, ExportId)>,
    initial: ExportFields,
    pub fields: ExportFields,
}

impl Default for ExportPropertiesDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportPropertiesDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            watch: None,
            target: None,
            initial: ExportFields::default(),
            fields: ExportFields::default(),
        }
    }

    pub fn open(&mut self, snapshot: &EditSnapshot<'_>, watch: DialogWatch) {
        self.visible = true;
        self.watch = Some(watch);
        self.load(snapshot);
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.watch = None;
    }

    pub fn needs_reload(&self) -> bool {
        self.watch.as_ref().is_some_and(|w| w.changed())
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<(CellId, ExportId)> {
        self.target
    }

    fn disable(&mut self, reason: &str) {
        info!("Export properties: {}", reason);
        self.target = None;
        self.initial = ExportFields::default();
        self.fields = ExportFields::default();
    }

    /// Loads the single export selected in the current cell. A highlighted
    /// node counts when it carries exactly one export.
    pub fn load(&mut self, snapshot: &EditSnapshot<'_>) {
        let Some(cell_id) = snapshot.cell else {
            self.disable("no cell in the edit window");
            return;
        };
        let Some(cell) = snapshot.db.cell(cell_id) else {
            self.disable("current cell no longer exists");
            return;
        };

        let mut candidates: Vec<ExportId> = Vec::new();
        for highlight in snapshot.highlighter.highlighted() {
            if highlight.cell() != cell_id {
                continue;
            }
            match *highlight {
                Highlight::Export(_, export) => candidates.push(export),
                Highlight::Node(_, node) => {
                    let exports = cell.node_exports(node);
                    if exports.len() == 1 {
                        candidates.push(exports[0]);
                    }
                }
                Highlight::Arc(..) => {}
            }
        }
        candidates.sort();
        candidates.dedup();

        if candidates.len() != 1 {
            self.disable("select exactly one export");
            return;
        }
        let export_id = candidates[0];
        let Some(export) = cell.export(export_id) else {
            self.disable("selected export no longer exists");
            return;
        };

        self.initial = ExportFields {
            name: export.name.clone(),
            body_only: export.body_only,
            always_drawn: export.always_drawn,
            characteristic: export.characteristic,
            reference_name: export.reference_name.clone().unwrap_or_default(),
        };
        self.fields = self.initial.clone();
        self.target = Some((cell_id, export_id));
    }

    fn characteristic_changed(&self) -> bool {
        self.fields.characteristic != self.initial.characteristic
            || self.fields.effective_reference() != self.initial.effective_reference()
    }

    pub fn has_changes(&self) -> bool {
        self.fields.name != self.initial.name
            || self.fields.body_only != self.initial.body_only
            || self.fields.always_drawn != self.initial.always_drawn
            || self.characteristic_changed()
    }

    /// Enqueues a job when anything differs from what was loaded. The staged
    /// values then become the new baseline, so repeating the commit without
    /// further edits enqueues nothing.
    pub fn commit(&mut self, sink: &dyn JobSink) -> bool {
        let Some((cell, export)) = self.target else {
            info!("Export properties: nothing to apply");
            return false;
        };
        if !self.has_changes() {
            debug!("Export properties: no changes");
            return false;
        }

        let new_name = (self.fields.name != self.initial.name).then(|| self.fields.name.clone());
        let characteristic = self
            .characteristic_changed()
            .then(|| (self.fields.characteristic, self.fields.effective_reference()));
        sink.submit(Box::new(ChangeExportJob {
            cell,
            export,
            new_name,
            body_only: self.fields.body_only,
            always_drawn: self.fields.always_drawn,
            characteristic,
        }));
        self.initial = self.fields.clone();
        true
    }

    pub fn render(&mut self, ctx: &egui::Context, sink: &dyn JobSink) {
        if !self.visible {
            return;
        }

        let mut open = true;
        egui::Window::new("Export Properties")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_enabled_ui(self.is_enabled(), |ui| {
                    egui::Grid::new("export_props_grid")
                        .num_columns(2)
                        .spacing([8.0, 6.0])
                        .show(ui, |ui| {
                            ui.label("Name:");
                            ui.text_edit_singleline(&mut self.fields.name);
                            ui.end_row();

                            ui.label("Characteristic:");
                            egui::ComboBox::from_id_salt("export_characteristic")
                                .selected_text(self.fields.characteristic.label())
                                .show_ui(ui, |ui| {
                                    for ch in PortCharacteristic::ALL {
                                        ui.selectable_value(
                                            &mut self.fields.characteristic,
                                            ch,
                                            ch.label(),
                                        );
                                    }
                                });
                            ui.end_row();

                            ui.label("Reference name:");
                            ui.add_enabled(
                                self.fields.characteristic.is_reference(),
                                egui::TextEdit::singleline(&mut self.fields.reference_name),
                            );
                            ui.end_row();
                        });
                    ui.checkbox(&mut self.fields.body_only, "Body only");
                    ui.checkbox(&mut self.fields.always_drawn, "Always drawn");
                });
                if !self.is_enabled() {
                    ui.label("Select exactly one export in the edit window.");
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(self.has_changes(), egui::Button::new("Apply"))
                        .clicked()
                    {
                        self.commit(sink);
                    }
                    if ui.button("OK").clicked() {
                        self.commit(sink);
                        self.close();
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
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Outline points dialog for the trace of one highlighted node.

use eframe::egui;
use log::{debug, info, warn};

use super::{DialogWatch, EditSnapshot};
use crate::db::{CellId, Database, NodeId, Point, Technology};
use crate::job::{Job, JobError, JobSink};
use crate::units::{format_distance, parse_distance, DistanceUnit, UnitError};

/// Rewrites the whole trace of a node.
pub struct SetOutlineJob {
    pub cell: CellId,
    pub node: NodeId,
    /// Absolute coordinates.
    pub points: Vec<Point>,
}

impl Job for SetOutlineJob {
    fn name(&self) -> &str {
        "Change outline"
    }

    fn run(&mut self, db: &mut Database) -> Result<String, JobError> {
        let node = db
            .cell_mut(self.cell)
            .and_then(|cell| cell.node_mut(self.node))
            .ok_or_else(|| JobError::NotFound("outline node".to_string()))?;
        if self.points.is_empty() {
            return Err(JobError::Invalid("an outline needs at least one point".to_string()));
        }
        node.set_outline(&self.points);
        Ok(format!("Node {} now has {} outline points", node.name, self.points.len()))
    }
}

pub struct OutlineEditDialog {
    pub visible: bool,
    watch: Option<DialogWatch>,
    target: Option<(CellId, NodeId)>,
    points: Vec<Point>,
    selected: usize,
    unit: DistanceUnit,
    pub x_text: String,
    pub y_text: String,
    pub last_error: Option<String>,
}

impl Default for OutlineEditDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineEditDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            watch: None,
            target: None,
            points: Vec::new(),
            selected: 0,
            unit: DistanceUnit::Lambda,
            x_text: String::new(),
            y_text: String::new(),
            last_error: None,
        }
    }

    pub fn open(&mut self, snapshot: &EditSnapshot<'_>, watch: DialogWatch, unit: DistanceUnit) {
        self.visible = true;
        self.watch = Some(watch);
        self.unit = unit;
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

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn set_unit(&mut self, unit: DistanceUnit, tech: &Technology) {
        self.unit = unit;
        self.refresh_text(tech);
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Follows the session display unit. Returns true if the unit changed.
    pub fn sync_unit(&mut self, unit: DistanceUnit, tech: &Technology) -> bool {
        if self.unit == unit {
            return false;
        }
        debug!("Outline points: display unit is now {}", unit.label());
        self.set_unit(unit, tech);
        true
    }

    fn clear(&mut self, reason: &str) {
        info!("Outline points: {}", reason);
        self.target = None;
        self.points.clear();
        self.selected = 0;
        self.x_text.clear();
        self.y_text.clear();
    }

    /// Loads the outline of the one highlighted node that has a trace.
    pub fn load(&mut self, snapshot: &EditSnapshot<'_>) {
        self.last_error = None;
        let nodes: Vec<(CellId, NodeId)> = snapshot.highlighter.nodes().collect();
        if nodes.len() != 1 {
            self.clear("select exactly one node");
            return;
        }
        let (cell_id, node_id) = nodes[0];
        let Some(points) = snapshot
            .db
            .cell(cell_id)
            .and_then(|cell| cell.node(node_id))
            .and_then(|node| node.outline_absolute())
        else {
            self.clear("selected node has no outline");
            return;
        };
        self.target = Some((cell_id, node_id));
        self.points = points;
        self.selected = 0;
        self.refresh_text(&snapshot.db.technology);
    }

    fn refresh_text(&mut self, tech: &Technology) {
        match self.points.get(self.selected) {
            Some(p) => {
                self.x_text = format_distance(p.x, tech, self.unit);
                self.y_text = format_distance(p.y, tech, self.unit);
            }
            None => {
                self.x_text.clear();
                self.y_text.clear();
            }
        }
    }

    pub fn select(&mut self, index: usize, tech: &Technology) {
        if index < self.points.len() {
            self.selected = index;
            self.refresh_text(tech);
        }
    }

    /// Inserts a copy of the selected point after it and selects the copy.
    pub fn duplicate_point(&mut self, tech: &Technology) {
        let Some(point) = self.points.get(self.selected).copied() else {
            return;
        };
        self.points.insert(self.selected + 1, point);
        self.selected += 1;
        self.refresh_text(tech);
    }

    /// Removes the selected point. The selection stays at the same index, or
    /// moves back one when the last point was removed.
    pub fn delete_point(&mut self, tech: &Technology) -> bool {
        if self.points.len() <= 1 {
            warn!("Outline points: cannot delete the only point");
            return false;
        }
        self.points.remove(self.selected);
        if self.selected >= self.points.len() {
            self.selected = self.points.len() - 1;
        }
        self.refresh_text(tech);
        true
    }

    /// Parses the coordinate fields into the selected point, then reformats them.
    pub fn set_coordinate_text(&mut self, tech: &Technology) -> Result<(), UnitError> {
        if self.selected >= self.points.len() {
            return Ok(());
        }
        let x = parse_distance(&self.x_text, tech, self.unit)?;
        let y = parse_distance(&self.y_text, tech, self.unit)?;
        self.points[self.selected] = Point::new(x, y);
        self.refresh_text(tech);
        Ok(())
    }

    pub fn apply(&mut self, sink: &dyn JobSink) -> bool {
        let Some((cell, node)) = self.target else {
            info!("Outline points: nothing to apply");
            return false;
        };
        if self.points.is_empty() {
            return false;
        }
        sink.submit(Box::new(SetOutlineJob {
            cell,
            node,
            points: self.points.clone(),
        }));
        true
    }

    pub fn render(&mut self, ctx: &egui::Context, tech: &Technology, sink: &dyn JobSink) {
        if !self.visible {
            return;
        }

        let mut open = true;
        egui::Window::new("Outline Points")
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                if !self.is_enabled() {
                    ui.label("Select one node with an outline.");
                    return;
                }

                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        let mut clicked = None;
                        for (i, p) in self.points.iter().enumerate() {
                            let label = format!(
                                "{}: ({}, {})",
                                i,
                                format_distance(p.x, tech, self.unit),
                                format_distance(p.y, tech, self.unit)
                            );
                            if ui.selectable_label(i == self.selected, label).clicked() {
                                clicked = Some(i);
                            }
                        }
                        if let Some(i) = clicked {
                            self.select(i, tech);
                        }
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("X:");
                    let x = ui.add(egui::TextEdit::singleline(&mut self.x_text).desired_width(90.0));
                    ui.label("Y:");
                    let y = ui.add(egui::TextEdit::singleline(&mut self.y_text).desired_width(90.0));
                    if x.lost_focus() || y.lost_focus() {
                        self.last_error = self.set_coordinate_text(tech).err().map(|e| e.to_string());
                    }
                });
                if let Some(error) = &self.last_error {
                    ui.colored_label(egui::Color32::from_rgb(244, 67, 54), error);
                }

                ui.horizontal(|ui| {
                    if ui.button("Duplicate Point").clicked() {
                        self.duplicate_point(tech);
                    }
                    if ui
                        .add_enabled(self.points.len() > 1, egui::Button::new("Delete Point"))
                        .clicked()
                    {
                        self.delete_point(tech);
                    }
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        self.apply(sink);
                    }
                    if ui.button("OK").clicked() {
                        self.apply(sink);
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

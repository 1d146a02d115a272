// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Object browser
//!
//! Lists the nodes, arcs, exports or networks of the current cell in natural
//! name order. Searching selects every matching entry and highlights the
//! objects behind it in the edit window.

use std::collections::HashSet;

use eframe::egui;
use log::{debug, info, warn};
use regex::RegexBuilder;

use super::{DialogWatch, EditSnapshot};
use crate::db::network::networks;
use crate::db::{ArcId, CellId, Database, ExportId, NodeId};
use crate::export::{export_listing_to_csv, ObjectCsvRecord};
use crate::highlight::{Highlight, Highlighter};
use crate::natural::natural_cmp;
use crate::units::{format_distance, DistanceUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseMode {
    #[default]
    Nodes,
    Arcs,
    Exports,
    Networks,
}

impl BrowseMode {
    pub const ALL: [BrowseMode; 4] = [
        BrowseMode::Nodes,
        BrowseMode::Arcs,
        BrowseMode::Exports,
        BrowseMode::Networks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BrowseMode::Nodes => "Nodes",
            BrowseMode::Arcs => "Arcs",
            BrowseMode::Exports => "Exports",
            BrowseMode::Networks => "Networks",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseTarget {
    Node(NodeId),
    Arc(ArcId),
    Export(ExportId),
    Network { nodes: Vec<NodeId>, arcs: Vec<ArcId> },
}

impl BrowseTarget {
    fn highlights(&self, cell: CellId) -> Vec<Highlight> {
        match self {
            BrowseTarget::Node(node) => vec![Highlight::Node(cell, *node)],
            BrowseTarget::Arc(arc) => vec![Highlight::Arc(cell, *arc)],
            BrowseTarget::Export(export) => vec![Highlight::Export(cell, *export)],
            BrowseTarget::Network { nodes, arcs } => nodes
                .iter()
                .map(|n| Highlight::Node(cell, *n))
                .chain(arcs.iter().map(|a| Highlight::Arc(cell, *a)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseEntry {
    pub name: String,
    pub target: BrowseTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Nothing was selected or changed.
    Unchanged,
    /// This many entries are now selected.
    Applied(usize),
    /// The selection is held back until [`ObjectBrowserDialog::confirm_pending`].
    NeedsConfirmation(usize),
}

pub struct ObjectBrowserDialog {
    pub visible: bool,
    watch: Option<DialogWatch>,
    pub mode: BrowseMode,
    cell: Option<CellId>,
    entries: Vec<BrowseEntry>,
    /// Indices into `entries`, ascending.
    selected: Vec<usize>,
    pending: Option<Vec<usize>>,
    pub search_text: String,
    pub use_regex: bool,
}

impl Default for ObjectBrowserDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectBrowserDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            watch: None,
            mode: BrowseMode::Nodes,
            cell: None,
            entries: Vec::new(),
            selected: Vec::new(),
            pending: None,
            search_text: String::new(),
            use_regex: false,
        }
    }

    pub fn open(&mut self, snapshot: &EditSnapshot<'_>, watch: DialogWatch) {
        self.visible = true;
        self.watch = Some(watch);
        self.rebuild(snapshot);
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.watch = None;
        self.pending = None;
    }

    pub fn needs_reload(&self) -> bool {
        self.watch.as_ref().is_some_and(|w| w.changed())
    }

    pub fn entries(&self) -> &[BrowseEntry] {
        &self.entries
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn pending_count(&self) -> Option<usize> {
        self.pending.as_ref().map(Vec::len)
    }

    pub fn set_mode(&mut self, mode: BrowseMode, snapshot: &EditSnapshot<'_>) {
        if self.mode != mode {
            self.mode = mode;
            self.rebuild(snapshot);
        }
    }

    /// Re-reads the entries of the current cell and mirrors the highlight set.
    pub fn rebuild(&mut self, snapshot: &EditSnapshot<'_>) {
        self.entries.clear();
        self.selected.clear();
        self.pending = None;
        self.cell = snapshot.cell;

        let Some(cell) = snapshot.cell.and_then(|id| snapshot.db.cell(id)) else {
            info!("Object browser: no cell in the edit window");
            self.cell = None;
            return;
        };

        match self.mode {
            BrowseMode::Nodes => {
                for id in cell.node_ids() {
                    if let Some(node) = cell.node(id) {
                        self.entries.push(BrowseEntry {
                            name: node.name.clone(),
                            target: BrowseTarget::Node(id),
                        });
                    }
                }
            }
            BrowseMode::Arcs => {
                for id in cell.arc_ids() {
                    if let Some(arc) = cell.arc(id) {
                        self.entries.push(BrowseEntry {
                            name: arc.name.clone(),
                            target: BrowseTarget::Arc(id),
                        });
                    }
                }
            }
            BrowseMode::Exports => {
                for id in cell.export_ids() {
                    if let Some(export) = cell.export(id) {
                        self.entries.push(BrowseEntry {
                            name: export.name.clone(),
                            target: BrowseTarget::Export(id),
                        });
                    }
                }
            }
            BrowseMode::Networks => {
                for net in networks(cell, &snapshot.db.technology) {
                    self.entries.push(BrowseEntry {
                        name: net.name,
                        target: BrowseTarget::Network {
                            nodes: net.nodes,
                            arcs: net.arcs,
                        },
                    });
                }
            }
        }
        self.entries.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        debug!(
            "Object browser: {} {} in {}",
            self.entries.len(),
            self.mode.label().to_lowercase(),
            cell.describe()
        );
        self.sync_selection(snapshot.highlighter);
    }

    /// Selects the entries whose objects are all highlighted.
    pub fn sync_selection(&mut self, highlighter: &Highlighter) {
        let Some(cell) = self.cell else {
            self.selected.clear();
            return;
        };
        self.selected = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                let highlights = entry.target.highlights(cell);
                !highlights.is_empty() && highlights.iter().all(|h| highlighter.is_highlighted(*h))
            })
            .map(|(i, _)| i)
            .collect();
    }

    /// Entries whose name matches `text`. Without regex the match is a
    /// case-insensitive substring test. With regex the pattern alone decides;
    /// a pattern that does not compile falls back to the substring test.
    pub fn matching_indices(&self, text: &str, use_regex: bool) -> Vec<usize> {
        if use_regex {
            match RegexBuilder::new(text).case_insensitive(true).build() {
                Ok(regex) => {
                    return self
                        .entries
                        .iter()
                        .enumerate()
                        .filter(|(_, e)| regex.is_match(&e.name))
                        .map(|(i, _)| i)
                        .collect();
                }
                Err(e) => warn!(
                    "Object browser: invalid regular expression '{}', using substring search: {}",
                    text, e
                ),
            }
        }
        let needle = text.to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Entries shown in the list: all of them, or those matching the search text.
    pub fn visible_indices(&self) -> Vec<usize> {
        if self.search_text.is_empty() {
            (0..self.entries.len()).collect()
        } else {
            self.matching_indices(&self.search_text, self.use_regex)
        }
    }

    /// Selects everything matching the search text. An empty search text
    /// leaves the list and the selection alone.
    pub fn search(&mut self, threshold: usize, highlighter: &mut Highlighter) -> SelectOutcome {
        if self.search_text.is_empty() {
            return SelectOutcome::Unchanged;
        }
        let matches = self.matching_indices(&self.search_text, self.use_regex);
        if matches.is_empty() {
            info!("Object browser: nothing matches '{}'", self.search_text);
            return SelectOutcome::Unchanged;
        }
        self.request_selection(matches, threshold, highlighter)
    }

    pub fn select_all(&mut self, threshold: usize, highlighter: &mut Highlighter) -> SelectOutcome {
        let all = (0..self.entries.len()).collect();
        self.request_selection(all, threshold, highlighter)
    }

    /// Applies a selection, or parks it when it exceeds `threshold` entries.
    pub fn request_selection(
        &mut self,
        indices: Vec<usize>,
        threshold: usize,
        highlighter: &mut Highlighter,
    ) -> SelectOutcome {
        if indices.len() > threshold {
            let count = indices.len();
            info!(
                "Object browser: {} objects match, waiting for confirmation",
                count
            );
            self.pending = Some(indices);
            return SelectOutcome::NeedsConfirmation(count);
        }
        self.pending = None;
        self.apply_selection(indices, highlighter)
    }

    pub fn confirm_pending(&mut self, highlighter: &mut Highlighter) -> SelectOutcome {
        match self.pending.take() {
            Some(indices) => self.apply_selection(indices, highlighter),
            None => SelectOutcome::Unchanged,
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Click on a list row. With `toggle` the row is added or removed,
    /// otherwise it becomes the only selected row.
    pub fn click_entry(&mut self, index: usize, toggle: bool, highlighter: &mut Highlighter) {
        if index >= self.entries.len() {
            return;
        }
        let indices = if toggle {
            let mut indices = self.selected.clone();
            match indices.iter().position(|i| *i == index) {
                Some(pos) => {
                    indices.remove(pos);
                }
                None => indices.push(index),
            }
            indices
        } else {
            vec![index]
        };
        self.pending = None;
        self.apply_selection(indices, highlighter);
    }

    fn apply_selection(
        &mut self,
        mut indices: Vec<usize>,
        highlighter: &mut Highlighter,
    ) -> SelectOutcome {
        let Some(cell) = self.cell else {
            return SelectOutcome::Unchanged;
        };
        indices.retain(|i| *i < self.entries.len());
        indices.sort_unstable();
        indices.dedup();
        let highlights = indices
            .iter()
            .flat_map(|i| self.entries[*i].target.highlights(cell))
            .collect();
        self.selected = indices;
        highlighter.set(highlights);
        SelectOutcome::Applied(self.selected.len())
    }

    /// CSV rows for the entries currently shown.
    pub fn listing_records(&self, db: &Database, unit: DistanceUnit) -> Vec<ObjectCsvRecord> {
        let Some(cell) = self.cell.and_then(|id| db.cell(id)) else {
            return Vec::new();
        };
        let tech = &db.technology;
        let visible: HashSet<usize> = self.visible_indices().into_iter().collect();
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, _)| visible.contains(i))
            .map(|(_, entry)| {
                let (kind, details) = match &entry.target {
                    BrowseTarget::Node(id) => (
                        "Node",
                        cell.node(*id)
                            .map(|n| {
                                format!(
                                    "{} at ({}, {})",
                                    n.proto,
                                    format_distance(n.center.x, tech, unit),
                                    format_distance(n.center.y, tech, unit)
                                )
                            })
                            .unwrap_or_default(),
                    ),
                    BrowseTarget::Arc(id) => (
                        "Arc",
                        cell.arc(*id)
                            .map(|a| format!("{} width {}", a.proto, format_distance(a.width, tech, unit)))
                            .unwrap_or_default(),
                    ),
                    BrowseTarget::Export(id) => (
                        "Export",
                        cell.export(*id)
                            .map(|e| e.characteristic.label().to_string())
                            .unwrap_or_default(),
                    ),
                    BrowseTarget::Network { nodes, arcs } => (
                        "Network",
                        format!("{} nodes, {} arcs", nodes.len(), arcs.len()),
                    ),
                };
                ObjectCsvRecord {
                    name: entry.name.clone(),
                    kind: kind.to_string(),
                    cell: cell.describe(),
                    details,
                }
            })
            .collect()
    }

    pub fn export_csv(
        &self,
        db: &Database,
        unit: DistanceUnit,
        file_path: &str,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let records = self.listing_records(db, unit);
        export_listing_to_csv(&records, file_path)?;
        info!("Object browser: wrote {} rows to {}", records.len(), file_path);
        Ok(records.len())
    }

    pub fn render(
        &mut self,
        ctx: &egui::Context,
        db: &Database,
        cell: Option<CellId>,
        highlighter: &mut Highlighter,
        threshold: usize,
        unit: DistanceUnit,
    ) -> Option<Result<String, String>> {
        if !self.visible {
            return None;
        }

        let mut open = true;
        let mut message = None;
        egui::Window::new("Select Object")
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(300.0)
            .default_height(420.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for mode in BrowseMode::ALL {
                        if ui.radio(self.mode == mode, mode.label()).clicked() {
                            let snapshot = EditSnapshot {
                                db,
                                cell,
                                highlighter: &*highlighter,
                            };
                            self.set_mode(mode, &snapshot);
                        }
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Search:");
                    let response = ui.text_edit_singleline(&mut self.search_text);
                    let regex_toggled = ui.checkbox(&mut self.use_regex, "Regex").changed();
                    if response.changed() || regex_toggled {
                        self.search(threshold, highlighter);
                    }
                });

                if let Some(count) = self.pending_count() {
                    ui.horizontal(|ui| {
                        ui.colored_label(
                            egui::Color32::from_rgb(255, 152, 0),
                            format!("Select {} objects?", count),
                        );
                        if ui.button("Yes").clicked() {
                            self.confirm_pending(highlighter);
                        }
                        if ui.button("No").clicked() {
                            self.cancel_pending();
                        }
                    });
                }

                ui.separator();
                let visible = self.visible_indices();
                ui.label(format!("{} of {} shown", visible.len(), self.entries.len()));

                let row_height = ui.text_style_height(&egui::TextStyle::Body);
                let mut clicked = None;
                egui::ScrollArea::vertical()
                    .max_height(300.0)
                    .auto_shrink([false, false])
                    .show_rows(ui, row_height, visible.len(), |ui, rows| {
                        for row in rows {
                            let index = visible[row];
                            let selected = self.selected.binary_search(&index).is_ok();
                            let response =
                                ui.selectable_label(selected, &self.entries[index].name);
                            if response.clicked() {
                                clicked = Some((index, ui.input(|i| i.modifiers.command)));
                            }
                        }
                    });
                if let Some((index, toggle)) = clicked {
                    self.click_entry(index, toggle, highlighter);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Select All").clicked() {
                        self.select_all(threshold, highlighter);
                    }
                    if ui.button("Export CSV...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV files", &["csv"])
                            .set_file_name("objects.csv")
                            .save_file()
                        {
                            let path = path.to_string_lossy().to_string();
                            message = Some(match self.export_csv(db, unit, &path) {
                                Ok(rows) => Ok(format!("Exported {} rows to:\n{}", rows, path)),
                                Err(e) => Err(format!("Failed to export listing: {}", e)),
                            });
                        }
                    }
                    if ui.button("Done").clicked() {
                        self.visible = false;
                    }
                });
            });

        if !open || !self.visible {
            self.close();
        }
        message
    }
}

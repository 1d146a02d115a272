// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use eframe::egui;
use log::{debug, error, info};
use lyon_tessellation::math::point;
use lyon_tessellation::path::Path as LyonPath;
use lyon_tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use rfd::FileDialog;

use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use vlsi_dialogs::db::reader::DesignReader;
use vlsi_dialogs::db::writer::save_design;
use vlsi_dialogs::db::{CellId, ColorIndex, Database, Look, NodeInst, Point, Technology};
use vlsi_dialogs::dialogs::{
    ArtworkLookDialog, DialogWatch, EditSnapshot, ExportPropertiesDialog, LayoutTextDialog,
    ObjectBrowserDialog, OutlineEditDialog,
};
use vlsi_dialogs::highlight::{ChangeNotifier, Highlight, Highlighter};
use vlsi_dialogs::job::JobQueue;
use vlsi_dialogs::prefs::Preferences;
use vlsi_dialogs::raster::FontCatalog;
use vlsi_dialogs::units::DistanceUnit;

const HIGHLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 235, 59);

/// Drawn as a polyline instead of a filled shape.
const OPENED_POLYGON: &str = "artwork-opened-polygon";

/// File loading state
#[derive(Debug, Clone, Default)]
enum LoadingState {
    #[default]
    Idle,
    Loading {
        file_name: String,
        start_time: Instant,
        show_progress: bool,
    },
}

/// File loading result message
#[derive(Debug)]
enum LoadingMessage {
    DesignLoaded(Box<Result<Database, String>>, String), // Result and file path
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    ArtworkLook,
    ExportProperties,
    OutlinePoints,
    LayoutText,
    SelectObject,
}

pub struct EditorApp {
    db: Arc<RwLock<Database>>,
    db_changes: ChangeNotifier,
    jobs: JobQueue,
    highlighter: Highlighter,
    prefs: Preferences,
    fonts: FontCatalog,
    current_cell: Option<CellId>,
    design_path: Option<String>,
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
    fit_to_view_requested: bool,
    error_message: Option<String>,
    success_message: Option<String>,
    // Dialogs
    artwork_look: ArtworkLookDialog,
    export_props: ExportPropertiesDialog,
    outline_edit: OutlineEditDialog,
    layout_text: LayoutTextDialog,
    object_browser: ObjectBrowserDialog,
    // Async loading state
    loading_state: LoadingState,
    loading_receiver: Option<mpsc::Receiver<LoadingMessage>>,
}

impl EditorApp {
    pub fn new(db: Database, design_path: Option<String>) -> Self {
        let current_cell = db.cell_ids().next();
        let db = Arc::new(RwLock::new(db));
        let db_changes = ChangeNotifier::new();
        let jobs = JobQueue::new(db.clone(), db_changes.clone());
        Self {
            db,
            db_changes,
            jobs,
            highlighter: Highlighter::new(),
            prefs: Preferences::default(),
            fonts: FontCatalog::with_default_fonts(),
            current_cell,
            design_path,
            zoom: 10.0,
            pan_x: 0.0,
            pan_y: 0.0,
            fit_to_view_requested: true,
            error_message: None,
            success_message: None,
            artwork_look: ArtworkLookDialog::new(),
            export_props: ExportPropertiesDialog::new(),
            outline_edit: OutlineEditDialog::new(),
            layout_text: LayoutTextDialog::new(),
            object_browser: ObjectBrowserDialog::new(),
            loading_state: LoadingState::Idle,
            loading_receiver: None,
        }
    }

    fn check_loading_progress(&mut self, ctx: &egui::Context) {
        // Check if we need to show progress bar (after 500ms)
        if let LoadingState::Loading {
            start_time,
            show_progress,
            ..
        } = &mut self.loading_state
        {
            if !*show_progress && start_time.elapsed() >= Duration::from_millis(500) {
                *show_progress = true;
                ctx.request_repaint();
            }
        }

        if let Some(receiver) = &self.loading_receiver {
            match receiver.try_recv() {
                Ok(LoadingMessage::DesignLoaded(result, path)) => {
                    self.loading_state = LoadingState::Idle;
                    self.loading_receiver = None;
                    match *result {
                        Ok(db) => self.install_design(db, path),
                        Err(error) => self.error_message = Some(error),
                    }
                    ctx.request_repaint();
                }
                Err(mpsc::TryRecvError::Empty) => {
                    ctx.request_repaint_after(Duration::from_millis(100));
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.loading_state = LoadingState::Idle;
                    self.loading_receiver = None;
                    self.error_message = Some("File loading was interrupted".to_string());
                    ctx.request_repaint();
                }
            }
        }
    }

    fn start_design_loading(&mut self, path: String) {
        let file_name = Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        self.loading_state = LoadingState::Loading {
            file_name,
            start_time: Instant::now(),
            show_progress: false,
        };

        let (tx, rx) = mpsc::channel();
        self.loading_receiver = Some(rx);

        thread::spawn(move || {
            let reader = DesignReader::new();
            let result = reader
                .read(&path)
                .map_err(|e| format!("Failed to load design file: {}", e));
            let _ = tx.send(LoadingMessage::DesignLoaded(Box::new(result), path));
        });
    }

    fn install_design(&mut self, db: Database, path: String) {
        self.current_cell = db.cell_ids().next();
        info!("Opened library {} from {}", db.library_name, path);
        // Jobs still queued hold ids into the old design; they finish against
        // it when the old queue is dropped
        let db = Arc::new(RwLock::new(db));
        self.jobs = JobQueue::new(db.clone(), self.db_changes.clone());
        self.db = db;
        self.design_path = Some(path);
        self.highlighter.clear();
        self.db_changes.notify();
        self.fit_to_view_requested = true;
    }

    fn set_current_cell(&mut self, cell: CellId) {
        if self.current_cell != Some(cell) {
            self.current_cell = Some(cell);
            self.highlighter.clear();
            // Dialogs that depend on the edit window reload on the next frame
            self.db_changes.notify();
            self.fit_to_view_requested = true;
        }
    }

    fn design_basename(&self) -> String {
        self.design_path
            .as_deref()
            .and_then(|p| Path::new(p).file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("design")
            .to_string()
    }

    fn handle_save_design(&mut self) {
        let default_filename = format!("{}.dsn", self.design_basename());
        if let Some(file_path) = FileDialog::new()
            .set_file_name(&default_filename)
            .add_filter("Design files", &["dsn"])
            .save_file()
        {
            let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
            match save_design(&db, &file_path) {
                Ok(()) => {
                    self.success_message =
                        Some(format!("Saved design to: {}", file_path.display()));
                }
                Err(e) => {
                    self.error_message = Some(format!("Failed to save design: {}", e));
                }
            }
        }
    }

    fn handle_export_listing(&mut self) {
        let default_filename = format!("{}_objects.csv", self.design_basename());
        let Some(file_path) = FileDialog::new()
            .set_file_name(&default_filename)
            .add_filter("CSV files", &["csv"])
            .save_file()
        else {
            return;
        };
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        if !self.object_browser.visible {
            let snapshot = EditSnapshot {
                db: &db,
                cell: self.current_cell,
                highlighter: &self.highlighter,
            };
            self.object_browser.rebuild(&snapshot);
        }
        match self.object_browser.export_csv(
            &db,
            self.prefs.display_unit,
            &file_path.to_string_lossy(),
        ) {
            Ok(rows) => {
                self.success_message = Some(format!(
                    "Successfully exported {} objects to CSV file: {}",
                    rows,
                    file_path.display()
                ));
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to export CSV: {}", e));
            }
        }
    }

    fn open_dialog(&mut self, kind: DialogKind) {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        let snapshot = EditSnapshot {
            db: &db,
            cell: self.current_cell,
            highlighter: &self.highlighter,
        };
        let watch = DialogWatch::new(&self.highlighter, &self.db_changes);
        match kind {
            DialogKind::ArtworkLook => self.artwork_look.open(&snapshot, watch, &self.prefs),
            DialogKind::ExportProperties => self.export_props.open(&snapshot, watch),
            DialogKind::OutlinePoints => {
                self.outline_edit
                    .open(&snapshot, watch, self.prefs.display_unit)
            }
            DialogKind::LayoutText => self.layout_text.open(),
            DialogKind::SelectObject => self.object_browser.open(&snapshot, watch),
        }
    }

    /// Reloads every open dialog whose selection or database changed.
    fn reload_dialogs(&mut self) {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        let snapshot = EditSnapshot {
            db: &db,
            cell: self.current_cell,
            highlighter: &self.highlighter,
        };
        if self.artwork_look.needs_reload() {
            self.artwork_look.load(&snapshot, &self.prefs);
        }
        if self.export_props.needs_reload() {
            self.export_props.load(&snapshot);
        }
        if self.outline_edit.needs_reload() {
            self.outline_edit.load(&snapshot);
        }
        self.outline_edit
            .sync_unit(self.prefs.display_unit, &db.technology);
        if self.object_browser.needs_reload() {
            self.object_browser.rebuild(&snapshot);
        }
    }

    fn poll_jobs(&mut self) {
        for outcome in self.jobs.poll() {
            match outcome.result {
                Ok(report) => info!("{}: {}", outcome.name, report),
                Err(e) => {
                    error!("{} failed: {}", outcome.name, e);
                    self.error_message = Some(format!("{} failed: {}", outcome.name, e));
                }
            }
        }
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Design").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("Design files", &["dsn"])
                        .pick_file()
                    {
                        self.start_design_loading(path.to_string_lossy().to_string());
                    }
                    ui.close_menu();
                }

                if ui.button("Save Design As").clicked() {
                    self.handle_save_design();
                    ui.close_menu();
                }

                ui.separator();

                if ui
                    .add_enabled(
                        self.current_cell.is_some(),
                        egui::Button::new("Export Listing CSV"),
                    )
                    .clicked()
                {
                    self.handle_export_listing();
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Exit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let items = [
                    ("Artwork Look...", DialogKind::ArtworkLook),
                    ("Export Properties...", DialogKind::ExportProperties),
                    ("Outline Points...", DialogKind::OutlinePoints),
                    ("Layout Text...", DialogKind::LayoutText),
                    ("Select Object...", DialogKind::SelectObject),
                ];
                for (label, kind) in items {
                    if ui.button(label).clicked() {
                        self.open_dialog(kind);
                        ui.close_menu();
                    }
                }
                ui.separator();
                if ui.button("Deselect All").clicked() {
                    self.highlighter.clear();
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                let cells: Vec<(CellId, String)> = {
                    let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
                    db.cell_ids()
                        .filter_map(|id| db.cell(id).map(|c| (id, c.describe())))
                        .collect()
                };
                ui.label("Cell:");
                for (id, name) in cells {
                    if ui
                        .selectable_label(self.current_cell == Some(id), name)
                        .clicked()
                    {
                        self.set_current_cell(id);
                        ui.close_menu();
                    }
                }
                ui.separator();
                ui.label("Units:");
                for unit in DistanceUnit::ALL {
                    ui.radio_value(&mut self.prefs.display_unit, unit, unit.label());
                }
                ui.separator();
                if ui.button("Fit to View").clicked() {
                    self.fit_to_view_requested = true;
                    ui.close_menu();
                }
            });
        });
    }

    fn render_status_panel(&self, ui: &mut egui::Ui) {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        ui.horizontal(|ui| {
            ui.label(format!("Library: {} ({})", db.library_name, db.technology.name));
            ui.separator();
            match self.current_cell.and_then(|id| db.cell(id)) {
                Some(cell) => ui.label(format!(
                    "Cell: {}  nodes {}  arcs {}  exports {}",
                    cell.describe(),
                    cell.nodes.len(),
                    cell.arcs.len(),
                    cell.exports.len()
                )),
                None => ui.label("No cell"),
            };
            ui.separator();
            ui.label(format!("{} selected", self.highlighter.highlighted().len()));
        });
    }

    fn fit_to_view(&mut self, available_size: egui::Vec2) {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        let Some(cell) = self.current_cell.and_then(|id| db.cell(id)) else {
            return;
        };
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for node in &cell.nodes {
            let (lo, hi) = node.bounds();
            min.x = min.x.min(lo.x);
            min.y = min.y.min(lo.y);
            max.x = max.x.max(hi.x);
            max.y = max.y.max(hi.y);
        }
        let width = (max.x - min.x) as f32;
        let height = (max.y - min.y) as f32;
        if width > 0.0 && height > 0.0 {
            let scale_x = available_size.x * 0.9 / width;
            let scale_y = available_size.y * 0.9 / height;
            self.zoom = scale_x.min(scale_y).max(0.1);
            self.pan_x = -((min.x + max.x) * 0.5) as f32 * self.zoom;
            self.pan_y = ((min.y + max.y) * 0.5) as f32 * self.zoom;
        }
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let available_size = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::click_and_drag());

        if self.fit_to_view_requested {
            self.fit_to_view(available_size);
            self.fit_to_view_requested = false;
        }
        if ui.input(|i| i.key_pressed(egui::Key::F)) {
            self.fit_to_view(available_size);
        }

        if response.dragged() {
            let delta = response.drag_delta();
            self.pan_x += delta.x;
            self.pan_y += delta.y;
        }

        let rect = response.rect;
        let center = rect.center();

        if let Some(hover_pos) = response.hover_pos() {
            let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_delta != 0.0 {
                let zoom_factor = if scroll_delta > 0.0 { 1.1 } else { 0.9 };
                let world_x = (hover_pos.x - center.x - self.pan_x) / self.zoom;
                let world_y = (hover_pos.y - center.y - self.pan_y) / self.zoom;
                self.zoom = (self.zoom * zoom_factor).clamp(0.01, 1000.0);
                self.pan_x = hover_pos.x - center.x - world_x * self.zoom;
                self.pan_y = hover_pos.y - center.y - world_y * self.zoom;
            }
        }

        let origin = egui::pos2(center.x + self.pan_x, center.y + self.pan_y);
        let zoom = self.zoom;
        let to_screen =
            |p: Point| egui::pos2(origin.x + p.x as f32 * zoom, origin.y - p.y as f32 * zoom);
        let to_world = |p: egui::Pos2| {
            Point::new(
                ((p.x - origin.x) / zoom) as f64,
                ((origin.y - p.y) / zoom) as f64,
            )
        };

        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        let mut clicked_node = None;
        {
            let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
            let Some(cell_id) = self.current_cell else {
                return;
            };
            let Some(cell) = db.cell(cell_id) else {
                return;
            };
            let tech = &db.technology;

            for id in cell.arc_ids() {
                let Some(arc) = cell.arc(id) else { continue };
                let (Some(head), Some(tail)) = (cell.node(arc.head), cell.node(arc.tail)) else {
                    continue;
                };
                let color = if self.highlighter.is_highlighted(Highlight::Arc(cell_id, id)) {
                    HIGHLIGHT_COLOR
                } else {
                    look_color(&arc.look, tech.arc_layer(&arc.proto).map(|l| l.color))
                };
                painter.line_segment(
                    [to_screen(head.center), to_screen(tail.center)],
                    egui::Stroke::new((arc.width as f32 * zoom).max(1.0), color),
                );
            }

            for id in cell.node_ids() {
                let Some(node) = cell.node(id) else { continue };
                let fill =
                    look_color(&node.look, tech.primitive_layer(&node.proto).map(|l| l.color));
                let highlighted = self.highlighter.is_highlighted(Highlight::Node(cell_id, id));
                let outline: Vec<egui::Pos2> =
                    node_outline(node).into_iter().map(to_screen).collect();
                if node.proto == OPENED_POLYGON {
                    painter.add(egui::Shape::line(
                        outline.clone(),
                        egui::Stroke::new(1.5, fill),
                    ));
                } else if let Some(mesh) = fill_polygon(&outline, fill.gamma_multiply(0.6)) {
                    painter.add(egui::Shape::mesh(mesh));
                }
                if highlighted {
                    painter.add(egui::Shape::closed_line(
                        outline,
                        egui::Stroke::new(2.0, HIGHLIGHT_COLOR),
                    ));
                }
            }

            for id in cell.export_ids() {
                let Some(export) = cell.export(id) else { continue };
                let Some(node) = cell.node(export.node) else { continue };
                let color = if self.highlighter.is_highlighted(Highlight::Export(cell_id, id)) {
                    HIGHLIGHT_COLOR
                } else {
                    egui::Color32::WHITE
                };
                painter.text(
                    to_screen(node.center),
                    egui::Align2::CENTER_CENTER,
                    &export.name,
                    egui::FontId::proportional(12.0),
                    color,
                );
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let world = to_world(pos);
                    clicked_node = Some(
                        cell.node_ids()
                            .rev()
                            .find(|id| cell.node(*id).is_some_and(|n| n.contains(world)))
                            .map(|id| Highlight::Node(cell_id, id)),
                    );
                }
            }
        }

        if let Some(hit) = clicked_node {
            let additive = ui.input(|i| i.modifiers.shift);
            match (hit, additive) {
                (Some(h), true) if self.highlighter.is_highlighted(h) => self.highlighter.remove(h),
                (Some(h), true) => self.highlighter.add(h),
                (Some(h), false) => self.highlighter.set(vec![h]),
                (None, false) => self.highlighter.clear(),
                (None, true) => {}
            }
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        let tech: &Technology = &db.technology;
        self.artwork_look.render(ctx, tech, &self.jobs, &mut self.prefs);
        self.export_props.render(ctx, &self.jobs);
        self.outline_edit.render(ctx, tech, &self.jobs);
        {
            let snapshot = EditSnapshot {
                db: &db,
                cell: self.current_cell,
                highlighter: &self.highlighter,
            };
            self.layout_text
                .render(ctx, &mut self.fonts, &snapshot, &self.jobs, &mut self.prefs);
        }
        let export_result = self.object_browser.render(
            ctx,
            &db,
            self.current_cell,
            &mut self.highlighter,
            self.prefs.selection_warn_threshold,
            self.prefs.display_unit,
        );
        match export_result {
            Some(Ok(message)) => self.success_message = Some(message),
            Some(Err(message)) => self.error_message = Some(message),
            None => {}
        }
    }
}

/// Absolute outline of a node, or its bounding rectangle when it has none.
fn node_outline(node: &NodeInst) -> Vec<Point> {
    if let Some(points) = node.outline_absolute() {
        if points.len() >= 2 {
            return points;
        }
    }
    let (min, max) = node.bounds();
    vec![
        Point::new(min.x, min.y),
        Point::new(max.x, min.y),
        Point::new(max.x, max.y),
        Point::new(min.x, max.y),
    ]
}

fn look_color(look: &Look, layer_color: Option<[u8; 3]>) -> egui::Color32 {
    let [r, g, b] = look
        .color
        .and_then(ColorIndex::rgb)
        .or(layer_color)
        .filter(|rgb| *rgb != [0, 0, 0])
        .unwrap_or([180, 180, 180]);
    egui::Color32::from_rgb(r, g, b)
}

/// Tessellates a simple or self-intersecting polygon into a filled mesh.
fn fill_polygon(points: &[egui::Pos2], color: egui::Color32) -> Option<egui::Mesh> {
    if points.len() < 3 {
        return None;
    }
    let mut builder = LyonPath::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(true);
    let path = builder.build();

    let mut geometry: VertexBuffers<egui::Pos2, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    if let Err(e) = tessellator.tessellate_path(
        &path,
        &FillOptions::default(),
        &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| {
            let p = vertex.position();
            egui::pos2(p.x, p.y)
        }),
    ) {
        debug!("Cannot fill polygon: {:?}", e);
        return None;
    }

    let mut mesh = egui::Mesh::default();
    for pos in geometry.vertices {
        mesh.colored_vertex(pos, color);
    }
    for triangle in geometry.indices.chunks_exact(3) {
        mesh.add_triangle(triangle[0], triangle[1], triangle[2]);
    }
    Some(mesh)
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_loading_progress(ctx);
        self.poll_jobs();
        self.reload_dialogs();

        if let Some(error) = &self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(244, 67, 54), error);
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.allocate_space(egui::Vec2::new(ui.available_width() / 2.0 - 25.0, 0.0));
                        if ui.button("OK").clicked() {
                            self.error_message = None;
                        }
                    });
                });
        }

        if let Some(success) = &self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(76, 175, 80), success);
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.allocate_space(egui::Vec2::new(ui.available_width() / 2.0 - 25.0, 0.0));
                        if ui.button("OK").clicked() {
                            self.success_message = None;
                        }
                    });
                });
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        if let LoadingState::Loading {
            file_name,
            start_time,
            show_progress,
        } = &self.loading_state
        {
            if *show_progress {
                egui::TopBottomPanel::top("loading_bar").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!("Loading design file: {}", file_name));
                        ui.label(format!("({:.1}s)", start_time.elapsed().as_secs_f32()));
                    });
                });
            }
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.render_status_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui);
        });

        self.render_dialogs(ctx);

        // Job results arrive from the worker thread
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

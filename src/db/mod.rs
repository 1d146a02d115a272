// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! In-memory design database
//!
//! A library holds cells; each cell owns its node instances, arc instances and
//! exports. Objects live in per-cell arenas addressed by copyable ids and are
//! never removed, so an id stays valid for the lifetime of the database.

pub mod network;
pub mod parser;
pub mod reader;
pub mod technology;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use technology::{ArcKind, Layer, PrimitiveNode, Technology};

/// Characters a name may contain in the design file format.
pub fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ';' | '(' | ')' | '#')
}

/// True if `name` can be written to a design file and read back unchanged.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArcId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExportId(pub usize);

/// The representation a cell describes. Cells sharing a name across views form a cell group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Layout,
    Schematic,
    Icon,
    Documentation,
    Netlist,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Layout,
        View::Schematic,
        View::Icon,
        View::Documentation,
        View::Netlist,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            View::Layout => "lay",
            View::Schematic => "sch",
            View::Icon => "ic",
            View::Documentation => "doc",
            View::Netlist => "net",
        }
    }

    pub fn from_abbreviation(text: &str) -> Option<Self> {
        View::ALL
            .into_iter()
            .find(|view| view.abbreviation().eq_ignore_ascii_case(text))
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Layout => "layout",
            View::Schematic => "schematic",
            View::Icon => "icon",
            View::Documentation => "documentation",
            View::Netlist => "netlist",
        }
    }
}

/// Electrical role of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PortCharacteristic {
    #[default]
    Unknown,
    Input,
    Output,
    Bidirectional,
    Power,
    Ground,
    Clock,
    Clock1,
    Clock2,
    Clock3,
    Clock4,
    Clock5,
    Clock6,
    ReferenceOutput,
    ReferenceInput,
    ReferenceBase,
}

impl PortCharacteristic {
    pub const ALL: [PortCharacteristic; 16] = [
        PortCharacteristic::Unknown,
        PortCharacteristic::Input,
        PortCharacteristic::Output,
        PortCharacteristic::Bidirectional,
        PortCharacteristic::Power,
        PortCharacteristic::Ground,
        PortCharacteristic::Clock,
        PortCharacteristic::Clock1,
        PortCharacteristic::Clock2,
        PortCharacteristic::Clock3,
        PortCharacteristic::Clock4,
        PortCharacteristic::Clock5,
        PortCharacteristic::Clock6,
        PortCharacteristic::ReferenceOutput,
        PortCharacteristic::ReferenceInput,
        PortCharacteristic::ReferenceBase,
    ];

    /// Reference characteristics name another export of the cell.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            PortCharacteristic::ReferenceOutput
                | PortCharacteristic::ReferenceInput
                | PortCharacteristic::ReferenceBase
        )
    }

    pub fn short_name(self) -> &'static str {
        match self {
            PortCharacteristic::Unknown => "unknown",
            PortCharacteristic::Input => "in",
            PortCharacteristic::Output => "out",
            PortCharacteristic::Bidirectional => "bidir",
            PortCharacteristic::Power => "pwr",
            PortCharacteristic::Ground => "gnd",
            PortCharacteristic::Clock => "clk",
            PortCharacteristic::Clock1 => "c1",
            PortCharacteristic::Clock2 => "c2",
            PortCharacteristic::Clock3 => "c3",
            PortCharacteristic::Clock4 => "c4",
            PortCharacteristic::Clock5 => "c5",
            PortCharacteristic::Clock6 => "c6",
            PortCharacteristic::ReferenceOutput => "refout",
            PortCharacteristic::ReferenceInput => "refin",
            PortCharacteristic::ReferenceBase => "refbase",
        }
    }

    pub fn from_short_name(text: &str) -> Option<Self> {
        PortCharacteristic::ALL
            .into_iter()
            .find(|ch| ch.short_name().eq_ignore_ascii_case(text))
    }

    pub fn label(self) -> &'static str {
        match self {
            PortCharacteristic::Unknown => "Unknown",
            PortCharacteristic::Input => "Input",
            PortCharacteristic::Output => "Output",
            PortCharacteristic::Bidirectional => "Bidirectional",
            PortCharacteristic::Power => "Power",
            PortCharacteristic::Ground => "Ground",
            PortCharacteristic::Clock => "Clock",
            PortCharacteristic::Clock1 => "Clock Phase 1",
            PortCharacteristic::Clock2 => "Clock Phase 2",
            PortCharacteristic::Clock3 => "Clock Phase 3",
            PortCharacteristic::Clock4 => "Clock Phase 4",
            PortCharacteristic::Clock5 => "Clock Phase 5",
            PortCharacteristic::Clock6 => "Clock Phase 6",
            PortCharacteristic::ReferenceOutput => "Reference Output",
            PortCharacteristic::ReferenceInput => "Reference Input",
            PortCharacteristic::ReferenceBase => "Reference Base",
        }
    }
}

/// Set on palette indices that carry an explicit RGB value.
pub const FULL_RGB_BIT: u32 = 0x2;
/// Highest transparent-layer slot a palette index can refer to.
pub const MAX_TRANSPARENT_SLOT: u8 = 12;

/// Packed palette index: either a transparent-layer slot or a full RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorIndex(pub u32);

impl ColorIndex {
    pub fn from_transparent(slot: u8) -> Option<Self> {
        if slot == 0 || slot > MAX_TRANSPARENT_SLOT {
            return None;
        }
        Some(Self((slot as u32) << 2))
    }

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self(
            ((rgb[0] as u32) << 24) | ((rgb[1] as u32) << 16) | ((rgb[2] as u32) << 8) | FULL_RGB_BIT,
        )
    }

    pub fn transparent_slot(self) -> Option<u8> {
        if self.0 & FULL_RGB_BIT != 0 {
            return None;
        }
        let slot = self.0 >> 2;
        if slot >= 1 && slot <= MAX_TRANSPARENT_SLOT as u32 {
            Some(slot as u8)
        } else {
            None
        }
    }

    pub fn rgb(self) -> Option<[u8; 3]> {
        if self.0 & FULL_RGB_BIT == 0 {
            return None;
        }
        Some([
            (self.0 >> 24) as u8,
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
        ])
    }
}

/// How the edge of a patterned shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutlineStyle {
    #[default]
    NoOutline,
    Solid,
    Dotted,
    Dashed,
    Thick,
    ThickDashed,
}

impl OutlineStyle {
    pub const ALL: [OutlineStyle; 6] = [
        OutlineStyle::NoOutline,
        OutlineStyle::Solid,
        OutlineStyle::Dotted,
        OutlineStyle::Dashed,
        OutlineStyle::Thick,
        OutlineStyle::ThickDashed,
    ];

    pub fn index(self) -> u32 {
        match self {
            OutlineStyle::NoOutline => 0,
            OutlineStyle::Solid => 1,
            OutlineStyle::Dotted => 2,
            OutlineStyle::Dashed => 3,
            OutlineStyle::Thick => 4,
            OutlineStyle::ThickDashed => 5,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        OutlineStyle::ALL.into_iter().find(|s| s.index() == index)
    }

    pub fn label(self) -> &'static str {
        match self {
            OutlineStyle::NoOutline => "No outline",
            OutlineStyle::Solid => "Solid",
            OutlineStyle::Dotted => "Dotted",
            OutlineStyle::Dashed => "Dashed",
            OutlineStyle::Thick => "Thick",
            OutlineStyle::ThickDashed => "Thick dashed",
        }
    }
}

/// Per-object appearance overrides. Unset fields fall back to the layer's look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Look {
    pub color: Option<ColorIndex>,
    pub pattern: Option<[u16; 16]>,
    pub outline_style: Option<OutlineStyle>,
}

impl Look {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.pattern.is_none() && self.outline_style.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInst {
    pub name: String,
    pub proto: String,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Trace points relative to `center`.
    pub outline: Option<Vec<Point>>,
    pub look: Look,
}

impl NodeInst {
    pub fn new(name: &str, proto: &str, center: Point, width: f64, height: f64) -> Self {
        Self {
            name: name.to_string(),
            proto: proto.to_string(),
            center,
            width,
            height,
            outline: None,
            look: Look::default(),
        }
    }

    pub fn outline_absolute(&self) -> Option<Vec<Point>> {
        self.outline.as_ref().map(|points| {
            points
                .iter()
                .map(|p| Point::new(p.x + self.center.x, p.y + self.center.y))
                .collect()
        })
    }

    /// Replaces the trace with `points` (absolute coordinates). The node is
    /// recentred on their bounding box and resized to it.
    pub fn set_outline(&mut self, points: &[Point]) {
        if points.is_empty() {
            self.outline = None;
            return;
        }
        let (min, max) = bounding_box(points);
        self.center = Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        self.width = max.x - min.x;
        self.height = max.y - min.y;
        self.outline = Some(
            points
                .iter()
                .map(|p| Point::new(p.x - self.center.x, p.y - self.center.y))
                .collect(),
        );
    }

    pub fn bounds(&self) -> (Point, Point) {
        match self.outline_absolute() {
            Some(points) if !points.is_empty() => bounding_box(&points),
            _ => (
                Point::new(
                    self.center.x - self.width / 2.0,
                    self.center.y - self.height / 2.0,
                ),
                Point::new(
                    self.center.x + self.width / 2.0,
                    self.center.y + self.height / 2.0,
                ),
            ),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        let (min, max) = self.bounds();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

fn bounding_box(points: &[Point]) -> (Point, Point) {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcInst {
    pub name: String,
    pub proto: String,
    pub head: NodeId,
    pub tail: NodeId,
    pub width: f64,
    pub look: Look,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    pub name: String,
    pub node: NodeId,
    pub characteristic: PortCharacteristic,
    pub reference_name: Option<String>,
    pub body_only: bool,
    pub always_drawn: bool,
}

impl Export {
    pub fn new(name: &str, node: NodeId, characteristic: PortCharacteristic) -> Self {
        Self {
            name: name.to_string(),
            node,
            characteristic,
            reference_name: None,
            body_only: false,
            always_drawn: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub name: String,
    pub view: View,
    pub nodes: Vec<NodeInst>,
    pub arcs: Vec<ArcInst>,
    pub exports: Vec<Export>,
}

impl Cell {
    pub fn new(name: &str, view: View) -> Self {
        Self {
            name: name.to_string(),
            view,
            nodes: Vec::new(),
            arcs: Vec::new(),
            exports: Vec::new(),
        }
    }

    /// Name in `cell{view}` form.
    pub fn describe(&self) -> String {
        format!("{}{{{}}}", self.name, self.view.abbreviation())
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeInst> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeInst> {
        self.nodes.get_mut(id.0)
    }

    pub fn arc(&self, id: ArcId) -> Option<&ArcInst> {
        self.arcs.get(id.0)
    }

    pub fn arc_mut(&mut self, id: ArcId) -> Option<&mut ArcInst> {
        self.arcs.get_mut(id.0)
    }

    pub fn export(&self, id: ExportId) -> Option<&Export> {
        self.exports.get(id.0)
    }

    pub fn export_mut(&mut self, id: ExportId) -> Option<&mut Export> {
        self.exports.get_mut(id.0)
    }

    pub fn add_node(&mut self, node: NodeInst) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_arc(&mut self, arc: ArcInst) -> ArcId {
        self.arcs.push(arc);
        ArcId(self.arcs.len() - 1)
    }

    pub fn add_export(&mut self, export: Export) -> ExportId {
        self.exports.push(export);
        ExportId(self.exports.len() - 1)
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn find_export(&self, name: &str) -> Option<ExportId> {
        self.exports.iter().position(|e| e.name == name).map(ExportId)
    }

    pub fn node_exports(&self, node: NodeId) -> Vec<ExportId> {
        self.exports
            .iter()
            .enumerate()
            .filter(|(_, e)| e.node == node)
            .map(|(i, _)| ExportId(i))
            .collect()
    }

    pub fn node_ids(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn arc_ids(&self) -> impl DoubleEndedIterator<Item = ArcId> {
        (0..self.arcs.len()).map(ArcId)
    }

    pub fn export_ids(&self) -> impl DoubleEndedIterator<Item = ExportId> {
        (0..self.exports.len()).map(ExportId)
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    pub technology: Technology,
    pub library_name: String,
    pub cells: Vec<Cell>,
    /// Bumped after every successful mutation job.
    pub change_count: u64,
}

impl Database {
    pub fn new(technology: Technology, library_name: &str) -> Self {
        Self {
            technology,
            library_name: library_name.to_string(),
            cells: Vec::new(),
            change_count: 0,
        }
    }

    pub fn add_cell(&mut self, cell: Cell) -> CellId {
        self.cells.push(cell);
        CellId(self.cells.len() - 1)
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.0)
    }

    pub fn cell_ids(&self) -> impl DoubleEndedIterator<Item = CellId> {
        (0..self.cells.len()).map(CellId)
    }

    pub fn find_cell(&self, name: &str, view: View) -> Option<CellId> {
        self.cells
            .iter()
            .position(|c| c.name == name && c.view == view)
            .map(CellId)
    }

    /// All cells sharing the name of `id`, including `id` itself.
    pub fn cell_group(&self, id: CellId) -> Vec<CellId> {
        let Some(cell) = self.cell(id) else {
            return Vec::new();
        };
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name == cell.name)
            .map(|(i, _)| CellId(i))
            .collect()
    }
}

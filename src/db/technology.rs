// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub color: [u8; 3],
    /// 0 when the layer is drawn opaque.
    pub transparent_slot: u8,
    pub pattern: [u16; 16],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveNode {
    pub name: String,
    pub layer: String,
    pub default_width: f64,
    pub default_height: f64,
    pub electrical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcKind {
    pub name: String,
    pub layer: String,
    pub default_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub nm_per_lambda: f64,
    pub layers: Vec<Layer>,
    pub primitives: Vec<PrimitiveNode>,
    pub arc_kinds: Vec<ArcKind>,
}

const SOLID: [u16; 16] = [0xFFFF; 16];

const METAL1_PATTERN: [u16; 16] = [
    0x2222, 0x0000, 0x8888, 0x0000, 0x2222, 0x0000, 0x8888, 0x0000, 0x2222, 0x0000, 0x8888,
    0x0000, 0x2222, 0x0000, 0x8888, 0x0000,
];

const METAL2_PATTERN: [u16; 16] = [
    0x1010, 0x2020, 0x4040, 0x8080, 0x0101, 0x0202, 0x0404, 0x0808, 0x1010, 0x2020, 0x4040,
    0x8080, 0x0101, 0x0202, 0x0404, 0x0808,
];

const POLY_PATTERN: [u16; 16] = [
    0x0808, 0x0404, 0x0202, 0x0101, 0x8080, 0x4040, 0x2020, 0x1010, 0x0808, 0x0404, 0x0202,
    0x0101, 0x8080, 0x4040, 0x2020, 0x1010,
];

const ACTIVE_PATTERN: [u16; 16] = [
    0x0000, 0x0303, 0x4848, 0x0303, 0x0000, 0x3030, 0x8484, 0x3030, 0x0000, 0x0303, 0x4848,
    0x0303, 0x0000, 0x3030, 0x8484, 0x3030,
];

const VIA_PATTERN: [u16; 16] = [
    0xCCCC, 0xCCCC, 0x3333, 0x3333, 0xCCCC, 0xCCCC, 0x3333, 0x3333, 0xCCCC, 0xCCCC, 0x3333,
    0x3333, 0xCCCC, 0xCCCC, 0x3333, 0x3333,
];

fn layer(name: &str, color: [u8; 3], transparent_slot: u8, pattern: [u16; 16]) -> Layer {
    Layer {
        name: name.to_string(),
        color,
        transparent_slot,
        pattern,
    }
}

fn primitive(name: &str, layer: &str, size: f64, electrical: bool) -> PrimitiveNode {
    PrimitiveNode {
        name: name.to_string(),
        layer: layer.to_string(),
        default_width: size,
        default_height: size,
        electrical,
    }
}

fn arc_kind(name: &str, layer: &str, default_width: f64) -> ArcKind {
    ArcKind {
        name: name.to_string(),
        layer: layer.to_string(),
        default_width,
    }
}

impl Technology {
    /// Generic scalable CMOS process with artwork primitives.
    pub fn mocmos() -> Self {
        Self {
            name: "mocmos".to_string(),
            nm_per_lambda: 200.0,
            layers: vec![
                layer("Metal-1", [96, 209, 255], 1, METAL1_PATTERN),
                layer("Polysilicon-1", [255, 155, 192], 2, POLY_PATTERN),
                layer("Active", [107, 226, 96], 3, ACTIVE_PATTERN),
                layer("Metal-2", [224, 95, 255], 4, METAL2_PATTERN),
                layer("Via1", [180, 180, 180], 0, VIA_PATTERN),
                layer("Graphics", [0, 0, 0], 0, SOLID),
            ],
            primitives: vec![
                primitive("metal-1-pin", "Metal-1", 3.0, true),
                primitive("metal-2-pin", "Metal-2", 3.0, true),
                primitive("polysilicon-1-pin", "Polysilicon-1", 2.0, true),
                primitive("metal-1-node", "Metal-1", 3.0, true),
                primitive("metal-2-node", "Metal-2", 3.0, true),
                primitive("polysilicon-1-node", "Polysilicon-1", 2.0, true),
                primitive("active-node", "Active", 3.0, true),
                primitive("metal-1-metal-2-con", "Via1", 5.0, true),
                primitive("artwork-box", "Graphics", 6.0, false),
                primitive("artwork-filled-polygon", "Graphics", 6.0, false),
                primitive("artwork-opened-polygon", "Graphics", 6.0, false),
            ],
            arc_kinds: vec![
                arc_kind("metal-1", "Metal-1", 3.0),
                arc_kind("metal-2", "Metal-2", 3.0),
                arc_kind("polysilicon-1", "Polysilicon-1", 2.0),
                arc_kind("active", "Active", 3.0),
                arc_kind("artwork-solid", "Graphics", 0.0),
            ],
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "mocmos" => Some(Self::mocmos()),
            _ => None,
        }
    }

    pub fn find_layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn find_primitive(&self, name: &str) -> Option<&PrimitiveNode> {
        self.primitives.iter().find(|p| p.name == name)
    }

    pub fn find_arc_kind(&self, name: &str) -> Option<&ArcKind> {
        self.arc_kinds.iter().find(|a| a.name == name)
    }

    pub fn primitive_layer(&self, proto: &str) -> Option<&Layer> {
        self.find_primitive(proto)
            .and_then(|p| self.find_layer(&p.layer))
    }

    pub fn arc_layer(&self, proto: &str) -> Option<&Layer> {
        self.find_arc_kind(proto)
            .and_then(|a| self.find_layer(&a.layer))
    }

    /// Layer that owns a transparent slot.
    pub fn transparent_layer(&self, slot: u8) -> Option<&Layer> {
        if slot == 0 {
            return None;
        }
        self.layers.iter().find(|l| l.transparent_slot == slot)
    }

    pub fn is_electrical(&self, proto: &str) -> bool {
        self.find_primitive(proto).is_some_and(|p| p.electrical)
    }
}

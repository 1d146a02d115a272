// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Session preferences shared by the dialogs.
//!
//! Values live for the editing session only; dialogs read and update them so
//! that a reopened dialog starts from the last used settings.

use serde::{Deserialize, Serialize};

use crate::units::DistanceUnit;

/// Selecting more objects than this asks for confirmation first.
pub const DEFAULT_SELECTION_WARN_THRESHOLD: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTextPrefs {
    pub font: String,
    /// Rendered text height in pixels.
    pub size: f32,
    /// Grid pitch in lambda per pixel.
    pub scale: f64,
    /// Gap in lambda between neighbouring pixel shapes.
    pub separation: f64,
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    pub invert: bool,
    pub primitive: String,
    pub message: String,
}

impl Default for LayoutTextPrefs {
    fn default() -> Self {
        Self {
            font: "Hack".to_string(),
            size: 12.0,
            scale: 1.0,
            separation: 0.0,
            italic: false,
            bold: false,
            underline: false,
            invert: false,
            primitive: "metal-1-node".to_string(),
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub display_unit: DistanceUnit,
    pub selection_warn_threshold: usize,
    pub artwork_pattern: [u16; 16],
    pub layout_text: LayoutTextPrefs,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            display_unit: DistanceUnit::Lambda,
            selection_warn_threshold: DEFAULT_SELECTION_WARN_THRESHOLD,
            artwork_pattern: [0xFFFF; 16],
            layout_text: LayoutTextPrefs::default(),
        }
    }
}

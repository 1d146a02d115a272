// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Text rasterisation for layout text
//!
//! A message is rendered line by line into grey-scale bitmaps, then every
//! "on" pixel becomes one primitive placement on a lambda grid.

use std::fmt;
use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use log::{debug, warn};

use crate::db::Point;

/// Pixels with at least this coverage count as "on".
pub const COVERAGE_THRESHOLD: u8 = 128;

/// Horizontal shift per pixel row for italic text.
const ITALIC_SLANT: f32 = 0.25;

/// Smallest shape size placed when separation eats the whole pitch.
const MIN_PLACEMENT_SIZE: f64 = 0.01;

#[derive(Debug)]
pub enum RasterError {
    UnknownFont(String),
    InvalidFont(String),
    Io(std::io::Error),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::UnknownFont(name) => write!(f, "font '{}' is not available", name),
            RasterError::InvalidFont(reason) => write!(f, "cannot read font: {}", reason),
            RasterError::Io(e) => write!(f, "cannot read font file: {}", e),
        }
    }
}

impl std::error::Error for RasterError {}

impl From<std::io::Error> for RasterError {
    fn from(e: std::io::Error) -> Self {
        RasterError::Io(e)
    }
}

/// Grey-scale image, one byte of coverage per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Builds a bitmap from rows of `#` (on) and anything else (off).
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut bitmap = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    bitmap.set(x, y, 255);
                }
            }
        }
        bitmap
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    fn blend(&mut self, x: i32, y: i32, value: u8) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            let pixel = &mut self.pixels[y * self.width + x];
            *pixel = (*pixel).max(value);
        }
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.get(x, y) >= COVERAGE_THRESHOLD
    }

    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .filter(|p| **p >= COVERAGE_THRESHOLD)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Fonts available to the layout-text generator.
pub struct FontCatalog {
    fonts: Vec<(String, FontArc)>,
}

impl FontCatalog {
    pub fn empty() -> Self {
        Self { fonts: Vec::new() }
    }

    /// The fonts bundled with egui.
    pub fn with_default_fonts() -> Self {
        let mut catalog = Self::empty();
        let definitions = egui::FontDefinitions::default();
        for (name, data) in definitions.font_data {
            match FontArc::try_from_vec(data.font.to_vec()) {
                Ok(font) => catalog.insert(name, font),
                Err(e) => warn!("Skipping bundled font {}: {}", name, e),
            }
        }
        debug!("Font catalog has {} fonts", catalog.fonts.len());
        catalog
    }

    /// Loads a TrueType/OpenType file and registers it under its file stem.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String, RasterError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let font =
            FontArc::try_from_vec(bytes).map_err(|e| RasterError::InvalidFont(e.to_string()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("font")
            .to_string();
        self.insert(name.clone(), font);
        Ok(name)
    }

    fn insert(&mut self, name: String, font: FontArc) {
        self.fonts.retain(|(existing, _)| *existing != name);
        self.fonts.push((name, font));
        self.fonts.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Result<&FontArc, RasterError> {
        self.fonts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, font)| font)
            .ok_or_else(|| RasterError::UnknownFont(name.to_string()))
    }
}

/// Renders one line of text. The bitmap height is the font's line height at
/// `size` pixels, whatever the text contains.
pub fn rasterize_line(font: &FontArc, text: &str, size: f32, style: TextStyle) -> Bitmap {
    let scale = PxScale::from(size.max(1.0));
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();
    let height = (ascent - scaled.descent()).ceil().max(1.0) as usize;

    let mut caret = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    let mut glyphs = Vec::new();
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(previous) = previous {
            caret += scaled.kern(previous, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, ascent)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let slant = if style.italic {
        (height as f32 * ITALIC_SLANT).ceil() as usize
    } else {
        0
    };
    let text_width = caret.ceil().max(0.0) as usize;
    let width = text_width + slant + usize::from(style.bold);
    let mut bitmap = Bitmap::new(width, height);

    for glyph in glyphs {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|x, y, coverage| {
            let px = bounds.min.x as i32 + x as i32;
            let py = bounds.min.y as i32 + y as i32;
            let shift = if style.italic {
                ((height as i32 - 1 - py).max(0) as f32 * ITALIC_SLANT) as i32
            } else {
                0
            };
            bitmap.blend(px + shift, py, (coverage.clamp(0.0, 1.0) * 255.0) as u8);
        });
    }

    if style.bold {
        for y in 0..height {
            for x in (1..width).rev() {
                let left = bitmap.get(x - 1, y);
                if left > bitmap.get(x, y) {
                    bitmap.set(x, y, left);
                }
            }
        }
    }

    if style.underline && height > 0 {
        let row = ((ascent + 1.0).round() as usize).min(height - 1);
        for x in 0..text_width.min(width) {
            bitmap.set(x, row, 255);
        }
    }

    bitmap
}

/// Renders each `\n`-separated line of `message`.
pub fn rasterize_message(font: &FontArc, message: &str, size: f32, style: TextStyle) -> Vec<Bitmap> {
    message
        .lines()
        .map(|line| rasterize_line(font, line, size, style))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    /// Lambda per pixel.
    pub scale: f64,
    /// Lambda left empty between neighbouring shapes.
    pub separation: f64,
    /// Place shapes where pixels are off instead of on.
    pub invert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Point,
    pub size: f64,
}

/// Maps pixels to grid placements. Lines stack downward; each line starts
/// below the accumulated pixel height of the lines before it.
pub fn place_bitmaps(lines: &[Bitmap], params: &PlacementParams) -> Vec<Placement> {
    let size = (params.scale - params.separation).max(MIN_PLACEMENT_SIZE);
    let mut placements = Vec::new();
    let mut row_offset = 0usize;

    for bitmap in lines {
        for row in 0..bitmap.height {
            for col in 0..bitmap.width {
                if bitmap.is_on(col, row) != params.invert {
                    placements.push(Placement {
                        center: Point::new(
                            col as f64 * params.scale,
                            -((row_offset + row) as f64) * params.scale,
                        ),
                        size,
                    });
                }
            }
        }
        row_offset += bitmap.height;
    }

    placements
}

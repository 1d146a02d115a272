// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use super::{parser::parse_design, Database};

pub struct DesignReader;

impl DesignReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Database, Box<dyn std::error::Error>> {
        let path_str = path.as_ref().display().to_string();
        println!("[LOAD] Loading design file: {path_str}");

        let content = fs::read_to_string(path)?;
        println!("[FILE] Design file size: {} bytes", content.len());

        self.read_str(&content)
    }

    pub fn read_str(&self, content: &str) -> Result<Database, Box<dyn std::error::Error>> {
        match parse_design(content) {
            Ok(db) => {
                println!("[PASS] Design parsed successfully!");
                let (nodes, arcs, exports) = db.cells.iter().fold((0, 0, 0), |acc, cell| {
                    (
                        acc.0 + cell.nodes.len(),
                        acc.1 + cell.arcs.len(),
                        acc.2 + cell.exports.len(),
                    )
                });
                println!(
                    "[INFO] Library {} ({}): {} cells, {nodes} nodes, {arcs} arcs, {exports} exports",
                    db.library_name,
                    db.technology.name,
                    db.cells.len()
                );
                Ok(db)
            }
            Err(e) => {
                println!("[FAIL] Failed to parse design file: {e}");
                Err(format!("Failed to parse design file: {e}").into())
            }
        }
    }
}

impl Default for DesignReader {
    fn default() -> Self {
        Self::new()
    }
}

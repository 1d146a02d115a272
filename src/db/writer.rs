// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use log::info;

use super::{Cell, Database, Look};

fn write_look(out: &mut String, look: &Look) -> fmt::Result {
    if let Some(color) = look.color {
        write!(out, " COLOR {}", color.0)?;
    }
    if let Some(pattern) = look.pattern {
        out.push_str(" PATTERN");
        for word in pattern {
            write!(out, " {:04X}", word)?;
        }
    }
    if let Some(style) = look.outline_style {
        write!(out, " STYLE {}", style.index())?;
    }
    Ok(())
}

fn write_cell(out: &mut String, cell: &Cell) -> fmt::Result {
    writeln!(out, "CELL {} VIEW {} ;", cell.name, cell.view.abbreviation())?;
    for node in &cell.nodes {
        write!(
            out,
            "  NODE {} PROTO {} AT {} {} SIZE {} {}",
            node.name, node.proto, node.center.x, node.center.y, node.width, node.height
        )?;
        if let Some(outline) = &node.outline {
            out.push_str(" OUTLINE");
            for p in outline {
                write!(out, " ( {} {} )", p.x, p.y)?;
            }
        }
        write_look(out, &node.look)?;
        out.push_str(" ;\n");
    }
    for arc in &cell.arcs {
        let head = cell.node(arc.head).map(|n| n.name.as_str()).unwrap_or("?");
        let tail = cell.node(arc.tail).map(|n| n.name.as_str()).unwrap_or("?");
        write!(
            out,
            "  ARC {} PROTO {} FROM {} TO {} WIDTH {}",
            arc.name, arc.proto, head, tail, arc.width
        )?;
        write_look(out, &arc.look)?;
        out.push_str(" ;\n");
    }
    for export in &cell.exports {
        let node = cell.node(export.node).map(|n| n.name.as_str()).unwrap_or("?");
        write!(
            out,
            "  EXPORT {} NODE {} CHARACTERISTIC {}",
            export.name,
            node,
            export.characteristic.short_name()
        )?;
        if let Some(reference) = &export.reference_name {
            write!(out, " REFERENCE {}", reference)?;
        }
        if export.body_only {
            out.push_str(" BODYONLY");
        }
        if export.always_drawn {
            out.push_str(" ALWAYSDRAWN");
        }
        out.push_str(" ;\n");
    }
    writeln!(out, "END {}", cell.name)
}

/// Renders the database in the design file format.
pub fn write_design(db: &Database) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "TECHNOLOGY {} ;", db.technology.name)?;
    writeln!(out, "LIBRARY {} ;", db.library_name)?;
    for cell in &db.cells {
        out.push('\n');
        write_cell(&mut out, cell)?;
    }
    out.push_str("\nEND LIBRARY\n");
    Ok(out)
}

pub fn save_design<P: AsRef<Path>>(
    db: &Database,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path.as_ref(), write_design(db)?)?;
    info!("Saved library {} to {}", db.library_name, path.as_ref().display());
    Ok(())
}

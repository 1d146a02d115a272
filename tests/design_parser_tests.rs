// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Test cases for the design file parser and writer
//!
//! Tests cover:
//! - Cells, views, nodes, arcs and exports
//! - Outlines and look attributes
//! - Comments
//! - Error reporting for malformed files
//! - Writing a database back out

mod common;

use std::fs;

use vlsi_dialogs::db::parser::parse_design;
use vlsi_dialogs::db::reader::DesignReader;
use vlsi_dialogs::db::writer::{save_design, write_design};
use vlsi_dialogs::db::{is_valid_name, ColorIndex, OutlineStyle, Point, PortCharacteristic, View};
use vlsi_dialogs::dialogs::{EditSnapshot, ExportPropertiesDialog};
use vlsi_dialogs::highlight::{Highlight, Highlighter};

#[test]
fn test_basic_cell_parsing() {
    let content = r#"
TECHNOLOGY mocmos ;
LIBRARY demo ;
CELL inv VIEW lay ;
  NODE pin1 PROTO metal-1-pin AT 0 0 SIZE 2 2 ;
  NODE pin2 PROTO metal-1-pin AT 10 0 SIZE 2 2 ;
  ARC wire1 PROTO metal-1 FROM pin1 TO pin2 WIDTH 3 ;
  EXPORT a NODE pin1 CHARACTERISTIC in BODYONLY ALWAYSDRAWN ;
  EXPORT r NODE pin2 CHARACTERISTIC refout REFERENCE a ;
END inv
END LIBRARY
"#;
    let db = parse_design(content).unwrap();
    assert_eq!(db.technology.name, "mocmos");
    assert_eq!(db.library_name, "demo");
    assert_eq!(db.cells.len(), 1);

    let cell = &db.cells[0];
    assert_eq!(cell.describe(), "inv{lay}");
    assert_eq!(cell.nodes.len(), 2);
    assert_eq!(cell.nodes[1].center, Point::new(10.0, 0.0));

    assert_eq!(cell.arcs.len(), 1);
    assert_eq!(cell.arcs[0].head, cell.find_node("pin1").unwrap());
    assert_eq!(cell.arcs[0].tail, cell.find_node("pin2").unwrap());
    assert_eq!(cell.arcs[0].width, 3.0);

    let a = &cell.exports[0];
    assert_eq!(a.characteristic, PortCharacteristic::Input);
    assert!(a.body_only);
    assert!(a.always_drawn);
    assert_eq!(a.reference_name, None);

    let r = &cell.exports[1];
    assert_eq!(r.characteristic, PortCharacteristic::ReferenceOutput);
    assert_eq!(r.reference_name.as_deref(), Some("a"));
    assert!(!r.body_only);
}

#[test]
fn test_outline_and_look() {
    let content = r#"
TECHNOLOGY mocmos ;   # generic CMOS
LIBRARY art ;
CELL logo VIEW ic ;
  # a triangle
  NODE tri PROTO artwork-filled-polygon AT 10 10 SIZE 4 4
       OUTLINE ( -2 -2 ) ( 2 -2 ) ( 0 2 ) COLOR 8
       PATTERN FFFF 0000 FFFF 0000 FFFF 0000 FFFF 0000 FFFF 0000 FFFF 0000 FFFF 0000 FFFF 0000
       STYLE 3 ;
END logo
END LIBRARY
"#;
    let db = parse_design(content).unwrap();
    let cell = &db.cells[0];
    assert_eq!(cell.view, View::Icon);
    let node = &cell.nodes[0];
    assert_eq!(
        node.outline_absolute().unwrap(),
        vec![Point::new(8.0, 8.0), Point::new(12.0, 8.0), Point::new(10.0, 12.0)]
    );
    assert_eq!(node.look.color, Some(ColorIndex(8)));
    assert_eq!(node.look.color.unwrap().transparent_slot(), Some(2));
    let pattern = node.look.pattern.unwrap();
    assert_eq!(pattern[0], 0xFFFF);
    assert_eq!(pattern[1], 0x0000);
    assert_eq!(node.look.outline_style, OutlineStyle::from_index(3));
}

#[test]
fn test_sample_design_loads() {
    let db = common::sample_db();
    assert_eq!(db.cells.len(), 4);
    let inv = db.find_cell("inv", View::Layout).unwrap();
    assert_eq!(db.cell_group(inv).len(), 3);
    let bus = db.find_cell("bus", View::Layout).unwrap();
    assert_eq!(db.cell(bus).unwrap().nodes.len(), 12);
}

#[test]
fn test_unknown_primitive_is_rejected() {
    let content = "TECHNOLOGY mocmos ;\nLIBRARY x ;\nCELL c VIEW lay ;\n  NODE n PROTO nonsense AT 0 0 SIZE 1 1 ;\nEND c\nEND LIBRARY\n";
    let err = parse_design(content).unwrap_err();
    assert!(err.to_string().contains("nonsense"));
}

#[test]
fn test_unknown_node_in_arc_is_rejected() {
    let content = "TECHNOLOGY mocmos ;\nLIBRARY x ;\nCELL c VIEW lay ;\n  NODE n PROTO metal-1-pin AT 0 0 SIZE 1 1 ;\n  ARC w PROTO metal-1 FROM n TO ghost WIDTH 3 ;\nEND c\nEND LIBRARY\n";
    let err = parse_design(content).unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_syntax_error_reports_line() {
    let content = "TECHNOLOGY mocmos ;\nLIBRARY x ;\nCELL c VIEW lay ;\n  NODE n PROTO metal-1-pin AT zero 0 SIZE 1 1 ;\nEND c\nEND LIBRARY\n";
    let err = parse_design(content).unwrap_err();
    assert_eq!(err.line, Some(4));
}

#[test]
fn test_mismatched_end_is_rejected() {
    let content = "TECHNOLOGY mocmos ;\nLIBRARY x ;\nCELL c VIEW lay ;\nEND d\nEND LIBRARY\n";
    assert!(parse_design(content).is_err());
}

#[test]
fn test_written_design_reads_back() {
    let db = common::sample_db();
    let text = write_design(&db).unwrap();
    let again = parse_design(&text).unwrap();
    assert_eq!(again.cells, db.cells);
    assert_eq!(again.library_name, db.library_name);
}

#[test]
fn test_save_and_read_file() {
    let db = common::sample_db();
    let path = std::env::temp_dir().join("vlsi_dialogs_save_test.dsn");
    save_design(&db, &path).unwrap();
    let again = DesignReader::new().read(&path).unwrap();
    assert_eq!(again.cells.len(), db.cells.len());
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_design_edited_through_dialog_reads_back() {
    let mut db = common::sample_db();
    let cell = db.find_cell("inv", View::Layout).unwrap();
    let export = db.cell(cell).unwrap().find_export("a").unwrap();
    let mut highlighter = Highlighter::new();
    highlighter.set(vec![Highlight::Export(cell, export)]);

    let mut dialog = ExportPropertiesDialog::new();
    dialog.load(&EditSnapshot {
        db: &db,
        cell: Some(cell),
        highlighter: &highlighter,
    });
    dialog.fields.name = "data_in".to_string();
    dialog.fields.characteristic = PortCharacteristic::ReferenceOutput;
    dialog.fields.reference_name = "y".to_string();
    let sink = common::RecordingSink::new();
    assert!(dialog.commit(&sink));
    assert!(sink.run_all(&mut db).remove(0).is_ok());

    let again = parse_design(&write_design(&db).unwrap()).unwrap();
    assert_eq!(again.cells, db.cells);
    let stored = again.cell(cell).unwrap().export(export).unwrap();
    assert_eq!(stored.name, "data_in");
    assert_eq!(stored.reference_name.as_deref(), Some("y"));
}

#[test]
fn test_ids_iterate_from_the_top() {
    let db = common::sample_db();
    let bus = db.find_cell("bus", View::Layout).unwrap();
    assert_eq!(db.cell_ids().next_back(), Some(bus));

    let cell = db.cell(bus).unwrap();
    assert_eq!(cell.node_ids().rev().next(), cell.find_node("p12"));
    assert_eq!(cell.export_ids().next_back(), cell.find_export("clk"));
    assert_eq!(cell.arc_ids().rev().count(), 3);

    // Topmost node under a point wins, as on the canvas
    let hit = cell
        .node_ids()
        .rev()
        .find(|id| cell.node(*id).is_some_and(|n| n.contains(Point::new(18.0, 10.0))));
    assert_eq!(hit, cell.find_node("p10"));
}

#[test]
fn test_name_rules_match_the_parser() {
    assert!(is_valid_name("data_in"));
    assert!(is_valid_name("text@3"));
    assert!(is_valid_name("bit[2]"));
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("data in"));
    for bad in ["a;", "(a", "a)", "a#1", "tab\tname"] {
        assert!(!is_valid_name(bad), "{bad}");
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

mod common;

use common::RecordingSink;
use vlsi_dialogs::db::parser::parse_design;
use vlsi_dialogs::db::writer::write_design;
use vlsi_dialogs::db::{CellId, ExportId, PortCharacteristic, View};
use vlsi_dialogs::dialogs::{EditSnapshot, ExportPropertiesDialog};
use vlsi_dialogs::highlight::{Highlight, Highlighter};
use vlsi_dialogs::job::JobError;
use vlsi_dialogs::Database;

fn export_a(db: &Database) -> (CellId, ExportId) {
    let cell = db.find_cell("inv", View::Layout).unwrap();
    let export = db.cell(cell).unwrap().find_export("a").unwrap();
    (cell, export)
}

fn loaded_dialog(db: &Database, highlights: Vec<Highlight>) -> ExportPropertiesDialog {
    let (cell, _) = export_a(db);
    let mut highlighter = Highlighter::new();
    highlighter.set(highlights);
    let snapshot = EditSnapshot {
        db,
        cell: Some(cell),
        highlighter: &highlighter,
    };
    let mut dialog = ExportPropertiesDialog::new();
    dialog.load(&snapshot);
    dialog
}

#[test]
fn test_unchanged_fields_enqueue_nothing() {
    let db = common::sample_db();
    let (cell, export) = export_a(&db);
    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    assert!(dialog.is_enabled());
    assert_eq!(dialog.fields.name, "a");

    let sink = RecordingSink::new();
    assert!(!dialog.commit(&sink));

    // Edits that are reverted before committing count as no change
    dialog.fields.body_only = true;
    dialog.fields.body_only = false;
    dialog.fields.reference_name = "ignored".to_string();
    assert!(!dialog.has_changes());
    assert!(!dialog.commit(&sink));
    assert_eq!(sink.len(), 0);
}

#[test]
fn test_node_with_single_export_selects_it() {
    let db = common::sample_db();
    let (cell, export) = export_a(&db);
    let node = db.cell(cell).unwrap().find_node("in_pin").unwrap();
    let dialog = loaded_dialog(&db, vec![Highlight::Node(cell, node)]);
    assert_eq!(dialog.target(), Some((cell, export)));
}

#[test]
fn test_ambiguous_selection_disables_dialog() {
    let db = common::sample_db();
    let (cell, export) = export_a(&db);
    let y = db.cell(cell).unwrap().find_export("y").unwrap();
    let dialog = loaded_dialog(
        &db,
        vec![Highlight::Export(cell, export), Highlight::Export(cell, y)],
    );
    assert!(!dialog.is_enabled());

    let dialog = loaded_dialog(&db, vec![]);
    assert!(!dialog.is_enabled());
}

#[test]
fn test_no_current_cell_disables_dialog() {
    let db = common::sample_db();
    let (cell, export) = export_a(&db);
    let mut highlighter = Highlighter::new();
    highlighter.set(vec![Highlight::Export(cell, export)]);
    let snapshot = EditSnapshot {
        db: &db,
        cell: None,
        highlighter: &highlighter,
    };
    let mut dialog = ExportPropertiesDialog::new();
    dialog.load(&snapshot);
    assert!(!dialog.is_enabled());
}

#[test]
fn test_characteristic_change_propagates_to_other_views() {
    let mut db = common::sample_db();
    let (cell, export) = export_a(&db);
    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    dialog.fields.characteristic = PortCharacteristic::Clock;

    let sink = RecordingSink::new();
    assert!(dialog.commit(&sink));
    assert!(!dialog.commit(&sink));
    assert_eq!(sink.len(), 1);

    let report = sink.run_all(&mut db).remove(0).unwrap();
    assert!(report.contains("schematic"), "{}", report);
    assert!(report.contains("icon"), "{}", report);

    for view in [View::Layout, View::Schematic, View::Icon] {
        let cell = db.cell(db.find_cell("inv", view).unwrap()).unwrap();
        let a = cell.export(cell.find_export("a").unwrap()).unwrap();
        assert_eq!(a.characteristic, PortCharacteristic::Clock);
    }
}

#[test]
fn test_flag_change_stays_local() {
    let mut db = common::sample_db();
    let (cell, export) = export_a(&db);
    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    dialog.fields.always_drawn = true;

    let sink = RecordingSink::new();
    assert!(dialog.commit(&sink));
    let report = sink.run_all(&mut db).remove(0).unwrap();
    assert!(!report.contains("view"), "{}", report);

    assert!(db.cell(cell).unwrap().export(export).unwrap().always_drawn);
    let sch = db.cell(db.find_cell("inv", View::Schematic).unwrap()).unwrap();
    assert!(!sch.exports[sch.find_export("a").unwrap().0].always_drawn);
}

#[test]
fn test_reference_name_kept_for_reference_characteristics() {
    let mut db = common::sample_db();
    let (cell, export) = export_a(&db);
    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    dialog.fields.characteristic = PortCharacteristic::ReferenceInput;
    dialog.fields.reference_name = " y ".to_string();

    let sink = RecordingSink::new();
    dialog.commit(&sink);
    sink.run_all(&mut db);
    let a = db.cell(cell).unwrap().export(export).unwrap();
    assert_eq!(a.characteristic, PortCharacteristic::ReferenceInput);
    assert_eq!(a.reference_name.as_deref(), Some("y"));
}

#[test]
fn test_rename_rules() {
    let mut db = common::sample_db();
    let (cell, export) = export_a(&db);

    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    dialog.fields.name = "y".to_string();
    let sink = RecordingSink::new();
    dialog.commit(&sink);
    let result = sink.run_all(&mut db).remove(0);
    assert!(matches!(result, Err(JobError::Invalid(_))));

    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    dialog.fields.name = "   ".to_string();
    dialog.commit(&sink);
    assert!(sink.run_all(&mut db).remove(0).is_err());

    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    dialog.fields.name = "a_in".to_string();
    dialog.commit(&sink);
    assert!(sink.run_all(&mut db).remove(0).is_ok());
    assert_eq!(db.cell(cell).unwrap().export(export).unwrap().name, "a_in");
}

#[test]
fn test_names_that_cannot_be_saved_are_rejected() {
    let mut db = common::sample_db();
    let (cell, export) = export_a(&db);
    let sink = RecordingSink::new();

    for bad in ["data in", "a;b", "x(1)", "bit#2"] {
        let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
        dialog.fields.name = bad.to_string();
        assert!(dialog.commit(&sink));
        let result = sink.run_all(&mut db).remove(0);
        assert!(matches!(result, Err(JobError::Invalid(_))), "{bad}");
    }
    assert_eq!(db.cell(cell).unwrap().export(export).unwrap().name, "a");

    let mut dialog = loaded_dialog(&db, vec![Highlight::Export(cell, export)]);
    dialog.fields.characteristic = PortCharacteristic::ReferenceInput;
    dialog.fields.reference_name = "v dd".to_string();
    dialog.commit(&sink);
    assert!(matches!(
        sink.run_all(&mut db).remove(0),
        Err(JobError::Invalid(_))
    ));
    let stored = db.cell(cell).unwrap().export(export).unwrap();
    assert_eq!(stored.characteristic, PortCharacteristic::Input);
    assert_eq!(stored.reference_name, None);

    // Nothing above reached the database, so the design still saves cleanly
    let again = parse_design(&write_design(&db).unwrap()).unwrap();
    assert_eq!(again.cells, db.cells);
}

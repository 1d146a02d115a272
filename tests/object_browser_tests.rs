// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

mod common;

use std::fs;

use vlsi_dialogs::db::{CellId, View};
use vlsi_dialogs::dialogs::object_browser::{BrowseMode, BrowseTarget, SelectOutcome};
use vlsi_dialogs::dialogs::{EditSnapshot, ObjectBrowserDialog};
use vlsi_dialogs::highlight::{Highlight, Highlighter};
use vlsi_dialogs::prefs::DEFAULT_SELECTION_WARN_THRESHOLD;
use vlsi_dialogs::units::DistanceUnit;
use vlsi_dialogs::Database;

fn bus(db: &Database) -> CellId {
    db.find_cell("bus", View::Layout).unwrap()
}

fn browser(db: &Database, highlighter: &Highlighter, mode: BrowseMode) -> ObjectBrowserDialog {
    let snapshot = EditSnapshot {
        db,
        cell: Some(bus(db)),
        highlighter,
    };
    let mut dialog = ObjectBrowserDialog::new();
    dialog.mode = mode;
    dialog.rebuild(&snapshot);
    dialog
}

fn names(dialog: &ObjectBrowserDialog, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|i| dialog.entries()[*i].name.clone())
        .collect()
}

#[test]
fn test_entries_use_natural_order() {
    let db = common::sample_db();
    let highlighter = Highlighter::new();
    let dialog = browser(&db, &highlighter, BrowseMode::Nodes);
    let all: Vec<&str> = dialog.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        all,
        vec!["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "p10", "p11", "p12"]
    );

    let dialog = browser(&db, &highlighter, BrowseMode::Exports);
    let all: Vec<&str> = dialog.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(all, vec!["bit2", "bit10", "clk"]);
}

#[test]
fn test_empty_search_leaves_everything_untouched() {
    let db = common::sample_db();
    let cell = bus(&db);
    let mut highlighter = Highlighter::new();
    let p3 = db.cell(cell).unwrap().find_node("p3").unwrap();
    highlighter.set(vec![Highlight::Node(cell, p3)]);
    let mut dialog = browser(&db, &highlighter, BrowseMode::Nodes);
    let selected_before = dialog.selected().to_vec();
    assert_eq!(names(&dialog, &selected_before), vec!["p3"]);

    let watch = highlighter.subscribe();
    dialog.search_text.clear();
    assert_eq!(
        dialog.search(DEFAULT_SELECTION_WARN_THRESHOLD, &mut highlighter),
        SelectOutcome::Unchanged
    );
    assert_eq!(dialog.selected(), selected_before.as_slice());
    assert_eq!(dialog.visible_indices().len(), 12);
    assert_eq!(highlighter.highlighted(), &[Highlight::Node(cell, p3)]);
    assert!(!watch.take_pending());
}

#[test]
fn test_substring_search_highlights_matches() {
    let db = common::sample_db();
    let cell = bus(&db);
    let mut highlighter = Highlighter::new();
    let mut dialog = browser(&db, &highlighter, BrowseMode::Nodes);

    dialog.search_text = "P1".to_string();
    let outcome = dialog.search(DEFAULT_SELECTION_WARN_THRESHOLD, &mut highlighter);
    assert_eq!(outcome, SelectOutcome::Applied(4));
    assert_eq!(
        names(&dialog, dialog.selected()),
        vec!["p1", "p10", "p11", "p12"]
    );
    assert_eq!(highlighter.highlighted().len(), 4);
    let p10 = db.cell(cell).unwrap().find_node("p10").unwrap();
    assert!(highlighter.is_highlighted(Highlight::Node(cell, p10)));
}

#[test]
fn test_regex_replaces_substring_matching() {
    let db = common::sample_db();
    let highlighter = Highlighter::new();
    let dialog = browser(&db, &highlighter, BrowseMode::Nodes);

    // "p1$" as a substring matches nothing; as a regex only p1
    assert!(dialog.matching_indices("p1$", false).is_empty());
    assert_eq!(
        names(&dialog, &dialog.matching_indices("p1$", true)),
        vec!["p1"]
    );
    // A regex result is not widened by substring hits
    assert_eq!(
        names(&dialog, &dialog.matching_indices("^p[2-3]$", true)),
        vec!["p2", "p3"]
    );
}

#[test]
fn test_invalid_regex_falls_back_to_substring() {
    let db = common::sample_db();
    let highlighter = Highlighter::new();
    let dialog = browser(&db, &highlighter, BrowseMode::Nodes);
    assert_eq!(
        dialog.matching_indices("p1(", true),
        dialog.matching_indices("p1(", false)
    );
    assert_eq!(
        names(&dialog, &dialog.matching_indices("p1[", true)),
        Vec::<String>::new()
    );
}

#[test]
fn test_large_selection_needs_confirmation() {
    let db = common::sample_db();
    let mut highlighter = Highlighter::new();
    let mut dialog = browser(&db, &highlighter, BrowseMode::Nodes);

    dialog.search_text = "p".to_string();
    assert_eq!(
        dialog.search(5, &mut highlighter),
        SelectOutcome::NeedsConfirmation(12)
    );
    assert!(highlighter.highlighted().is_empty());
    assert_eq!(dialog.pending_count(), Some(12));

    dialog.cancel_pending();
    assert_eq!(dialog.confirm_pending(&mut highlighter), SelectOutcome::Unchanged);
    assert!(highlighter.highlighted().is_empty());

    dialog.search(5, &mut highlighter);
    assert_eq!(
        dialog.confirm_pending(&mut highlighter),
        SelectOutcome::Applied(12)
    );
    assert_eq!(highlighter.highlighted().len(), 12);

    // Exactly at the threshold is still fine
    assert_eq!(
        dialog.select_all(12, &mut highlighter),
        SelectOutcome::Applied(12)
    );
}

#[test]
fn test_network_entry_highlights_nodes_and_arcs() {
    let db = common::sample_db();
    let cell = bus(&db);
    let mut highlighter = Highlighter::new();
    let mut dialog = browser(&db, &highlighter, BrowseMode::Networks);
    let index = dialog
        .entries()
        .iter()
        .position(|e| e.name == "bit10")
        .unwrap();
    assert!(matches!(
        dialog.entries()[index].target,
        BrowseTarget::Network { .. }
    ));

    dialog.click_entry(index, false, &mut highlighter);
    assert_eq!(highlighter.nodes().count(), 2);
    assert_eq!(highlighter.arcs().count(), 1);
    let w10 = db.cell(cell).unwrap().arcs.iter().position(|a| a.name == "w10").unwrap();
    assert!(highlighter
        .arcs()
        .any(|(_, arc)| arc.0 == w10));

    // Toggling the same row off clears it
    dialog.click_entry(index, true, &mut highlighter);
    assert!(highlighter.highlighted().is_empty());
    assert!(dialog.selected().is_empty());
}

#[test]
fn test_rebuild_follows_highlighter() {
    let db = common::sample_db();
    let cell = bus(&db);
    let mut highlighter = Highlighter::new();
    let mut dialog = browser(&db, &highlighter, BrowseMode::Exports);
    let clk = db.cell(cell).unwrap().find_export("clk").unwrap();
    highlighter.add(Highlight::Export(cell, clk));
    dialog.sync_selection(&highlighter);
    assert_eq!(names(&dialog, dialog.selected()), vec!["clk"]);
}

#[test]
fn test_export_csv_writes_visible_rows() {
    let db = common::sample_db();
    let highlighter = Highlighter::new();
    let mut dialog = browser(&db, &highlighter, BrowseMode::Nodes);
    dialog.search_text = "p1".to_string();

    let path = std::env::temp_dir().join("vlsi_dialogs_browser_listing.csv");
    let path = path.to_string_lossy().to_string();
    let rows = dialog
        .export_csv(&db, DistanceUnit::Lambda, &path)
        .unwrap();
    assert_eq!(rows, 4);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Name,Kind,Cell,Details");
    assert_eq!(lines[1], "p1,Node,bus{lay},\"metal-2-pin at (0, 0)\"");
    assert_eq!(lines.len(), 5);
    fs::remove_file(&path).unwrap();
}

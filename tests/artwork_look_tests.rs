// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

mod common;

use common::RecordingSink;
use vlsi_dialogs::db::{CellId, ColorIndex, Look, NodeId, OutlineStyle, View};
use vlsi_dialogs::dialogs::{ArtworkLookDialog, EditSnapshot};
use vlsi_dialogs::highlight::{Highlight, Highlighter};
use vlsi_dialogs::prefs::Preferences;

fn logo(db: &vlsi_dialogs::Database) -> (CellId, NodeId) {
    let cell = db.find_cell("inv", View::Layout).unwrap();
    let node = db.cell(cell).unwrap().find_node("logo").unwrap();
    (cell, node)
}

#[test]
fn test_color_index_unset_only_for_black_without_layer() {
    let mut dialog = ArtworkLookDialog::new();
    assert_eq!(dialog.color_index(), None);

    dialog.color = [0, 0, 1];
    assert_eq!(dialog.color_index(), Some(ColorIndex::from_rgb([0, 0, 1])));

    dialog.color = [0, 0, 0];
    dialog.set_transparent_slot(3);
    assert_eq!(dialog.color_index(), ColorIndex::from_transparent(3));

    dialog.color = [200, 10, 10];
    assert_eq!(dialog.color_index().unwrap().transparent_slot(), Some(3));

    dialog.set_transparent_slot(0);
    dialog.color = [0, 0, 0];
    assert_eq!(dialog.color_index(), None);
    assert_eq!(dialog.staged_look(), Look::default());

    // Out-of-range slots still count as a transparent layer
    dialog.set_transparent_slot(13);
    assert_eq!(dialog.transparent_slot(), 12);
    assert_eq!(dialog.color_index(), ColorIndex::from_transparent(12));
    dialog.set_transparent_slot(u8::MAX);
    assert!(dialog.color_index().is_some());
}

#[test]
fn test_load_mirrors_first_highlighted_object() {
    let db = common::sample_db();
    let (cell, node) = logo(&db);
    let mut highlighter = Highlighter::new();
    let prefs = Preferences::default();
    let mut dialog = ArtworkLookDialog::new();

    let snapshot = EditSnapshot {
        db: &db,
        cell: Some(cell),
        highlighter: &highlighter,
    };
    dialog.load(&snapshot, &prefs);
    assert!(!dialog.is_enabled());

    highlighter.set(vec![Highlight::Node(cell, node)]);
    let snapshot = EditSnapshot {
        db: &db,
        cell: Some(cell),
        highlighter: &highlighter,
    };
    dialog.load(&snapshot, &prefs);
    assert!(dialog.is_enabled());
    assert_eq!(dialog.transparent_slot(), 2);
    assert!(!dialog.use_pattern);
    assert_eq!(dialog.pattern, prefs.artwork_pattern);
}

#[test]
fn test_commit_applies_look_to_every_selected_object() {
    let mut db = common::sample_db();
    let (cell, logo_node) = logo(&db);
    let frame = db.cell(cell).unwrap().find_node("frame").unwrap();
    let mut highlighter = Highlighter::new();
    highlighter.set(vec![
        Highlight::Node(cell, logo_node),
        Highlight::Node(cell, frame),
    ]);
    let mut prefs = Preferences::default();
    let mut dialog = ArtworkLookDialog::new();
    {
        let snapshot = EditSnapshot {
            db: &db,
            cell: Some(cell),
            highlighter: &highlighter,
        };
        dialog.load(&snapshot, &prefs);
    }

    dialog.set_transparent_slot(0);
    dialog.color = [10, 20, 30];
    dialog.use_pattern = true;
    dialog.pattern = [0; 16];
    dialog.toggle_pattern_bit(0, 0);
    dialog.toggle_pattern_bit(15, 15);
    dialog.outline_style = OutlineStyle::Dashed;
    assert!(dialog.pattern_bit(0, 0));

    let sink = RecordingSink::new();
    assert!(dialog.commit(&sink, &mut prefs));
    assert_eq!(sink.len(), 1);
    assert_eq!(prefs.artwork_pattern[0], 0x8000);
    assert_eq!(prefs.artwork_pattern[15], 0x0001);

    let results = sink.run_all(&mut db);
    assert!(results[0].is_ok());
    let cell = db.cell(cell).unwrap();
    for id in [logo_node, frame] {
        let look = cell.node(id).unwrap().look;
        assert_eq!(look.color.and_then(ColorIndex::rgb), Some([10, 20, 30]));
        assert_eq!(look.pattern.unwrap()[0], 0x8000);
        assert_eq!(look.outline_style, Some(OutlineStyle::Dashed));
    }
}

#[test]
fn test_black_commit_clears_look() {
    let mut db = common::sample_db();
    let (cell, node) = logo(&db);
    let mut highlighter = Highlighter::new();
    highlighter.set(vec![Highlight::Node(cell, node)]);
    let mut prefs = Preferences::default();
    let mut dialog = ArtworkLookDialog::new();
    {
        let snapshot = EditSnapshot {
            db: &db,
            cell: Some(cell),
            highlighter: &highlighter,
        };
        dialog.load(&snapshot, &prefs);
    }
    dialog.set_transparent_slot(0);
    dialog.color = [0, 0, 0];
    dialog.use_pattern = true;

    let sink = RecordingSink::new();
    dialog.commit(&sink, &mut prefs);
    sink.run_all(&mut db);
    assert!(db.cell(cell).unwrap().node(node).unwrap().look.is_empty());
}

#[test]
fn test_commit_without_selection_does_nothing() {
    let mut dialog = ArtworkLookDialog::new();
    let mut prefs = Preferences::default();
    let sink = RecordingSink::new();
    assert!(!dialog.commit(&sink, &mut prefs));
    assert_eq!(sink.len(), 0);
}

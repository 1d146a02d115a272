// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

mod common;

use vlsi_dialogs::db::network::networks;
use vlsi_dialogs::db::View;

#[test]
fn test_nets_named_after_exports() {
    let db = common::sample_db();
    let inv = db.cell(db.find_cell("inv", View::Layout).unwrap()).unwrap();
    let nets = networks(inv, &db.technology);
    let mut names: Vec<&str> = nets.iter().map(|n| n.name.as_str()).collect();
    names.sort();
    // The artwork logo and frame are not electrical; the well stands alone.
    assert_eq!(names, vec!["a", "gnd", "net@1", "vdd", "y"]);

    let a = nets.iter().find(|n| n.name == "a").unwrap();
    assert_eq!(a.nodes.len(), 2);
    assert_eq!(a.arcs.len(), 1);
}

#[test]
fn test_nets_fall_back_to_arc_names() {
    let db = common::sample_db();
    let bus = db.cell(db.find_cell("bus", View::Layout).unwrap()).unwrap();
    let nets = networks(bus, &db.technology);
    assert_eq!(nets.len(), 9);

    let w1 = nets.iter().find(|n| n.name == "w1").unwrap();
    assert_eq!(w1.nodes.len(), 2);
    assert!(nets.iter().any(|n| n.name == "bit10"));
    assert_eq!(nets.iter().filter(|n| n.name.starts_with("net@")).count(), 5);
}

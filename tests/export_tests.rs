// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;

use vlsi_dialogs::export::{export_listing_to_csv, ObjectCsvRecord};

#[test]
fn test_export_listing_writes_header_and_rows() {
    let records = vec![
        ObjectCsvRecord {
            name: "vdd".to_string(),
            kind: "Export".to_string(),
            cell: "inv{lay}".to_string(),
            details: "Power".to_string(),
        },
        ObjectCsvRecord {
            name: "w1".to_string(),
            kind: "Arc".to_string(),
            cell: "bus{lay}".to_string(),
            details: "metal-2 width 3".to_string(),
        },
    ];
    let path = std::env::temp_dir().join("vlsi_dialogs_export_listing.csv");
    let path = path.to_string_lossy().to_string();
    export_listing_to_csv(&records, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Name,Kind,Cell,Details",
            "vdd,Export,inv{lay},Power",
            "w1,Arc,bus{lay},metal-2 width 3",
        ]
    );
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_export_listing_to_missing_directory_fails() {
    let path = std::env::temp_dir()
        .join("vlsi_dialogs_no_such_dir")
        .join("listing.csv");
    let result = export_listing_to_csv(&[], &path.to_string_lossy());
    assert!(result.is_err());
}

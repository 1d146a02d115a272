// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use vlsi_dialogs::db::Technology;
use vlsi_dialogs::units::{format_distance, parse_distance, DistanceUnit, UnitError};

#[test]
fn test_format_in_each_unit() {
    let tech = Technology::mocmos();
    assert_eq!(format_distance(2.5, &tech, DistanceUnit::Lambda), "2.5");
    assert_eq!(format_distance(2.5, &tech, DistanceUnit::Nanometer), "500nm");
    assert_eq!(format_distance(2.5, &tech, DistanceUnit::Micron), "0.5um");
    assert_eq!(format_distance(5000.0, &tech, DistanceUnit::Millimeter), "1mm");
    assert_eq!(format_distance(-3.0, &tech, DistanceUnit::Lambda), "-3");
    assert_eq!(format_distance(-0.0000001, &tech, DistanceUnit::Lambda), "0");
}

#[test]
fn test_parse_uses_display_unit_without_suffix() {
    let tech = Technology::mocmos();
    assert_eq!(parse_distance("4", &tech, DistanceUnit::Lambda).unwrap(), 4.0);
    assert_eq!(parse_distance(" 1 ", &tech, DistanceUnit::Micron).unwrap(), 5.0);
    assert_eq!(parse_distance("-200", &tech, DistanceUnit::Nanometer).unwrap(), -1.0);
}

#[test]
fn test_parse_suffix_overrides_display_unit() {
    let tech = Technology::mocmos();
    assert_eq!(parse_distance("1um", &tech, DistanceUnit::Lambda).unwrap(), 5.0);
    assert_eq!(parse_distance("400 nm", &tech, DistanceUnit::Micron).unwrap(), 2.0);
    assert_eq!(parse_distance("3l", &tech, DistanceUnit::Micron).unwrap(), 3.0);
}

#[test]
fn test_parse_errors() {
    let tech = Technology::mocmos();
    assert_eq!(
        parse_distance("", &tech, DistanceUnit::Lambda),
        Err(UnitError::Empty)
    );
    assert!(matches!(
        parse_distance("abc", &tech, DistanceUnit::Lambda),
        Err(UnitError::Malformed(_))
    ));
    assert_eq!(
        parse_distance("3 furlongs", &tech, DistanceUnit::Lambda),
        Err(UnitError::UnknownSuffix("furlongs".to_string()))
    );
}

#[test]
fn test_format_then_parse_keeps_value() {
    let tech = Technology::mocmos();
    for unit in DistanceUnit::ALL {
        let text = format_distance(7.25, &tech, unit);
        let back = parse_distance(&text, &tech, DistanceUnit::Lambda).unwrap();
        assert!((back - 7.25).abs() < 1e-9, "{} -> {}", text, back);
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Distance text codec
//!
//! Database coordinates are in lambda. The editor shows and accepts them in a
//! user-selected display unit; an explicit suffix typed by the user overrides
//! the display unit.

use std::fmt;

use nom::{
    bytes::complete::take_while,
    character::complete::space0,
    combinator::{all_consuming, opt},
    number::complete::double,
    IResult, Parser,
};
use serde::{Deserialize, Serialize};

use crate::db::Technology;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    Lambda,
    Nanometer,
    Micron,
    Millimeter,
}

impl DistanceUnit {
    pub const ALL: [DistanceUnit; 4] = [
        DistanceUnit::Lambda,
        DistanceUnit::Nanometer,
        DistanceUnit::Micron,
        DistanceUnit::Millimeter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Lambda => "Lambda",
            DistanceUnit::Nanometer => "Nanometers",
            DistanceUnit::Micron => "Microns",
            DistanceUnit::Millimeter => "Millimeters",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::Lambda => "",
            DistanceUnit::Nanometer => "nm",
            DistanceUnit::Micron => "um",
            DistanceUnit::Millimeter => "mm",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "lambda" | "l" => Some(DistanceUnit::Lambda),
            "nm" => Some(DistanceUnit::Nanometer),
            "um" | "u" => Some(DistanceUnit::Micron),
            "mm" => Some(DistanceUnit::Millimeter),
            _ => None,
        }
    }

    fn nanometers(self, tech: &Technology) -> f64 {
        match self {
            DistanceUnit::Lambda => tech.nm_per_lambda,
            DistanceUnit::Nanometer => 1.0,
            DistanceUnit::Micron => 1_000.0,
            DistanceUnit::Millimeter => 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    Empty,
    Malformed(String),
    UnknownSuffix(String),
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::Empty => write!(f, "no distance given"),
            UnitError::Malformed(text) => write!(f, "'{}' is not a distance", text),
            UnitError::UnknownSuffix(suffix) => write!(f, "unknown unit '{}'", suffix),
        }
    }
}

impl std::error::Error for UnitError {}

const FRACTION_DIGITS: usize = 6;

/// Formats a lambda value in `unit`, trimming trailing zeros.
pub fn format_distance(lambda: f64, tech: &Technology, unit: DistanceUnit) -> String {
    let value = lambda * tech.nm_per_lambda / unit.nanometers(tech);
    let mut text = format!("{:.*}", FRACTION_DIGITS, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    format!("{}{}", text, unit.suffix())
}

fn distance(input: &str) -> IResult<&str, (f64, Option<&str>)> {
    let (input, _) = space0(input)?;
    let (input, value) = double(input)?;
    let (input, _) = space0(input)?;
    let (input, suffix) = opt(take_while(|c: char| c.is_ascii_alphabetic())).parse(input)?;
    let (input, _) = space0(input)?;
    Ok((input, (value, suffix.filter(|s| !s.is_empty()))))
}

/// Parses user text into lambda. Text without a suffix is read in `unit`.
pub fn parse_distance(text: &str, tech: &Technology, unit: DistanceUnit) -> Result<f64, UnitError> {
    if text.trim().is_empty() {
        return Err(UnitError::Empty);
    }
    let (_, (value, suffix)) = all_consuming(distance)
        .parse(text)
        .map_err(|_| UnitError::Malformed(text.trim().to_string()))?;
    if !value.is_finite() {
        return Err(UnitError::Malformed(text.trim().to_string()));
    }
    let unit = match suffix {
        Some(suffix) => DistanceUnit::from_suffix(suffix)
            .ok_or_else(|| UnitError::UnknownSuffix(suffix.to_string()))?,
        None => unit,
    };
    Ok(value * unit.nanometers(tech) / tech.nm_per_lambda)
}

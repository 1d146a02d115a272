// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use csv::Writer;
use serde::Serialize;
use std::fs::File;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectCsvRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Kind")]
    pub kind: String,
    #[serde(rename = "Cell")]
    pub cell: String,
    #[serde(rename = "Details")]
    pub details: String,
}

/// Export an object listing to a CSV file
pub fn export_listing_to_csv(
    records: &[ObjectCsvRecord],
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! VLSI Layout Editing Dialogs
//!
//! A small design database for layout cells plus the editing dialogs that
//! sit on top of it: artwork look, export properties, outline points,
//! layout text and object selection. Dialogs stage edits locally and submit
//! them as jobs that run against the shared database.

pub mod db;
pub mod dialogs;
pub mod export;
pub mod highlight;
pub mod job;
pub mod natural;
pub mod prefs;
pub mod raster;
pub mod units;

// Re-export commonly used types
pub use db::{Cell, CellId, Database, Export, NodeInst, Point, PortCharacteristic, View};
pub use highlight::{ChangeNotifier, Highlight, Highlighter};
pub use job::{Job, JobError, JobQueue, JobSink};
pub use prefs::Preferences;

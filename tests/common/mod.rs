// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

#![allow(dead_code)]

use std::cell::RefCell;

use vlsi_dialogs::db::reader::DesignReader;
use vlsi_dialogs::job::{Job, JobError, JobSink};
use vlsi_dialogs::Database;

pub const SAMPLE_DESIGN: &str = include_str!("../../demos/sample.dsn");

pub fn sample_db() -> Database {
    DesignReader::new().read_str(SAMPLE_DESIGN).unwrap()
}

/// Collects submitted jobs so tests can inspect or run them inline.
#[derive(Default)]
pub struct RecordingSink {
    jobs: RefCell<Vec<Box<dyn Job>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.borrow().len()
    }

    pub fn names(&self) -> Vec<String> {
        self.jobs.borrow().iter().map(|j| j.name().to_string()).collect()
    }

    /// Runs and drops every recorded job against `db`.
    pub fn run_all(&self, db: &mut Database) -> Vec<Result<String, JobError>> {
        self.jobs
            .borrow_mut()
            .drain(..)
            .map(|mut job| job.run(db))
            .collect()
    }
}

impl JobSink for RecordingSink {
    fn submit(&self, job: Box<dyn Job>) {
        self.jobs.borrow_mut().push(job);
    }
}

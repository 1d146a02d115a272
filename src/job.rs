// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Database mutation jobs
//!
//! Dialogs never touch the database directly. A commit builds a [`Job`] and
//! hands it to a [`JobSink`]; the [`JobQueue`] runs jobs one at a time on a
//! worker thread, in submission order, and reports outcomes back to the UI.

use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use log::{error, info, warn};

use crate::db::Database;
use crate::highlight::ChangeNotifier;

#[derive(Debug, Clone, PartialEq)]
pub enum JobError {
    /// An object named by the job no longer exists.
    NotFound(String),
    /// The requested change is not allowed.
    Invalid(String),
    /// The database lock was poisoned by an earlier panic.
    Unavailable,
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::NotFound(what) => write!(f, "{} not found", what),
            JobError::Invalid(reason) => write!(f, "{}", reason),
            JobError::Unavailable => write!(f, "design database is unavailable"),
        }
    }
}

impl std::error::Error for JobError {}

/// A named unit of work against the design database.
pub trait Job: Send {
    fn name(&self) -> &str;

    /// Applies the change. The returned text is a report for the user.
    fn run(&mut self, db: &mut Database) -> Result<String, JobError>;
}

/// Where dialogs send their jobs.
pub trait JobSink {
    fn submit(&self, job: Box<dyn Job>);
}

#[derive(Debug)]
pub struct JobOutcome {
    pub name: String,
    pub result: Result<String, JobError>,
}

pub struct JobQueue {
    sender: Option<mpsc::Sender<Box<dyn Job>>>,
    outcomes: mpsc::Receiver<JobOutcome>,
    worker: Option<thread::JoinHandle<()>>,
}

impl JobQueue {
    /// Starts the worker. `db_changes` is notified after every successful job.
    pub fn new(db: Arc<RwLock<Database>>, db_changes: ChangeNotifier) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Box<dyn Job>>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            for mut job in job_rx {
                let name = job.name().to_string();
                info!("Running job '{}'", name);
                let result = match db.write() {
                    Ok(mut guard) => {
                        let result = job.run(&mut guard);
                        if result.is_ok() {
                            guard.change_count += 1;
                        }
                        result
                    }
                    Err(_) => Err(JobError::Unavailable),
                };
                match &result {
                    Ok(_) => db_changes.notify(),
                    Err(e) => warn!("Job '{}' failed: {}", name, e),
                }
                if outcome_tx.send(JobOutcome { name, result }).is_err() {
                    break;
                }
            }
        });

        Self {
            sender: Some(job_tx),
            outcomes: outcome_rx,
            worker: Some(worker),
        }
    }

    /// Outcomes of jobs finished since the last poll.
    pub fn poll(&self) -> Vec<JobOutcome> {
        self.outcomes.try_iter().collect()
    }

    /// Blocks until the next job finishes or `timeout` passes.
    pub fn wait(&self, timeout: Duration) -> Option<JobOutcome> {
        self.outcomes.recv_timeout(timeout).ok()
    }
}

impl JobSink for JobQueue {
    fn submit(&self, job: Box<dyn Job>) {
        let name = job.name().to_string();
        match &self.sender {
            Some(sender) => {
                if sender.send(job).is_err() {
                    error!("Job worker has stopped; dropping job '{}'", name);
                }
            }
            None => error!("Job queue is shut down; dropping job '{}'", name),
        }
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Selection tracking and change notification
//!
//! Listeners hold a [`Subscription`]; dropping it unsubscribes, so a dialog
//! that goes away for any reason stops receiving notifications.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use log::debug;

use crate::db::{ArcId, CellId, ExportId, NodeId};

#[derive(Default)]
struct Registry {
    next_id: u64,
    pending: HashMap<u64, Arc<AtomicBool>>,
}

/// Broadcasts "something changed" to every live subscription. Cloning shares
/// the same subscriber list; it can be notified from any thread.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        let pending = Arc::new(AtomicBool::new(false));
        registry.pending.insert(id, pending.clone());
        Subscription {
            id,
            pending,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn notify(&self) {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        for flag in registry.pending.values() {
            flag.store(true, Ordering::Release);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }
}

pub struct Subscription {
    id: u64,
    pending: Arc<AtomicBool>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// True when a notification arrived since the previous call.
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.pending.remove(&self.id);
        }
    }
}

/// One highlighted database object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Node(CellId, NodeId),
    Arc(CellId, ArcId),
    Export(CellId, ExportId),
}

impl Highlight {
    pub fn cell(self) -> CellId {
        match self {
            Highlight::Node(cell, _) | Highlight::Arc(cell, _) | Highlight::Export(cell, _) => {
                cell
            }
        }
    }
}

/// The current selection of the edit window.
#[derive(Default)]
pub struct Highlighter {
    current: Vec<Highlight>,
    changes: ChangeNotifier,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> &[Highlight] {
        &self.current
    }

    pub fn is_highlighted(&self, highlight: Highlight) -> bool {
        self.current.contains(&highlight)
    }

    /// Replaces the selection. Duplicates are dropped; order is kept.
    pub fn set(&mut self, highlights: Vec<Highlight>) {
        let mut unique = Vec::with_capacity(highlights.len());
        for h in highlights {
            if !unique.contains(&h) {
                unique.push(h);
            }
        }
        if unique != self.current {
            self.current = unique;
            self.changed();
        }
    }

    pub fn add(&mut self, highlight: Highlight) {
        if !self.current.contains(&highlight) {
            self.current.push(highlight);
            self.changed();
        }
    }

    pub fn remove(&mut self, highlight: Highlight) {
        let before = self.current.len();
        self.current.retain(|h| *h != highlight);
        if self.current.len() != before {
            self.changed();
        }
    }

    pub fn clear(&mut self) {
        if !self.current.is_empty() {
            self.current.clear();
            self.changed();
        }
    }

    pub fn subscribe(&self) -> Subscription {
        self.changes.subscribe()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (CellId, NodeId)> + '_ {
        self.current.iter().filter_map(|h| match h {
            Highlight::Node(cell, node) => Some((*cell, *node)),
            _ => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = (CellId, ArcId)> + '_ {
        self.current.iter().filter_map(|h| match h {
            Highlight::Arc(cell, arc) => Some((*cell, *arc)),
            _ => None,
        })
    }

    pub fn exports(&self) -> impl Iterator<Item = (CellId, ExportId)> + '_ {
        self.current.iter().filter_map(|h| match h {
            Highlight::Export(cell, export) => Some((*cell, *export)),
            _ => None,
        })
    }

    fn changed(&self) {
        debug!("Selection changed: {} objects", self.current.len());
        self.changes.notify();
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Editing dialogs
//!
//! Each dialog mirrors part of the current selection into local state, stages
//! edits there, and turns them into a single job when the user applies them.
//! While open, a dialog watches selection and database changes and reloads
//! itself from scratch when either fires.

pub mod artwork_look;
pub mod export_props;
pub mod layout_text;
pub mod object_browser;
pub mod outline_edit;

pub use artwork_look::ArtworkLookDialog;
pub use export_props::ExportPropertiesDialog;
pub use layout_text::LayoutTextDialog;
pub use object_browser::ObjectBrowserDialog;
pub use outline_edit::OutlineEditDialog;

use crate::db::{CellId, Database};
use crate::highlight::{ChangeNotifier, Highlighter, Subscription};

/// Read-only view of the editing session used when a dialog (re)loads.
pub struct EditSnapshot<'a> {
    pub db: &'a Database,
    /// Cell shown in the edit window, if any.
    pub cell: Option<CellId>,
    pub highlighter: &'a Highlighter,
}

/// Selection and database subscriptions held while a dialog is open.
pub struct DialogWatch {
    selection: Subscription,
    database: Subscription,
}

impl DialogWatch {
    pub fn new(highlighter: &Highlighter, db_changes: &ChangeNotifier) -> Self {
        Self {
            selection: highlighter.subscribe(),
            database: db_changes.subscribe(),
        }
    }

    /// True if either source fired since the last check. Both flags are consumed.
    pub fn changed(&self) -> bool {
        let selection = self.selection.take_pending();
        let database = self.database.take_pending();
        selection || database
    }
}

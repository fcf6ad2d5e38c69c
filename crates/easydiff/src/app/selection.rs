//! Picking the two documents a comparison runs on.

use crate::domain::document::DocumentHandle;

/// Host editor window holding open documents.
pub trait Window {
    /// Document focused in the given layout group, if the group exists and has one.
    fn active_in_group(&self, group: usize) -> Option<DocumentHandle>;

    /// Documents whose tabs are currently selected, in tab order.
    fn selected_documents(&self) -> Vec<DocumentHandle>;

    /// Document that has input focus.
    fn active_document(&self) -> Option<DocumentHandle>;
}

/// Strategy for deciding which two documents are "selected".
pub trait SelectionSource: Send + Sync {
    fn selected_pair(&self, window: &dyn Window) -> Option<(DocumentHandle, DocumentHandle)>;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}

/// The active document of the first two layout groups (side-by-side panes).
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupSelection;

impl SelectionSource for GroupSelection {
    fn selected_pair(&self, window: &dyn Window) -> Option<(DocumentHandle, DocumentHandle)> {
        Some((window.active_in_group(0)?, window.active_in_group(1)?))
    }

    fn name(&self) -> &'static str {
        "groups"
    }
}

/// Exactly two selected tabs, falling back to the layout groups otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct SheetSelection;

impl SelectionSource for SheetSelection {
    fn selected_pair(&self, window: &dyn Window) -> Option<(DocumentHandle, DocumentHandle)> {
        let selected = window.selected_documents();
        match <[DocumentHandle; 2]>::try_from(selected) {
            Ok([first, second]) => Some((first, second)),
            Err(_) => GroupSelection.selected_pair(window),
        }
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}

/// Host builds from this version on support multi-tab selection.
pub const SHEET_SELECTION_VERSION: u32 = 4000;

/// Choose the selection strategy once for the lifetime of the host.
pub fn selection_source_for(host_version: u32) -> Box<dyn SelectionSource> {
    if host_version >= SHEET_SELECTION_VERSION {
        Box::new(SheetSelection)
    } else {
        Box::new(GroupSelection)
    }
}

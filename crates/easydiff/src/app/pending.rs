//! The "compare later" slot.

use parking_lot::Mutex;

use crate::domain::document::Document;
use crate::domain::errors::CompareError;
use crate::domain::model::PendingComparison;
use crate::infra::paths::PathResolver;

const UNTITLED: &str = "untitled";

/// Holds at most one pending comparison; every mark replaces the previous one.
///
/// The slot is behind a mutex so hosts that dispatch commands from several threads still see
/// last-mark-wins.
#[derive(Debug, Default)]
pub struct PendingStore {
    slot: Mutex<Option<PendingComparison>>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `document` for a later comparison.
    pub fn mark(
        &self,
        document: &dyn Document,
        resolver: &PathResolver,
    ) -> Result<PendingComparison, CompareError> {
        let path = resolver.resolve(document)?;
        let pending = match document.file_name() {
            Some(_) => PendingComparison {
                display_name: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                path,
                on_disk: true,
            },
            None => PendingComparison {
                display_name: match document.title() {
                    "" => UNTITLED.to_owned(),
                    title => title.to_owned(),
                },
                path,
                on_disk: false,
            },
        };

        tracing::debug!(path = %pending.path.display(), name = %pending.display_name, "marked for later");
        *self.slot.lock() = Some(pending.clone());
        Ok(pending)
    }

    /// Current pending comparison, or `None` if nothing was marked or its file has vanished.
    ///
    /// Existence is checked on every call.
    pub fn peek(&self) -> Option<PendingComparison> {
        self.slot
            .lock()
            .as_ref()
            .filter(|pending| pending.path.is_file())
            .cloned()
    }
}

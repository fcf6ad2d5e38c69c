//! Domain-specific errors.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("two documents must be selected to compare")]
    MissingSelection,
    #[error("unsupported diff tool '{0}'")]
    UnsupportedTool(String),
    #[error("no document has been marked for a later comparison")]
    NothingPending,
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl CompareError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

//! Editor documents as seen by the comparison commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

/// An open buffer in the host editor, possibly backed by a file on disk.
pub trait Document: Send + Sync {
    /// Path of the backing file, if the buffer has ever been saved.
    fn file_name(&self) -> Option<&Path>;

    /// Title assigned by the editor. May be empty.
    fn title(&self) -> &str;

    /// Full current text of the buffer.
    fn text(&self) -> &str;

    /// Content length in bytes.
    fn len(&self) -> usize {
        self.text().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared handle to an open document.
pub type DocumentHandle = Arc<dyn Document>;

/// In-memory document used by the command-line host and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    path: Option<PathBuf>,
    title: String,
    text: String,
}

impl Buffer {
    /// Open a file from disk; the buffer keeps the path as its backing file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()))?;
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: Some(path),
            title,
            text,
        })
    }

    /// Unsaved buffer with the given title and contents.
    pub fn scratch(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: None,
            title: title.into(),
            text: text.into(),
        }
    }

    /// Buffer claiming a backing file without reading it.
    pub fn with_path(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: Some(path),
            title,
            text: text.into(),
        }
    }

    pub fn into_handle(self) -> DocumentHandle {
        Arc::new(self)
    }
}

impl Document for Buffer {
    fn file_name(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_reads_file_and_uses_name_as_title() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello")?;

        let buffer = Buffer::open(&path)?;
        assert_eq!(buffer.title(), "notes.txt");
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.len(), 5);
        assert!(buffer.file_name().is_some_and(Path::is_absolute));
        Ok(())
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Buffer::open(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn scratch_buffers_have_no_backing_file() {
        let buffer = Buffer::scratch("", "");
        assert!(buffer.file_name().is_none());
        assert!(buffer.is_empty());
    }
}

//! Resolving documents to files that an external tool can open.

use std::io::Write;
use std::path::PathBuf;

use parking_lot::Mutex;
use tempfile::{Builder, TempPath};

use crate::domain::document::Document;
use crate::domain::errors::CompareError;
use crate::infra::config::Config;

const TEMP_PREFIX: &str = "easydiff-";
const TEMP_SUFFIX: &str = ".txt";

/// Turns documents into on-disk paths, materializing unsaved buffers as temp files.
///
/// Temp files are owned by the resolver and removed when it is dropped, unless the resolver
/// was created with `keep_temp_files`, in which case they are left behind for the tool.
#[derive(Debug, Default)]
pub struct PathResolver {
    keep_temp_files: bool,
    scratch: Mutex<Vec<TempPath>>,
}

impl PathResolver {
    pub fn new(keep_temp_files: bool) -> Self {
        Self {
            keep_temp_files,
            scratch: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.keep_temp_files())
    }

    /// Backing file of `document`, or a fresh temp file holding its current text.
    pub fn resolve(&self, document: &dyn Document) -> Result<PathBuf, CompareError> {
        if let Some(path) = document.file_name() {
            return Ok(path.to_path_buf());
        }
        self.materialize(document.text())
    }

    fn materialize(&self, text: &str) -> Result<PathBuf, CompareError> {
        let mut file = Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile()
            .map_err(|err| CompareError::io("failed to create temporary file", err))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|err| CompareError::io("failed to write temporary file", err))?;

        let temp_path = file.into_temp_path();
        let path = temp_path.to_path_buf();
        tracing::debug!(path = %path.display(), bytes = text.len(), "wrote unsaved buffer");

        if self.keep_temp_files {
            temp_path
                .keep()
                .map_err(|err| CompareError::io("failed to keep temporary file", err.error))?;
        } else {
            self.scratch.lock().push(temp_path);
        }
        Ok(path)
    }

    /// Temp files that will be removed when the resolver is dropped.
    pub fn scratch_files(&self) -> Vec<PathBuf> {
        self.scratch
            .lock()
            .iter()
            .map(|temp| temp.to_path_buf())
            .collect()
    }
}

//! The user-facing comparison commands.

use std::path::Path;
use std::sync::Arc;

use crate::app::command;
use crate::app::pending::PendingStore;
use crate::app::selection::{SelectionSource, Window};
use crate::domain::document::Document;
use crate::domain::errors::CompareError;
use crate::domain::model::{CommandLine, PendingComparison, ToolId};
use crate::infra::config::Config;
use crate::infra::launcher::Launcher;
use crate::infra::notify::Notifier;
use crate::infra::paths::PathResolver;
use crate::infra::tools::ToolRegistry;

/// Sequences path resolution, tool lookup, command shaping, and launching.
///
/// Every failure is shown through the [`Notifier`] before it is returned.
pub struct Comparer {
    config: Config,
    registry: ToolRegistry,
    resolver: PathResolver,
    pending: Arc<PendingStore>,
    launcher: Box<dyn Launcher>,
    notifier: Box<dyn Notifier>,
}

impl Comparer {
    pub fn new(
        config: Config,
        pending: Arc<PendingStore>,
        launcher: Box<dyn Launcher>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            registry: ToolRegistry::from_config(&config),
            resolver: PathResolver::from_config(&config),
            config,
            pending,
            launcher,
            notifier,
        }
    }

    /// Replace the path resolver, e.g. to keep temp files past the host's lifetime.
    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pending(&self) -> &PendingStore {
        &self.pending
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Parse a tool identifier, falling back to the configured default tool.
    pub fn tool(&self, name: Option<&str>) -> Result<ToolId, CompareError> {
        let name = name.unwrap_or_else(|| self.config.default_tool());
        self.report(name.parse())
    }

    /// Command line that [`Comparer::compare_now`] would launch, without launching it.
    pub fn prepare(
        &self,
        tool: ToolId,
        left: Option<&dyn Document>,
        right: Option<&dyn Document>,
    ) -> Result<CommandLine, CompareError> {
        self.report(self.shape(tool, left, right))
    }

    /// Diff two documents with `tool`. Nothing happens unless both are present.
    pub fn compare_now(
        &self,
        tool: ToolId,
        left: Option<&dyn Document>,
        right: Option<&dyn Document>,
    ) -> Result<CommandLine, CompareError> {
        let result = self
            .shape(tool, left, right)
            .and_then(|command| self.launch(command));
        self.report(result)
    }

    /// Diff whichever two documents `source` considers selected in `window`.
    pub fn compare_selected(
        &self,
        tool: ToolId,
        source: &dyn SelectionSource,
        window: &dyn Window,
    ) -> Result<CommandLine, CompareError> {
        match source.selected_pair(window) {
            Some((left, right)) => self.compare_now(tool, Some(&*left), Some(&*right)),
            None => self.compare_now(tool, None, None),
        }
    }

    /// Remember `document` for a later comparison. Empty documents are ignored.
    pub fn mark_for_later(
        &self,
        document: &dyn Document,
    ) -> Result<Option<PendingComparison>, CompareError> {
        if document.is_empty() {
            tracing::debug!("ignoring mark of empty document");
            return Ok(None);
        }
        let result = self.pending.mark(document, &self.resolver).map(Some);
        self.report(result)
    }

    /// Diff the pending document against `document` using the configured default tool.
    /// Empty documents are ignored.
    pub fn compare_with_pending(
        &self,
        document: &dyn Document,
    ) -> Result<Option<CommandLine>, CompareError> {
        if document.is_empty() {
            tracing::debug!("ignoring compare of empty document");
            return Ok(None);
        }
        let result = self.shape_with_pending(document).and_then(|command| self.launch(command));
        self.report(result).map(Some)
    }

    fn shape_with_pending(&self, document: &dyn Document) -> Result<CommandLine, CompareError> {
        let pending = self.pending.peek().ok_or(CompareError::NothingPending)?;
        let tool: ToolId = self.config.default_tool().parse()?;
        let current = self.resolver.resolve(document)?;
        Ok(self.build(tool, &pending.path, &current))
    }

    fn shape(
        &self,
        tool: ToolId,
        left: Option<&dyn Document>,
        right: Option<&dyn Document>,
    ) -> Result<CommandLine, CompareError> {
        let (Some(left), Some(right)) = (left, right) else {
            return Err(CompareError::MissingSelection);
        };
        let left = self.resolver.resolve(left)?;
        let right = self.resolver.resolve(right)?;
        Ok(self.build(tool, &left, &right))
    }

    fn build(&self, tool: ToolId, left: &Path, right: &Path) -> CommandLine {
        let executable = self.registry.resolve_executable(tool);
        command::build(tool, &executable, left, right)
    }

    fn launch(&self, command: CommandLine) -> Result<CommandLine, CompareError> {
        tracing::info!(command = %command, "launching diff tool");
        self.launcher
            .launch(&command)
            .map_err(|err| CompareError::io("failed to execute command", err))?;
        Ok(command)
    }

    fn report<T>(&self, result: Result<T, CompareError>) -> Result<T, CompareError> {
        if let Err(err) = &result {
            tracing::debug!(error = %err, "comparison command failed");
            self.notifier.error_message(&err.to_string());
        }
        result
    }
}

//! Executable lookup for the supported diff tools.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::model::ToolId;
use crate::infra::config::Config;

/// Executable name looked up on `PATH` when no usable override is configured.
///
/// Keep in lockstep with [`crate::app::command::build`].
pub fn default_executable(tool: ToolId) -> &'static str {
    match tool {
        ToolId::TortoiseSvn => "TortoiseProc.exe",
        ToolId::TortoiseGit => "TortoiseGitProc.exe",
        ToolId::WinMerge => "WinMergeU.exe",
    }
}

/// Configuration key holding the executable override for `tool`.
pub fn config_key(tool: ToolId) -> &'static str {
    match tool {
        ToolId::TortoiseSvn => "tortoise_svn_path",
        ToolId::TortoiseGit => "tortoise_git_path",
        ToolId::WinMerge => "win_merge_path",
    }
}

/// Resolves tool identifiers to executables using the configured overrides.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    overrides: HashMap<ToolId, PathBuf>,
}

/// Resolution report for a single tool, used by `easydiff tools`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEntry {
    pub id: ToolId,
    pub label: &'static str,
    pub config_key: &'static str,
    pub configured: Option<PathBuf>,
    pub executable: PathBuf,
    pub uses_default: bool,
}

impl ToolRegistry {
    pub fn from_config(config: &Config) -> Self {
        let overrides = ToolId::ALL
            .into_iter()
            .filter_map(|tool| config.tool_path(tool).map(|path| (tool, path.to_path_buf())))
            .collect();
        Self { overrides }
    }

    /// The configured path when it names an existing regular file, otherwise the bare default
    /// executable name. Searching `PATH` is left to the process launcher.
    pub fn resolve_executable(&self, tool: ToolId) -> PathBuf {
        match self.overrides.get(&tool) {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                tracing::debug!(
                    tool = %tool,
                    path = %path.display(),
                    "configured executable is not a file, using default"
                );
                PathBuf::from(default_executable(tool))
            }
            None => PathBuf::from(default_executable(tool)),
        }
    }

    pub fn configured(&self, tool: ToolId) -> Option<&Path> {
        self.overrides.get(&tool).map(PathBuf::as_path)
    }

    /// Report how every supported tool currently resolves.
    pub fn entries(&self) -> Vec<ToolEntry> {
        ToolId::ALL
            .into_iter()
            .map(|tool| {
                let executable = self.resolve_executable(tool);
                ToolEntry {
                    id: tool,
                    label: tool.label(),
                    config_key: config_key(tool),
                    configured: self.configured(tool).map(Path::to_path_buf),
                    uses_default: executable == Path::new(default_executable(tool)),
                    executable,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn config_with(tool: ToolId, path: &Path) -> Config {
        let mut config = Config::default();
        let slot = match tool {
            ToolId::TortoiseSvn => &mut config.tortoise_svn_path,
            ToolId::TortoiseGit => &mut config.tortoise_git_path,
            ToolId::WinMerge => &mut config.win_merge_path,
        };
        *slot = Some(path.to_path_buf());
        config
    }

    #[test]
    fn unset_tools_fall_back_to_default_names() {
        let registry = ToolRegistry::from_config(&Config::default());
        assert_eq!(
            registry.resolve_executable(ToolId::TortoiseSvn),
            PathBuf::from("TortoiseProc.exe")
        );
        assert_eq!(
            registry.resolve_executable(ToolId::TortoiseGit),
            PathBuf::from("TortoiseGitProc.exe")
        );
        assert_eq!(
            registry.resolve_executable(ToolId::WinMerge),
            PathBuf::from("WinMergeU.exe")
        );
    }

    #[test]
    fn existing_configured_file_is_used() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for tool in ToolId::ALL {
            let exe = dir.path().join(format!("{tool}.exe"));
            fs::write(&exe, "")?;
            let registry = ToolRegistry::from_config(&config_with(tool, &exe));
            assert_eq!(registry.resolve_executable(tool), exe);
        }
        Ok(())
    }

    #[test]
    fn missing_configured_file_falls_back() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for tool in ToolId::ALL {
            let exe = dir.path().join("not-installed.exe");
            let registry = ToolRegistry::from_config(&config_with(tool, &exe));
            assert_eq!(
                registry.resolve_executable(tool),
                PathBuf::from(default_executable(tool))
            );
            assert_eq!(registry.configured(tool), Some(exe.as_path()));
        }
        Ok(())
    }

    #[test]
    fn directory_is_not_an_executable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let registry = ToolRegistry::from_config(&config_with(ToolId::WinMerge, dir.path()));
        assert_eq!(
            registry.resolve_executable(ToolId::WinMerge),
            PathBuf::from("WinMergeU.exe")
        );
        Ok(())
    }

    #[test]
    fn entries_cover_every_tool() {
        let entries = ToolRegistry::default().entries();
        assert_eq!(entries.len(), ToolId::ALL.len());
        assert!(entries.iter().all(|entry| entry.uses_default));
        assert_eq!(entries[2].config_key, "win_merge_path");
    }
}

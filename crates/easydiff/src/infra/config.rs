//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::ToolId;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".easydiff/config.toml";
const FALLBACK_TOOL: &str = "tortoise_svn";

/// Layered configuration loaded from defaults, user, workspace, explicit file, and env.
///
/// Every key is optional so that a layer only overrides what it sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tortoise_svn_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tortoise_git_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_merge_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keep_temp_files: Option<bool>,
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    default_tool: Option<String>,
    tortoise_svn_path: Option<PathBuf>,
    tortoise_git_path: Option<PathBuf>,
    win_merge_path: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            default_tool: env::var("EASYDIFF_DEFAULT_TOOL").ok(),
            tortoise_svn_path: env::var_os("EASYDIFF_TORTOISE_SVN_PATH").map(PathBuf::from),
            tortoise_git_path: env::var_os("EASYDIFF_TORTOISE_GIT_PATH").map(PathBuf::from),
            win_merge_path: env::var_os("EASYDIFF_WIN_MERGE_PATH").map(PathBuf::from),
        }
    }

    #[cfg(test)]
    fn for_tests(default_tool: &str, win_merge_path: &str) -> Self {
        Self {
            default_tool: Some(default_tool.to_owned()),
            win_merge_path: Some(PathBuf::from(win_merge_path)),
            ..Self::default()
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, an optional
    /// explicit file, and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        if let Some(path) = explicit
            && !path.exists()
        {
            anyhow::bail!("config file not found: {}", path.display());
        }
        Self::load_with_layers(global, workspace, explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        for path in [global, workspace, explicit].into_iter().flatten() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config layer");
                layers.push(Self::from_file(&path)?);
            }
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            tortoise_svn_path: other.tortoise_svn_path.or(self.tortoise_svn_path),
            tortoise_git_path: other.tortoise_git_path.or(self.tortoise_git_path),
            win_merge_path: other.win_merge_path.or(self.win_merge_path),
            default_tool: other.default_tool.or(self.default_tool),
            keep_temp_files: other.keep_temp_files.or(self.keep_temp_files),
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        let mut effective = self.clone();
        effective.default_tool = Some(self.default_tool().to_owned());
        effective.keep_temp_files = Some(self.keep_temp_files());
        toml::to_string_pretty(&effective).context("failed to serialize config")
    }

    /// Configured executable override for `tool`, unvalidated.
    pub fn tool_path(&self, tool: ToolId) -> Option<&Path> {
        match tool {
            ToolId::TortoiseSvn => self.tortoise_svn_path.as_deref(),
            ToolId::TortoiseGit => self.tortoise_git_path.as_deref(),
            ToolId::WinMerge => self.win_merge_path.as_deref(),
        }
    }

    /// Identifier of the tool used by "compare with"; parsed by the caller.
    pub fn default_tool(&self) -> &str {
        self.default_tool.as_deref().unwrap_or(FALLBACK_TOOL)
    }

    pub fn set_default_tool(&mut self, tool: impl Into<String>) {
        self.default_tool = Some(tool.into());
    }

    pub fn keep_temp_files(&self) -> bool {
        self.keep_temp_files.unwrap_or(false)
    }

    pub fn set_keep_temp_files(&mut self, keep: bool) {
        self.keep_temp_files = Some(keep);
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("easydiff/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(tool) = env.default_tool {
        config.default_tool = Some(tool);
    }
    if let Some(path) = env.tortoise_svn_path {
        config.tortoise_svn_path = Some(path);
    }
    if let Some(path) = env.tortoise_git_path {
        config.tortoise_git_path = Some(path);
    }
    if let Some(path) = env.win_merge_path {
        config.win_merge_path = Some(path);
    }
    config
}

//! Domain models for diff tools, pending comparisons, and launchable commands.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::errors::CompareError;

/// External diff/merge programs that can be launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ToolId {
    /// TortoiseSVN's `TortoiseProc`.
    TortoiseSvn,
    /// TortoiseGit's `TortoiseGitProc`.
    TortoiseGit,
    /// WinMerge.
    WinMerge,
}

impl ToolId {
    pub const ALL: [ToolId; 3] = [ToolId::TortoiseSvn, ToolId::TortoiseGit, ToolId::WinMerge];

    /// Stable identifier used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::TortoiseSvn => "tortoise_svn",
            ToolId::TortoiseGit => "tortoise_git",
            ToolId::WinMerge => "win_merge",
        }
    }

    /// Human readable name for menu captions.
    pub fn label(&self) -> &'static str {
        match self {
            ToolId::TortoiseSvn => "TortoiseSVN",
            ToolId::TortoiseGit => "TortoiseGit",
            ToolId::WinMerge => "WinMerge",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = CompareError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tortoise_svn" => Ok(ToolId::TortoiseSvn),
            "tortoise_git" => Ok(ToolId::TortoiseGit),
            "win_merge" => Ok(ToolId::WinMerge),
            other => Err(CompareError::UnsupportedTool(other.to_string())),
        }
    }
}

/// The single document remembered by "compare later".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingComparison {
    /// File compared against once the second document is chosen.
    pub path: PathBuf,
    /// Base name of `path` for on-disk documents, otherwise the buffer title.
    pub display_name: String,
    /// Whether the document was backed by a file when it was marked.
    pub on_disk: bool,
}

impl PendingComparison {
    /// Directory to show next to the display name, if any.
    pub fn directory(&self) -> Option<&Path> {
        if !self.on_disk {
            return None;
        }
        self.path.parent().filter(|dir| !dir.as_os_str().is_empty())
    }
}

/// A single argument of a [`CommandLine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Arg {
    /// Tool switch such as `/command:diff`, rendered bare.
    Switch(String),
    /// File operand, rendered inside double quotes.
    Path(PathBuf),
}

impl Arg {
    pub fn as_os_str(&self) -> &OsStr {
        match self {
            Arg::Switch(switch) => OsStr::new(switch),
            Arg::Path(path) => path.as_os_str(),
        }
    }
}

/// Fully shaped invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<Arg>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn switch(mut self, switch: &str) -> Self {
        self.args.push(Arg::Switch(switch.to_owned()));
        self
    }

    pub fn path(mut self, path: &Path) -> Self {
        self.args.push(Arg::Path(path.to_path_buf()));
        self
    }
}

impl fmt::Display for CommandLine {
    /// Program and paths are wrapped in double quotes, switches are left bare.
    /// Embedded quote characters are not escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.program.display())?;
        for arg in &self.args {
            match arg {
                Arg::Switch(switch) => write!(f, " {switch}")?,
                Arg::Path(path) => write!(f, " \"{}\"", path.display())?,
            }
        }
        Ok(())
    }
}

//! Shaping tool-specific command lines.

use std::path::Path;

use crate::domain::model::{CommandLine, ToolId};

/// Build the diff-mode invocation of `tool` comparing `left` against `right`.
///
/// The Tortoise tools take the second document as `/path` and the first as `/path2` so that
/// their base/mine ordering shows `left` against `right`. WinMerge keeps the natural order.
pub fn build(tool: ToolId, executable: &Path, left: &Path, right: &Path) -> CommandLine {
    let command = CommandLine::new(executable);
    match tool {
        ToolId::TortoiseSvn | ToolId::TortoiseGit => command
            .switch("/command:diff")
            .switch("/path")
            .path(right)
            .switch("/path2")
            .path(left),
        ToolId::WinMerge => command.switch("/e").path(left).path(right),
    }
}

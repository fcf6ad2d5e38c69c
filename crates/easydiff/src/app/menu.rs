//! Command captions and enabled/visible state for the host's menus.

use std::fmt;
use std::path::MAIN_SEPARATOR;

use crate::app::pending::PendingStore;
use crate::app::selection::{SelectionSource, Window};
use crate::domain::model::{PendingComparison, ToolId};

const MAX_DIR_CHARS: usize = 10;

/// Commands the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    CompareNow(ToolId),
    MarkForLater,
    CompareWithPending,
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuCommand::CompareNow(tool) => write!(f, "compare {tool}"),
            MenuCommand::MarkForLater => f.write_str("later"),
            MenuCommand::CompareWithPending => f.write_str("with"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub command: MenuCommand,
    pub caption: String,
    pub enabled: bool,
    pub visible: bool,
}

/// Snapshot the menu for the current window and pending state.
pub fn items(
    source: &dyn SelectionSource,
    window: &dyn Window,
    pending: &PendingStore,
) -> Vec<MenuItem> {
    let has_pair = source.selected_pair(window).is_some();
    let active_has_text = window
        .active_document()
        .is_some_and(|document| !document.is_empty());
    let pending = pending.peek();

    let mut items: Vec<MenuItem> = ToolId::ALL
        .into_iter()
        .map(|tool| MenuItem {
            command: MenuCommand::CompareNow(tool),
            caption: format!("Compare with {}", tool.label()),
            enabled: has_pair,
            visible: true,
        })
        .collect();

    items.push(MenuItem {
        command: MenuCommand::MarkForLater,
        caption: "Compare Later".to_owned(),
        enabled: active_has_text,
        visible: true,
    });
    items.push(MenuItem {
        command: MenuCommand::CompareWithPending,
        caption: compare_with_caption(pending.as_ref()),
        enabled: pending.is_some() && active_has_text,
        visible: pending.is_some(),
    });
    items
}

/// Caption of the compare-with command, naming the pending document.
///
/// Directories longer than ten characters are cut short with an ellipsis.
pub fn compare_with_caption(pending: Option<&PendingComparison>) -> String {
    let Some(pending) = pending else {
        return "Compare With...".to_owned();
    };

    let dir = match pending.directory() {
        Some(dir) => {
            let dir = dir.display().to_string();
            if dir.chars().count() > MAX_DIR_CHARS {
                let head: String = dir.chars().take(MAX_DIR_CHARS).collect();
                format!("{head}...{MAIN_SEPARATOR}")
            } else if dir.ends_with(MAIN_SEPARATOR) {
                dir
            } else {
                format!("{dir}{MAIN_SEPARATOR}")
            }
        }
        None => String::new(),
    };
    format!("Compare With \"{dir}{}\"", pending.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    fn pending(path: &str, name: &str, on_disk: bool) -> PendingComparison {
        PendingComparison {
            path: PathBuf::from(path),
            display_name: name.to_owned(),
            on_disk,
        }
    }

    #[test]
    fn caption_without_pending() {
        assert_eq!(compare_with_caption(None), "Compare With...");
    }

    #[test]
    fn short_directory_is_shown_in_full() {
        let path = format!("{MAIN_SEPARATOR}srv{MAIN_SEPARATOR}a.txt");
        let caption = compare_with_caption(Some(&pending(&path, "a.txt", true)));
        assert_eq!(caption, format!("Compare With \"{path}\""));
    }

    #[test]
    fn long_directory_is_truncated() {
        let sep = MAIN_SEPARATOR;
        let path = format!("{sep}home{sep}someone{sep}projects{sep}a.txt");
        let caption = compare_with_caption(Some(&pending(&path, "a.txt", true)));
        let head: String = format!("{sep}home{sep}someone").chars().take(10).collect();
        assert_eq!(caption, format!("Compare With \"{head}...{sep}a.txt\""));
    }

    #[cfg(windows)]
    #[test]
    fn long_windows_directory_ends_with_backslash() {
        let caption = compare_with_caption(Some(&pending(
            r"C:\Users\someone\projects\a.txt",
            "a.txt",
            true,
        )));
        assert_eq!(caption, r#"Compare With "C:\Users\s...\a.txt""#);
    }

    #[test]
    fn unsaved_documents_show_only_their_name() {
        let caption = compare_with_caption(Some(&pending("/tmp/easydiff-x.txt", "Draft", false)));
        assert_eq!(caption, "Compare With \"Draft\"");
    }

    #[test]
    fn display_names_the_shell_verb() {
        assert_eq!(
            MenuCommand::CompareNow(ToolId::WinMerge).to_string(),
            "compare win_merge"
        );
    }
}

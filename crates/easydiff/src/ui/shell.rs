//! Interactive host: a minimal editor window driving the comparison commands.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::app::compare::Comparer;
use crate::app::menu::{self, MenuCommand};
use crate::app::selection::{SelectionSource, Window};
use crate::domain::document::{Buffer, DocumentHandle};
use crate::domain::errors::CompareError;

const HELP: &str = "\
Commands:
  open <path>               open a file
  scratch <title|-> [text]  new unsaved buffer (`-` for no title)
  list                      list open documents
  focus <n>                 give document n input focus
  select <a> <b>            select the tabs of documents a and b
  group <0|1> <n>           show document n in pane 0 or 1
  compare [tool]            diff the selected pair
  later                     mark the focused document for a later compare
  with                      diff the marked document against the focused one
  pending                   show the marked document
  menu                      show commands and whether they are available
  quit                      leave the shell";

/// Result of executing one shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Silent,
    Quit,
}

/// Open documents and the layout that selection strategies inspect.
#[derive(Default)]
pub struct Workspace {
    documents: Vec<DocumentHandle>,
    groups: [Option<usize>; 2],
    selected: Vec<usize>,
    focused: Option<usize>,
}

impl Workspace {
    fn add(&mut self, document: DocumentHandle) -> usize {
        self.documents.push(document);
        let index = self.documents.len() - 1;
        if let Some(slot) = self.groups.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(index);
        }
        self.focused = Some(index);
        index
    }

    fn index(&self, token: Option<&str>) -> Result<usize> {
        let token = token.ok_or_else(|| anyhow!("missing document number"))?;
        let index: usize = token
            .parse()
            .with_context(|| format!("not a document number: {token}"))?;
        if index >= self.documents.len() {
            bail!("no document {index}");
        }
        Ok(index)
    }

    fn get(&self, index: Option<usize>) -> Option<DocumentHandle> {
        index.and_then(|index| self.documents.get(index).cloned())
    }

    fn describe(&self) -> String {
        let mut out = String::new();
        for (index, document) in self.documents.iter().enumerate() {
            let mut flags = String::new();
            if self.focused == Some(index) {
                flags.push('*');
            }
            for (group, slot) in self.groups.iter().enumerate() {
                if *slot == Some(index) {
                    let _ = write!(flags, "g{group}");
                }
            }
            if self.selected.contains(&index) {
                flags.push('s');
            }
            let origin = match document.file_name() {
                Some(path) => path.display().to_string(),
                None => "unsaved".to_owned(),
            };
            let title = match document.title() {
                "" => "(no title)",
                title => title,
            };
            let _ = writeln!(
                out,
                "[{index}] {flags:<5} {title} ({origin}, {} bytes)",
                document.len()
            );
        }
        out.trim_end().to_owned()
    }
}

impl Window for Workspace {
    fn active_in_group(&self, group: usize) -> Option<DocumentHandle> {
        self.get(self.groups.get(group).copied().flatten())
    }

    fn selected_documents(&self) -> Vec<DocumentHandle> {
        self.selected
            .iter()
            .filter_map(|index| self.get(Some(*index)))
            .collect()
    }

    fn active_document(&self) -> Option<DocumentHandle> {
        self.get(self.focused)
    }
}

/// Line-oriented host session.
pub struct Shell {
    comparer: Comparer,
    source: Box<dyn SelectionSource>,
    workspace: Workspace,
}

impl Shell {
    pub fn new(comparer: Comparer, source: Box<dyn SelectionSource>) -> Self {
        tracing::debug!(selection = source.name(), "starting shell");
        Self {
            comparer,
            source,
            workspace: Workspace::default(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Read commands until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let mut line_editor = Reedline::create();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("easydiff".into()),
            DefaultPromptSegment::Empty,
        );
        println!("Type `help` for commands.");

        loop {
            let line = match line_editor.read_line(&prompt).context("failed to read input")? {
                Signal::Success(line) => line,
                _ => break,
            };
            match self.execute(line.trim()) {
                Ok(Reply::Text(text)) => println!("{text}"),
                Ok(Reply::Silent) => {}
                Ok(Reply::Quit) => break,
                // Comparison failures were already shown by the notifier.
                Err(err) if err.downcast_ref::<CompareError>().is_some() => {}
                Err(err) => eprintln!("error: {err:#}"),
            }
        }
        Ok(())
    }

    /// Execute a single command line.
    pub fn execute(&mut self, command: &str) -> Result<Reply> {
        if command.is_empty() {
            return Ok(Reply::Silent);
        }

        let mut parts = command.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let rest = command[verb.len()..].trim();

        match verb {
            "open" => {
                if rest.is_empty() {
                    bail!("open requires a path");
                }
                let buffer = Buffer::open(PathBuf::from(rest))?;
                let index = self.workspace.add(buffer.into_handle());
                Ok(Reply::Text(format!("opened [{index}]")))
            }
            "scratch" => {
                let title = match parts.next() {
                    Some("-") | None => "",
                    Some(title) => title,
                };
                let text = parts.collect::<Vec<_>>().join(" ");
                let index = self
                    .workspace
                    .add(Buffer::scratch(title, text).into_handle());
                Ok(Reply::Text(format!("created [{index}]")))
            }
            "list" => Ok(Reply::Text(self.workspace.describe())),
            "focus" => {
                let index = self.workspace.index(parts.next())?;
                self.workspace.focused = Some(index);
                Ok(Reply::Silent)
            }
            "select" => {
                let first = self.workspace.index(parts.next())?;
                let second = self.workspace.index(parts.next())?;
                self.workspace.selected = vec![first, second];
                Ok(Reply::Silent)
            }
            "group" => {
                let group: usize = parts
                    .next()
                    .and_then(|token| token.parse().ok())
                    .filter(|group| *group < 2)
                    .ok_or_else(|| anyhow!("group must be 0 or 1"))?;
                let index = self.workspace.index(parts.next())?;
                self.workspace.groups[group] = Some(index);
                Ok(Reply::Silent)
            }
            "compare" => {
                let tool = self.comparer.tool(parts.next())?;
                let command =
                    self.comparer
                        .compare_selected(tool, self.source.as_ref(), &self.workspace)?;
                Ok(Reply::Text(format!("launched {command}")))
            }
            "later" => {
                let document = self.focused()?;
                match self.comparer.mark_for_later(&*document)? {
                    Some(pending) => Ok(Reply::Text(format!("marked {}", pending.display_name))),
                    None => Ok(Reply::Silent),
                }
            }
            "with" => {
                self.ensure_visible(MenuCommand::CompareWithPending)?;
                let document = self.focused()?;
                match self.comparer.compare_with_pending(&*document)? {
                    Some(command) => Ok(Reply::Text(format!("launched {command}"))),
                    None => Ok(Reply::Silent),
                }
            }
            "pending" => Ok(Reply::Text(match self.comparer.pending().peek() {
                Some(pending) => format!("{} ({})", pending.display_name, pending.path.display()),
                None => "nothing pending".to_owned(),
            })),
            "menu" => Ok(Reply::Text(self.render_menu())),
            "help" => Ok(Reply::Text(HELP.to_owned())),
            "quit" | "exit" => Ok(Reply::Quit),
            other => Err(anyhow!("unknown command '{other}', try `help`")),
        }
    }

    fn focused(&self) -> Result<DocumentHandle> {
        self.workspace
            .active_document()
            .ok_or_else(|| anyhow!("no document has focus"))
    }

    /// Refuse commands the host would not offer right now.
    fn ensure_visible(&self, command: MenuCommand) -> Result<()> {
        let items = menu::items(
            self.source.as_ref(),
            &self.workspace,
            self.comparer.pending(),
        );
        match items.iter().find(|item| item.command == command) {
            Some(item) if item.visible => Ok(()),
            _ => bail!("`{command}` is not available"),
        }
    }

    fn render_menu(&self) -> String {
        menu::items(
            self.source.as_ref(),
            &self.workspace,
            self.comparer.pending(),
        )
        .into_iter()
        .filter(|item| item.visible)
        .map(|item| {
            let mark = if item.enabled { "x" } else { " " };
            format!("[{mark}] {:<40} {}", item.caption, item.command)
        })
        .collect::<Vec<_>>()
        .join("\n")
    }
}

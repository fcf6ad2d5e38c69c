use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use easydiff::app::compare::Comparer;
use easydiff::app::menu::{self, MenuCommand};
use easydiff::app::pending::PendingStore;
use easydiff::app::selection::{GroupSelection, SheetSelection};
use easydiff::domain::errors::CompareError;
use easydiff::domain::model::{CommandLine, ToolId};
use easydiff::infra::config::Config;
use easydiff::infra::launcher::Launcher;
use easydiff::infra::notify::Notifier;
use easydiff::ui::shell::{Reply, Shell};
use insta::assert_snapshot;
use parking_lot::Mutex;

#[derive(Clone, Default)]
struct Recorder {
    launched: Arc<Mutex<Vec<CommandLine>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl Launcher for Recorder {
    fn launch(&self, command: &CommandLine) -> io::Result<()> {
        self.launched.lock().push(command.clone());
        Ok(())
    }
}

impl Notifier for Recorder {
    fn error_message(&self, message: &str) {
        self.errors.lock().push(message.to_owned());
    }
}

fn comparer(recorder: &Recorder) -> Comparer {
    Comparer::new(
        Config::default(),
        Arc::new(PendingStore::new()),
        Box::new(recorder.clone()),
        Box::new(recorder.clone()),
    )
}

fn text(reply: Reply) -> String {
    match reply {
        Reply::Text(text) => text,
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[test]
fn shell_compares_two_open_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("a.txt"), "alpha")?;
    fs::write(dir.path().join("b.txt"), "beta")?;

    let recorder = Recorder::default();
    let mut shell = Shell::new(comparer(&recorder), Box::new(GroupSelection));
    shell.execute(&format!("open {}", dir.path().join("a.txt").display()))?;
    shell.execute(&format!("open {}", dir.path().join("b.txt").display()))?;

    let reply = text(shell.execute("compare win_merge")?);
    assert!(reply.starts_with("launched \"WinMergeU.exe\" /e"));

    let launched = recorder.launched.lock();
    assert_eq!(launched.len(), 1);
    let rendered = launched[0].to_string();
    let left = rendered.find("a.txt").expect("left path");
    let right = rendered.find("b.txt").expect("right path");
    assert!(left < right);
    Ok(())
}

#[test]
fn shell_without_a_pair_reports_missing_selection() -> anyhow::Result<()> {
    let recorder = Recorder::default();
    let mut shell = Shell::new(comparer(&recorder), Box::new(SheetSelection));
    shell.execute("scratch only some text")?;

    let err = shell.execute("compare").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CompareError>(),
        Some(CompareError::MissingSelection)
    ));
    assert!(recorder.launched.lock().is_empty());
    assert_eq!(
        recorder.errors.lock().as_slice(),
        ["two documents must be selected to compare"]
    );
    Ok(())
}

#[test]
fn shell_reports_unsupported_tool_names() -> anyhow::Result<()> {
    let recorder = Recorder::default();
    let mut config = Config::default();
    config.set_default_tool("kdiff3");
    let comparer = Comparer::new(
        config,
        Arc::new(PendingStore::new()),
        Box::new(recorder.clone()),
        Box::new(recorder.clone()),
    );
    let mut shell = Shell::new(comparer, Box::new(GroupSelection));
    shell.execute("scratch a alpha")?;
    shell.execute("scratch b beta")?;

    let err = shell.execute("compare meld").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CompareError>(),
        Some(CompareError::UnsupportedTool(name)) if name == "meld"
    ));
    assert!(shell.execute("compare").is_err());

    assert!(recorder.launched.lock().is_empty());
    assert_eq!(
        recorder.errors.lock().as_slice(),
        [
            "unsupported diff tool 'meld'",
            "unsupported diff tool 'kdiff3'"
        ]
    );
    Ok(())
}

#[test]
fn compare_with_is_hidden_until_something_is_marked() -> anyhow::Result<()> {
    let recorder = Recorder::default();
    let mut shell = Shell::new(comparer(&recorder), Box::new(SheetSelection));
    shell.execute("scratch draft first version")?;

    assert!(shell.execute("with").is_err());
    assert_snapshot!(text(shell.execute("menu")?), @r###"
    [ ] Compare with TortoiseSVN                 compare tortoise_svn
    [ ] Compare with TortoiseGit                 compare tortoise_git
    [ ] Compare with WinMerge                    compare win_merge
    [x] Compare Later                            later
    "###);

    assert_eq!(text(shell.execute("later")?), "marked draft");
    shell.execute("scratch - second version")?;

    assert_snapshot!(text(shell.execute("menu")?), @r###"
    [x] Compare with TortoiseSVN                 compare tortoise_svn
    [x] Compare with TortoiseGit                 compare tortoise_git
    [x] Compare with WinMerge                    compare win_merge
    [x] Compare Later                            later
    [x] Compare With "draft"                     with
    "###);

    let reply = text(shell.execute("with")?);
    assert!(reply.starts_with("launched \"TortoiseProc.exe\" /command:diff /path"));
    assert_eq!(recorder.launched.lock().len(), 1);
    Ok(())
}

#[test]
fn empty_documents_neither_mark_nor_launch() -> anyhow::Result<()> {
    let recorder = Recorder::default();
    let mut shell = Shell::new(comparer(&recorder), Box::new(SheetSelection));
    shell.execute("scratch empty")?;

    assert_eq!(shell.execute("later")?, Reply::Silent);
    assert_eq!(text(shell.execute("pending")?), "nothing pending");

    shell.execute("scratch full content")?;
    shell.execute("later")?;
    shell.execute("focus 0")?;
    assert_eq!(shell.execute("with")?, Reply::Silent);
    assert!(recorder.launched.lock().is_empty());
    Ok(())
}

#[test]
fn marked_file_label_truncates_long_directories() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let nested = dir.path().join("a-rather-long-directory");
    fs::create_dir_all(&nested)?;
    let file = nested.join("a.txt");
    fs::write(&file, "alpha")?;

    let recorder = Recorder::default();
    let comparer = comparer(&recorder);
    let buffer = easydiff::domain::document::Buffer::open(&file)?;
    let pending = comparer.mark_for_later(&buffer)?.expect("marked");

    let dir_text = pending.path.parent().unwrap().display().to_string();
    let head: String = dir_text.chars().take(10).collect();
    assert_eq!(
        menu::compare_with_caption(comparer.pending().peek().as_ref()),
        format!("Compare With \"{head}...{}a.txt\"", std::path::MAIN_SEPARATOR)
    );

    fs::remove_file(&file)?;
    assert_eq!(comparer.pending().peek(), None);
    assert_eq!(
        menu::compare_with_caption(comparer.pending().peek().as_ref()),
        "Compare With..."
    );
    Ok(())
}

#[test]
fn menu_reports_compare_with_as_hidden_when_nothing_pending() {
    let recorder = Recorder::default();
    let comparer = comparer(&recorder);
    let shell = Shell::new(comparer, Box::new(GroupSelection));
    let pending = PendingStore::new();
    let items = menu::items(&GroupSelection, shell.workspace(), &pending);
    let with = items
        .iter()
        .find(|item| item.command == MenuCommand::CompareWithPending)
        .unwrap();
    assert!(!with.visible);
    assert!(items
        .iter()
        .filter(|item| matches!(item.command, MenuCommand::CompareNow(_)))
        .all(|item| !item.enabled));
}

#[test]
fn command_line_for_each_tool() {
    let left = Path::new("C:/work/doc1.txt");
    let right = Path::new("C:/work/doc2.txt");
    let rendered: Vec<String> = ToolId::ALL
        .into_iter()
        .map(|tool| {
            easydiff::app::command::build(tool, Path::new("tool.exe"), left, right).to_string()
        })
        .collect();
    assert_snapshot!(rendered.join("\n"), @r###"
    "tool.exe" /command:diff /path "C:/work/doc2.txt" /path2 "C:/work/doc1.txt"
    "tool.exe" /command:diff /path "C:/work/doc2.txt" /path2 "C:/work/doc1.txt"
    "tool.exe" /e "C:/work/doc1.txt" "C:/work/doc2.txt"
    "###);
}

//! Spawning external diff tools.

use std::io;
use std::process::{Command, Stdio};
use std::thread;

use crate::domain::model::{Arg, CommandLine};

/// Starts an external program without waiting for it.
pub trait Launcher: Send + Sync {
    fn launch(&self, command: &CommandLine) -> io::Result<()>;
}

/// Launches tools as detached child processes.
///
/// Stdin is redirected from the null device and stdout/stderr are piped so the tool never
/// writes into the host's terminal. A background thread reaps the child and discards its output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, command: &CommandLine) -> io::Result<()> {
        let mut process = Command::new(&command.program);
        process
            .args(command.args.iter().map(Arg::as_os_str))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        hide_console(&mut process);

        let child = process.spawn()?;
        let pid = child.id();
        tracing::debug!(pid, "spawned diff tool");

        // The tool is running at this point, so a missing reaper is not a launch failure.
        if let Err(err) = thread::Builder::new()
            .name(format!("easydiff-reaper-{pid}"))
            .spawn(move || match child.wait_with_output() {
                Ok(output) => tracing::debug!(pid, status = %output.status, "diff tool exited"),
                Err(err) => tracing::debug!(pid, error = %err, "lost track of diff tool"),
            })
        {
            tracing::warn!(pid, error = %err, "could not start reaper thread for diff tool");
        }
        Ok(())
    }
}

#[cfg(windows)]
fn hide_console(process: &mut Command) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    process.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_process: &mut Command) {}

//! Command-line front end and the interactive host shell.

pub mod cli;
pub mod shell;

//! Infrastructure adapters for config, temp files, tool lookup, and process spawning.

pub mod config;
pub mod launcher;
pub mod logging;
pub mod notify;
pub mod paths;
pub mod tools;

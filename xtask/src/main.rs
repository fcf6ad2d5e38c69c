use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::Command;

const EXPECTED_TOOLS: [&str; 3] = ["tortoise_svn", "tortoise_git", "win_merge"];

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suite with cargo nextest, or cargo test when nextest is missing
    Test {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Build the binary and check that every tool resolves
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Test { profile, release } => run_tests(profile, release)?,
        Commands::Smoke => run_smoke()?,
    }
    Ok(())
}

fn nextest_available() -> bool {
    Command::new("cargo")
        .args(["nextest", "--version"])
        .output()
        .is_ok_and(|output| output.status.success())
}

fn run_tests(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    if nextest_available() {
        cmd.arg("nextest").arg("run");
        if let Some(profile) = profile {
            cmd.arg("--profile").arg(profile);
        }
    } else {
        eprintln!("cargo-nextest not found, falling back to cargo test");
        cmd.arg("test");
    }
    cmd.args(["--package", "easydiff"]);
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("test run failed");
    }
    Ok(())
}

fn run_smoke() -> Result<()> {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--package", "easydiff", "--", "tools", "--json"])
        .output()
        .context("failed to run easydiff")?;
    if !output.status.success() {
        anyhow::bail!(
            "easydiff tools failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("tools output is not JSON")?;
    let ids: Vec<&str> = entries
        .as_array()
        .context("tools output is not a list")?
        .iter()
        .filter_map(|entry| entry["id"].as_str())
        .collect();
    if ids != EXPECTED_TOOLS {
        anyhow::bail!("unexpected tool list: {ids:?}");
    }
    println!("all {} tools resolve", ids.len());
    Ok(())
}

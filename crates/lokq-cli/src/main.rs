mod prompt;
mod source;

use anyhow::{bail, Result};
use clap::Parser;
use directories::ProjectDirs;
use lokq_core::builder::QueryBuilder;
use lokq_core::render::shell_command;
use std::path::PathBuf;
use std::process::Command;

use prompt::TerminalPrompter;
use source::LogcliSource;

#[derive(Parser)]
#[command(name = "lokq", about = "Interactive query builder for Grafana Loki", version)]
struct Cli {
    /// Read label names and values from the local cache when present
    #[arg(long)]
    cache: bool,

    /// Run the assembled logcli command instead of printing it
    #[arg(short = 'x', long)]
    execute: bool,

    /// logcli binary to invoke
    #[arg(long, default_value = "logcli")]
    logcli: String,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // logcli itself resolves the server from LOKI_ADDR; failing early beats
    // failing halfway through the prompts.
    if std::env::var_os("LOKI_ADDR").is_none() {
        bail!("LOKI_ADDR is not set (logcli reads it to reach the Loki server)");
    }

    let cache_file = if cli.cache { cache_file() } else { None };
    let source = LogcliSource::new(cli.logcli.clone(), cache_file);
    let mut prompter = TerminalPrompter::new();

    let session = QueryBuilder::new(&mut prompter, &source).run()?;
    let args = session.command_args(&cli.logcli);

    if cli.execute {
        execute(&args)
    } else {
        println!("{}", shell_command(&args));
        Ok(())
    }
}

/// `$XDG_CACHE_HOME/lokq/labels.json`, falling back to `~/.cache/lokq`.
fn cache_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lokq").map(|dirs| dirs.cache_dir().join("labels.json"))
}

/// Run the assembled command synchronously with inherited stdio.
fn execute(args: &[String]) -> Result<()> {
    let (program, rest) = match args.split_first() {
        Some(split) => split,
        None => bail!("nothing to execute"),
    };
    let status = Command::new(program).args(rest).status();
    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => bail!("execution failed: {} exited with {}", program, status),
        Err(e) => bail!("execution failed: could not run {}: {}", program, e),
    }
}

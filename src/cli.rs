use crate::config::{self, Config};
use crate::model::CommandList;
use crate::storage;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "cla",
    version,
    about = "Keep a short list of shell commands and launch them from a TUI"
)]
pub struct Cli {
    /// Config file (defaults to ~/.cla/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Command list file, overriding the configured one
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Print the stored commands and exit (no TUI)
    #[arg(long, conflicts_with_all = ["json", "exec"])]
    pub list: bool,

    /// Print the stored commands as JSON and exit (no TUI)
    #[arg(long, conflicts_with = "exec")]
    pub json: bool,

    /// Run the stored command with this id without opening the TUI
    #[arg(long, value_name = "ID")]
    pub exec: Option<usize>,

    /// Print the chosen command instead of running it
    #[arg(long)]
    pub print: bool,

    /// Append logs to this file (CLA_LOG sets the filter)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Resolve the effective config: file values first, then flag overrides.
pub fn build_config(args: &Cli) -> Result<Config> {
    let mut cfg = config::load_config(args.config.as_deref())?;
    if let Some(p) = args.data_file.as_ref() {
        cfg.data_path = p.clone();
    }
    if let Some(p) = args.log_file.as_ref() {
        cfg.log_file = Some(p.clone());
    }
    Ok(cfg)
}

/// Run the CLI and return the process exit code.
pub fn run(args: Cli) -> Result<i32> {
    let cfg = build_config(&args)?;
    crate::logging::init_logging(cfg.log_file.as_deref())?;
    tracing::debug!(data = %cfg.data_path.display(), limit = cfg.limit_line, "config loaded");

    if args.list {
        return run_text(&cfg);
    }
    if args.json {
        return run_json(&cfg);
    }
    if let Some(id) = args.exec {
        let list = load_list(&cfg)?;
        let entry = list
            .find(id)
            .with_context(|| format!("no entry with id {id}"))?;
        return launch(&cfg, &args, &entry.command);
    }

    #[cfg(feature = "tui")]
    {
        use crate::session::SessionOutcome;
        use crate::storage::FileStore;

        let store = FileStore::new(&cfg.data_path);
        match crate::tui::run(&cfg, store)? {
            SessionOutcome::Quit => Ok(0),
            SessionOutcome::Execute(cmd) => launch(&cfg, &args, &cmd),
        }
    }
    #[cfg(not(feature = "tui"))]
    {
        // Fallback when built without TUI support.
        run_text(&cfg)
    }
}

fn load_list(cfg: &Config) -> Result<CommandList> {
    storage::load(&cfg.data_path).with_context(|| format!("load {}", cfg.data_path.display()))
}

fn run_text(cfg: &Config) -> Result<i32> {
    let list = load_list(cfg)?;
    for line in crate::text_summary::build_text_summary(&list).lines {
        println!("{line}");
    }
    Ok(0)
}

fn run_json(cfg: &Config) -> Result<i32> {
    let list = load_list(cfg)?;
    println!("{}", storage::encode(&list)?);
    Ok(0)
}

fn launch(cfg: &Config, args: &Cli, command: &str) -> Result<i32> {
    if args.print {
        if !command.trim().is_empty() {
            println!("{command}");
        }
        return Ok(0);
    }
    match crate::exec::run_shell(cfg.shell.as_deref(), command)? {
        Some(status) => Ok(crate::exec::exit_code(status)),
        None => Ok(0),
    }
}

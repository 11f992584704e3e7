mod cli;
mod config;
mod exec;
mod keys;
mod logging;
mod model;
mod session;
mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use clap::Parser;

fn main() {
    let args = cli::Cli::parse();

    match cli::run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Single exit point for every fatal error below.
            tracing::error!("{e:#}");
            eprintln!("cla: {e:#}");
            std::process::exit(1);
        }
    }
}

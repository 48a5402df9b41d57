mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show udlg info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("udlg", level)
            .filter_module("udlg_cli", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Info { path } => commands::info::run(path, &cli.global),
        Command::Check {
            path,
            recursive,
            output,
            use_cache,
        } => commands::check::run(path, *recursive, output, *use_cache, &cli.global),
        Command::Dump { path, output } => commands::dump::run(path, output.as_deref()),
        Command::Extract { path, output } => {
            commands::extract::run(path, output.as_deref(), &cli.global)
        }
        Command::Apply {
            dialogs,
            i18n,
            output,
            skip_processed,
        } => commands::apply::run(
            &commands::apply::ApplyOptions {
                dialogs,
                i18n,
                output,
                skip_processed: *skip_processed,
            },
            &cli.global,
        ),
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// udlg - inspection, health checks and localization for Underrail dialog files
#[derive(Debug, Parser)]
#[command(name = "udlg", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display the envelope: identifier, header entries, document offset and record counts.
    Info {
        /// Path to the .udlg file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Parse every .udlg file of a directory and record which ones are healthy.
    Check {
        /// Directory with .udlg files, or a single file.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,

        /// Health report to write (JSON map of path to result).
        #[arg(short, long, value_name = "FILE", default_value = "health.json")]
        output: PathBuf,

        /// Skip files already listed in an existing health report.
        #[arg(long)]
        use_cache: bool,
    },

    /// Dump the decoded document as a JSON tree.
    Dump {
        /// Path to a .udlg file or a bare object-graph stream.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Write to a file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export every patchable string as a patch block template.
    Extract {
        /// Path to a .udlg file or a bare object-graph stream.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Write to a file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Apply translated patch blocks to a tree of dialog files.
    Apply {
        /// Dialog directory (Underrail Data/Dialogs).
        #[arg(short, long, value_name = "DIR")]
        dialogs: PathBuf,

        /// Directory with one .txt patch block per dialog, mirroring the dialog tree.
        #[arg(short = 'T', long, value_name = "DIR")]
        i18n: PathBuf,

        /// Output directory for patched dialogs.
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Skip dialogs whose patch block is unchanged since the last run.
        #[arg(short = 'S', long)]
        skip_processed: bool,
    },
}

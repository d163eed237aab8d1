mod help_text;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::baseline_file::DEFAULT_BASELINE_FILE;

/// Record checksums of individual files and watch them for changes
#[derive(Parser, Debug)]
#[command(
    name = "fileward",
    version,
    about,
    long_about = help_text::ROOT_LONG_ABOUT
)]
pub struct Cli {
    /// Run as if started in DIR
    #[arg(short = 'C', value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    /// Baseline file, relative to the working directory
    #[arg(
        long,
        value_name = "FILE",
        env = "FILEWARD_BASELINE",
        default_value = DEFAULT_BASELINE_FILE,
        global = true
    )]
    pub baseline: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). Takes precedence over RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Set the log level explicitly. Takes precedence over RUST_LOG.
    #[arg(
        long,
        value_name = "LEVEL",
        conflicts_with = "verbose",
        global = true
    )]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace the baseline with checksums of the given files
    #[command(long_about = help_text::INIT_LONG_ABOUT)]
    Init {
        /// Files to track
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,

        #[command(flatten)]
        update: UpdateFlags,
    },

    /// Track additional files, or re-baseline files that are already tracked
    #[command(long_about = help_text::ADD_LONG_ABOUT)]
    Add {
        /// Files to add or re-baseline
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,

        #[command(flatten)]
        update: UpdateFlags,
    },

    /// Stop tracking files
    Remove {
        /// Files to remove from the baseline
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,

        #[command(flatten)]
        update: UpdateFlags,
    },

    /// Compare tracked files against the baseline once
    #[command(long_about = help_text::CHECK_LONG_ABOUT)]
    Check {
        /// Also list unchanged files
        #[arg(long)]
        all: bool,

        /// Print results as JSON (always includes unchanged files)
        #[arg(long, conflicts_with = "all")]
        json: bool,
    },

    /// Re-check tracked files continuously until interrupted
    #[command(long_about = help_text::WATCH_LONG_ABOUT)]
    Watch {
        /// Time between checks in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct UpdateFlags {
    /// Preview changes without writing the baseline
    #[arg(long)]
    pub dry_run: bool,

    /// Fail instead of skipping paths that cannot be applied
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

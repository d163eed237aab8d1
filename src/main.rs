mod baseline_file;
mod checksum;
mod cli;
mod monitor;
mod render;
mod shutdown;
mod status;
mod update;

use baseline_file::BaselineStore;
use cli::{Cli, Command, LogLevel, UpdateFlags};
use monitor::{MonitorOptions, run_monitor};
use render::TerminalRenderer;
use shutdown::Shutdown;
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Event, Level, Subscriber, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use update::{UpdateOptions, UpdateReport, add_to_baseline, init_baseline, remove_from_baseline};

struct WardExitCode;

impl WardExitCode {
    /// Exit code used when a check found modified, missing or unreadable files.
    fn status_unclean() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used for other errors (I/O errors, invalid arguments, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    // Change working directory if -C was specified
    if let Some(directory) = cli.directory
        && let Err(e) = std::env::set_current_dir(&directory)
    {
        error!(
            "Failed to change directory to {}: {}",
            directory.display(),
            e
        );
        return WardExitCode::any_error();
    }

    let store = BaselineStore::new(cli.baseline);

    let result: anyhow::Result<ExitCode> = match cli.command {
        Command::Init { paths, update } => {
            handle_update(&store, "Initialized", update, |options| {
                init_baseline(&store, &paths, options)
            })
        }
        Command::Add { paths, update } => handle_update(&store, "Updated", update, |options| {
            add_to_baseline(&store, &paths, options)
        }),
        Command::Remove { paths, update } => {
            handle_update(&store, "Updated", update, |options| {
                remove_from_baseline(&store, &paths, options)
            })
        }
        Command::Check { all, json } => handle_check(&store, all, json),
        Command::Watch { interval_ms } => handle_watch(&store, interval_ms),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err}");
            WardExitCode::any_error()
        }
    }
}

fn handle_update<F>(
    store: &BaselineStore,
    verb: &str,
    flags: UpdateFlags,
    run: F,
) -> anyhow::Result<ExitCode>
where
    F: FnOnce(UpdateOptions) -> Result<UpdateReport, update::UpdateError>,
{
    let options = UpdateOptions {
        dry_run: flags.dry_run,
        strict: flags.strict,
    };

    let report = run(options)?;

    if flags.dry_run {
        info!("DRY RUN - baseline was not modified");
    }

    info!(
        "{} {}: {} checksummed, {} removed, {} skipped, {} tracked",
        verb,
        store.path().display(),
        report.hashed_count(),
        report.removed_count(),
        report.skipped().len(),
        report.tracked
    );

    Ok(ExitCode::SUCCESS)
}

fn handle_check(store: &BaselineStore, all: bool, json: bool) -> anyhow::Result<ExitCode> {
    if !store.exists() {
        info!(
            "No baseline found at {} (use fileward init to create one)",
            store.path().display()
        );
    }

    let result = status::check(store)?;

    if json {
        render::print_json(&result.statuses)?;
    } else {
        render::print_statuses(&result.statuses, all);
    }

    if result.is_clean() {
        info!("All {} tracked files unchanged", result.statuses.len());
        return Ok(ExitCode::SUCCESS);
    }

    info!(
        "{} modified, {} missing, {} unreadable",
        result.count(status::StatusType::Modified),
        result.count(status::StatusType::Missing),
        result.count(status::StatusType::Unreadable)
    );

    Ok(WardExitCode::status_unclean())
}

fn handle_watch(store: &BaselineStore, interval_ms: u64) -> anyhow::Result<ExitCode> {
    let options = MonitorOptions {
        interval: Duration::from_millis(interval_ms),
    };
    let shutdown = Shutdown::on_interrupt()?;
    let mut renderer = TerminalRenderer::new();

    info!("Watching {} every {}ms", store.path().display(), interval_ms);

    run_monitor(store, options, &shutdown, &mut renderer);

    Ok(ExitCode::SUCCESS)
}

fn default_filter(verbose: u8, log_level: Option<LogLevel>) -> Option<&'static str> {
    match (log_level, verbose) {
        (Some(level), _) => Some(level.as_filter()),
        (None, 0) => None,
        (None, 1) => Some("info"),
        (None, _) => Some("debug"),
    }
}

fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    // Explicit flags win over RUST_LOG, which wins over the default.
    let filter = match default_filter(verbose, log_level) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::TRACE | Level::DEBUG => write!(writer, "🔍 ")?,
                Level::INFO => write!(writer, "ℹ️  ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::ERROR => write!(writer, "❌ ")?,
                _ => {}
            }
        } else {
            match *event.metadata().level() {
                Level::TRACE => writer.write_str("TRACE: ")?,
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => {}
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

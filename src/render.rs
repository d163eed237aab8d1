use crate::monitor::{Frame, Render};
use crate::status::{Status, StatusType};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use tracing::warn;

fn status_code(status_type: StatusType) -> &'static str {
    match status_type {
        StatusType::Unchanged => ".",
        StatusType::Modified => "M",
        StatusType::Missing => "D",
        StatusType::Unreadable => "E",
    }
}

fn format_status_line(status: &Status) -> String {
    match &status.error {
        Some(error) => format!(
            "{:<2} {} ({})",
            status_code(status.status_type),
            status.path,
            error
        ),
        None => format!("{:<2} {}", status_code(status.status_type), status.path),
    }
}

fn format_status_lines(statuses: &[Status], all: bool) -> Vec<String> {
    statuses
        .iter()
        .filter(|s| all || s.status_type != StatusType::Unchanged)
        .map(format_status_line)
        .collect()
}

fn format_summary(statuses: &[Status]) -> String {
    let count = |t: StatusType| statuses.iter().filter(|s| s.status_type == t).count();
    format!(
        "{} tracked: {} unchanged, {} modified, {} missing, {} unreadable",
        statuses.len(),
        count(StatusType::Unchanged),
        count(StatusType::Modified),
        count(StatusType::Missing),
        count(StatusType::Unreadable),
    )
}

/// Print one line per status. Unchanged entries are only printed with `all`.
pub fn print_statuses(statuses: &[Status], all: bool) {
    for line in format_status_lines(statuses, all) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct JsonStatus<'a> {
    file: &'a str,
    status: StatusType,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

fn format_json(statuses: &[Status]) -> serde_json::Result<String> {
    let entries: Vec<_> = statuses
        .iter()
        .map(|s| JsonStatus {
            file: &s.path,
            status: s.status_type,
            error: s.error.as_deref(),
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// Print every status as a JSON array of `{"file", "status"}` objects.
pub fn print_json(statuses: &[Status]) -> serde_json::Result<()> {
    println!("{}", format_json(statuses)?);
    Ok(())
}

/// Draws monitor frames on stdout.
///
/// Every tracked file is listed, unchanged ones included. On a terminal each
/// frame is drawn over the previous one. Otherwise frames are appended, each
/// starting with its header line.
pub struct TerminalRenderer {
    redraw: bool,
    frames: u64,
    /// Set after the first failed write so a closed stdout warns once.
    write_failed: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        TerminalRenderer {
            redraw: io::stdout().is_terminal(),
            frames: 0,
            write_failed: false,
        }
    }

    fn frame_lines(&self, frame: &Frame) -> Vec<String> {
        let mut lines = vec![format!(
            "fileward watch | {} | check #{}",
            frame.taken_at.format("%Y-%m-%d %H:%M:%S"),
            frame.tick + 1
        )];

        match &frame.outcome {
            Ok(statuses) if statuses.is_empty() => {
                lines.push("No files tracked".to_string());
            }
            Ok(statuses) => {
                lines.extend(format_status_lines(statuses, true));
                lines.push(format_summary(statuses));
            }
            Err(error) => lines.push(format!("ERROR: {}", error)),
        }

        lines
    }

    fn write_frame(&self, out: &mut impl Write, frame: &Frame) -> io::Result<()> {
        if self.redraw {
            // Clear screen and move the cursor home.
            write!(out, "\x1b[2J\x1b[H")?;
        }
        for line in self.frame_lines(frame) {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    fn write_stopped(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Stopped after {} checks", self.frames)?;
        out.flush()
    }

    fn report_write_error(&mut self, result: io::Result<()>) {
        if let Err(e) = result
            && !self.write_failed
        {
            warn!("Failed to write to stdout: {}", e);
            self.write_failed = true;
        }
    }
}

impl Render for TerminalRenderer {
    fn frame(&mut self, frame: &Frame) {
        let result = self.write_frame(&mut io::stdout().lock(), frame);
        self.report_write_error(result);
        self.frames += 1;
    }

    fn stopped(&mut self) {
        let result = self.write_stopped(&mut io::stdout().lock());
        self.report_write_error(result);
    }
}

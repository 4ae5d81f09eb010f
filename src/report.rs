// src/report.rs
//
// CSV and text renderings of the same records. Every CSV field also appears
// in the matching text line so the two modes can be diffed.

use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::time::Duration;

use crate::benchmark::CycleSummary;
use crate::runner::ResultRecord;

pub const CSV_HEADER: &str =
    "\"Cycle\",\"Message ID\",\"Message in Bytes\",\"Execution time in secs\",\"IMAP Command\"";

pub const BANNER: &str = "IMAP Roadrunner at your service";

/// Receives benchmark events as they happen.
pub trait Reporter {
    fn begin(&mut self) -> io::Result<()>;
    fn cycle_started(&mut self, cycle: u32) -> io::Result<()>;
    fn mailbox_selected(&mut self, message_count: u32, folder: &str) -> io::Result<()>;
    fn record(&mut self, record: &ResultRecord) -> io::Result<()>;
    fn cycle_finished(&mut self, summary: &CycleSummary) -> io::Result<()>;
    fn finish(&mut self, total: Duration) -> io::Result<()>;
}

pub fn format_secs(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}

/// Quote a CSV field, doubling embedded quotes.
fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn csv_row(record: &ResultRecord) -> String {
    format!(
        "{},{},{},{},{}",
        record.cycle,
        record.sequence,
        record.bytes,
        format_secs(record.elapsed),
        csv_quote(&record.label)
    )
}

pub fn text_line(record: &ResultRecord) -> String {
    let mut line = format!(
        "[cycle {}] {} => IMAP reply => {} bytes (received in {} secs)",
        record.cycle,
        record.label,
        record.bytes,
        format_secs(record.elapsed)
    );
    if let Some(err) = &record.error {
        line.push_str(&format!(" [failed: {}]", err));
    }
    line
}

pub struct CsvReporter<W: Write> {
    out: W,
}

impl<W: Write> CsvReporter<W> {
    pub fn new(out: W) -> Self {
        CsvReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn begin(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", CSV_HEADER)
    }

    fn cycle_started(&mut self, _cycle: u32) -> io::Result<()> {
        Ok(())
    }

    fn mailbox_selected(&mut self, _message_count: u32, _folder: &str) -> io::Result<()> {
        Ok(())
    }

    fn record(&mut self, record: &ResultRecord) -> io::Result<()> {
        writeln!(self.out, "{}", csv_row(record))
    }

    fn cycle_finished(&mut self, _summary: &CycleSummary) -> io::Result<()> {
        self.out.flush()
    }

    fn finish(&mut self, _total: Duration) -> io::Result<()> {
        self.out.flush()
    }
}

pub struct TextReporter<W: Write> {
    out: W,
    started: DateTime<Local>,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        TextReporter {
            out,
            started: Local::now(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn begin(&mut self) -> io::Result<()> {
        writeln!(self.out, "{} (started {})", BANNER, self.started.to_rfc3339())
    }

    fn cycle_started(&mut self, cycle: u32) -> io::Result<()> {
        writeln!(self.out, "Launch cycle {}", cycle)
    }

    fn mailbox_selected(&mut self, message_count: u32, folder: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "Server responded with => {} total messages in {}",
            message_count, folder
        )
    }

    fn record(&mut self, record: &ResultRecord) -> io::Result<()> {
        writeln!(self.out, "{}", text_line(record))
    }

    fn cycle_finished(&mut self, summary: &CycleSummary) -> io::Result<()> {
        writeln!(
            self.out,
            "Cycle {} finished => {} operations, {} bytes in {} secs",
            summary.cycle,
            summary.operations,
            summary.bytes,
            format_secs(summary.elapsed)
        )?;
        self.out.flush()
    }

    fn finish(&mut self, total: Duration) -> io::Result<()> {
        writeln!(self.out, "Total run time => {} secs", format_secs(total))?;
        self.out.flush()
    }
}

/// Pick the reporter for the requested output mode.
pub fn reporter_for<W: Write + 'static>(csv: bool, out: W) -> Box<dyn Reporter> {
    if csv {
        Box::new(CsvReporter::new(out))
    } else {
        Box::new(TextReporter::new(out))
    }
}

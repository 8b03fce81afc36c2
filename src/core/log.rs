//! Append-only audit trail for the store.
//!
//! Every attempted operation becomes one [`LogRecord`], held in memory
//! and mirrored line-by-line through a [`LogSink`]. The sink is injected
//! at construction so tests can substitute [`MemorySink`] for the real
//! [`FileSink`].
//!
//! Durability is best-effort, visibility is not: a failed sink write is
//! reported on stderr and absorbed, but the in-memory append always
//! happens, so callers reading [`OperationLog::entries`] see every
//! record.

use crate::core::error::FsError;
use crate::core::time;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Title line shared by the session banner and exported files.
pub const BANNER_TITLE: &str = "READ-ONLY FILE SYSTEM SIMULATOR - OPERATION LOG";

const BANNER_RULE_LEN: usize = 80;

/// Closed set of audit record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpKind {
    System,
    CreateFile,
    CreateFolder,
    Delete,
    ModifyFile,
    Rename,
    ModeChange,
    Error,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OpKind::System => "SYSTEM",
            OpKind::CreateFile => "CREATE_FILE",
            OpKind::CreateFolder => "CREATE_FOLDER",
            OpKind::Delete => "DELETE",
            OpKind::ModifyFile => "MODIFY_FILE",
            OpKind::Rename => "RENAME",
            OpKind::ModeChange => "MODE_CHANGE",
            OpKind::Error => "ERROR",
        };
        write!(f, "{}", label)
    }
}

/// One timestamped audit record.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub ts: DateTime<Local>,
    pub kind: OpKind,
    pub description: String,
}

impl LogRecord {
    /// Render as the canonical log line:
    /// `[YYYY-MM-DD HH:MM:SS.mmm] [KIND] description`.
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] {}",
            time::format_log_ts(&self.ts),
            self.kind,
            self.description
        )
    }
}

/// Destination for the durable mirror of the log.
pub trait LogSink: Send {
    /// Append one already-rendered line.
    fn append_line(&mut self, line: &str) -> io::Result<()>;
}

fn banner_rule() -> String {
    "=".repeat(BANNER_RULE_LEN)
}

/// Durable sink backed by a plain-text file. Created (truncated) once at
/// store construction with a session banner; every record is appended
/// with open-append-close, matching the audit-file discipline of the
/// event logs this mirrors.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create or truncate the log file and write the session banner.
    /// Banner failure is reported on stderr and absorbed; the sink is
    /// still returned and later appends retry the file on their own.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        let sink = FileSink { path: path.into() };
        if let Err(e) = sink.write_banner() {
            eprintln!(
                "Warning: could not initialize log file {}: {}",
                sink.path.display(),
                e
            );
        }
        sink
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_banner(&self) -> io::Result<()> {
        let mut f = std::fs::File::create(&self.path)?;
        writeln!(f, "{}", banner_rule())?;
        writeln!(f, "{}", BANNER_TITLE)?;
        writeln!(f, "{}", banner_rule())?;
        writeln!(f, "Session started: {}", time::format_log_ts(&time::now()))?;
        writeln!(f, "{}", banner_rule())?;
        writeln!(f)?;
        Ok(())
    }
}

impl LogSink for FileSink {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{}", line)
    }
}

/// In-memory sink double for tests and embedding without a log file.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl LogSink for MemorySink {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Append-only operation log: an in-memory record sequence plus a
/// durable sink mirror.
pub struct OperationLog {
    entries: Vec<LogRecord>,
    sink: Box<dyn LogSink>,
}

impl OperationLog {
    pub fn new(sink: Box<dyn LogSink>) -> Self {
        OperationLog {
            entries: Vec::new(),
            sink,
        }
    }

    /// Append one record. The in-memory append is unconditional; the
    /// sink write is best-effort (failure goes to stderr only).
    pub fn record(&mut self, kind: OpKind, description: impl Into<String>) {
        let record = LogRecord {
            ts: time::now(),
            kind,
            description: description.into(),
        };
        let line = record.render();
        self.entries.push(record);
        if let Err(e) = self.sink.append_line(&line) {
            eprintln!("Warning: could not write to log file: {}", e);
        }
    }

    pub fn entries(&self) -> &[LogRecord] {
        &self.entries
    }

    /// All records rendered as canonical log lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(LogRecord::render).collect()
    }

    /// Last `count` records (all of them when fewer exist), in order.
    pub fn recent(&self, count: usize) -> &[LogRecord] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the in-memory records. The durable sink is untouched, so
    /// history already mirrored to disk survives.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export the in-memory records to `path` with a `Generated:`
    /// banner. Unlike routine sink writes, failure here is surfaced to
    /// the caller.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), FsError> {
        let mut f = std::fs::File::create(path.as_ref())?;
        writeln!(f, "{}", banner_rule())?;
        writeln!(f, "{}", BANNER_TITLE)?;
        writeln!(f, "{}", banner_rule())?;
        writeln!(f, "Generated: {}", time::format_log_ts(&time::now()))?;
        writeln!(f, "Total entries: {}", self.entries.len())?;
        writeln!(f, "{}", banner_rule())?;
        writeln!(f)?;
        for record in &self.entries {
            writeln!(f, "{}", record.render())?;
        }
        Ok(())
    }
}

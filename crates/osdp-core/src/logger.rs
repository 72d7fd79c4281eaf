//! Device-scoped diagnostic logger.
//!
//! Lines look like `OSDP: ERROR: PD[3]: reply timed out`. A [`Logger`] carries
//! the severity threshold, the output sink and the "current device" tag, so
//! each session can own one instead of sharing process-wide state.
//!
//! The device tag keeps exactly one slot of history: `restore_context` brings
//! back whatever was current before the most recent `set_context` or
//! `reset_context`, not the value from two calls ago.

use std::fmt;
use std::io::{IsTerminal, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Prefix on every emitted line.
pub const LINE_PREFIX: &str = "OSDP";

/// Sent to the sink in place of a message whose formatting failed.
pub const FORMAT_ERROR_LINE: &str = "OSDP: log formatting failed";

const RED: &str = "\x1B[31m";
const GREEN: &str = "\x1B[32m";
const YELLOW: &str = "\x1B[33m";
const MAGENTA: &str = "\x1B[35m";
const RESET: &str = "\x1B[0m";

/// Syslog-style severities, most severe first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    #[serde(alias = "emerg")]
    Emergency = 0,
    Alert = 1,
    #[serde(alias = "crit")]
    Critical = 2,
    #[serde(alias = "err")]
    Error = 3,
    #[serde(alias = "warn")]
    #[default]
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl LogLevel {
    pub const ALL: [Self; 8] = [
        Self::Emergency,
        Self::Alert,
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Info,
        Self::Debug,
    ];

    /// Fixed-width tag printed after the prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Emergency => "EMERG",
            Self::Alert => "ALERT",
            Self::Critical => "CRIT ",
            Self::Error => "ERROR",
            Self::Warning => "WARN ",
            Self::Notice => "NOTIC",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
        }
    }

    /// ANSI colour used on interactive sinks.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Emergency | Self::Alert | Self::Critical | Self::Error => RED,
            Self::Warning => YELLOW,
            Self::Notice => MAGENTA,
            Self::Info => GREEN,
            Self::Debug => RESET,
        }
    }

    /// Matching `tracing` level, used when bridging into a subscriber.
    pub const fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Emergency | Self::Alert | Self::Critical | Self::Error => tracing::Level::ERROR,
            Self::Warning => tracing::Level::WARN,
            Self::Notice | Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| Error::InvalidLogLevel(value.to_string()))
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "emergency" | "emerg" => Self::Emergency,
            "alert" => Self::Alert,
            "critical" | "crit" => Self::Critical,
            "error" | "err" => Self::Error,
            "warning" | "warn" => Self::Warning,
            "notice" => Self::Notice,
            "info" => Self::Info,
            "debug" => Self::Debug,
            other => {
                return other
                    .parse::<u8>()
                    .map_err(|_| Error::InvalidLogLevel(s.to_string()))
                    .and_then(Self::try_from);
            }
        };
        Ok(level)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().trim_end())
    }
}

/// Destination for formatted log lines.
pub trait LogSink: Send {
    /// Write one complete line. `line` carries no trailing newline.
    fn emit(&mut self, line: &str);

    /// Write a line produced at `level`. `None` marks a raw, untagged line.
    fn emit_at(&mut self, level: Option<LogLevel>, line: &str) {
        let _ = level;
        self.emit(line);
    }

    /// Whether the destination is an interactive terminal that understands
    /// ANSI colour codes.
    fn supports_color(&self) -> bool {
        false
    }
}

impl<F> LogSink for F
where
    F: FnMut(&str) + Send,
{
    fn emit(&mut self, line: &str) {
        self(line);
    }
}

/// Default sink: standard output, coloured only when stdout is a terminal.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        // Nowhere left to report a failed diagnostic write.
        let _ = writeln!(out, "{line}");
    }

    fn supports_color(&self) -> bool {
        std::io::stdout().is_terminal()
    }
}

/// Forwards lines into the installed `tracing` subscriber.
///
/// Events go out at the level the line was logged with; raw lines go out at
/// INFO.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&mut self, line: &str) {
        self.emit_at(None, line);
    }

    fn emit_at(&mut self, level: Option<LogLevel>, line: &str) {
        match level {
            Some(LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical | LogLevel::Error) => {
                tracing::error!(target: "osdp", "{line}");
            }
            Some(LogLevel::Warning) => tracing::warn!(target: "osdp", "{line}"),
            Some(LogLevel::Debug) => tracing::debug!(target: "osdp", "{line}"),
            Some(LogLevel::Notice | LogLevel::Info) | None => {
                tracing::info!(target: "osdp", "{line}");
            }
        }
    }
}

/// Leveled, device-tagged logger.
pub struct Logger {
    level: LogLevel,
    sink: Box<dyn LogSink>,
    context: Option<usize>,
    previous_context: Option<usize>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("context", &self.context)
            .field("previous_context", &self.previous_context)
            .finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Threshold `Warning`, output to stdout, no device context.
    pub fn new() -> Self {
        Self {
            level: LogLevel::default(),
            sink: Box::new(StdoutSink),
            context: None,
            previous_context: None,
        }
    }

    /// Build a logger writing to `sink` at threshold `level`.
    pub fn with_sink(level: LogLevel, sink: impl LogSink + 'static) -> Self {
        Self {
            level,
            sink: Box::new(sink),
            ..Self::new()
        }
    }

    /// Reconfigure threshold and, if given, the sink. `None` keeps the
    /// current sink.
    pub fn init(&mut self, level: LogLevel, sink: Option<Box<dyn LogSink>>) {
        self.level = level;
        if let Some(sink) = sink {
            self.sink = sink;
        }
    }

    pub const fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    /// Whether a message at `level` would currently be emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Device currently tagged on each line, if any.
    pub const fn context(&self) -> Option<usize> {
        self.context
    }

    /// Tag subsequent lines with device `id`, remembering the current tag.
    pub fn set_context(&mut self, id: usize) {
        self.previous_context = self.context;
        self.context = Some(id);
    }

    /// Drop the device tag, remembering the current one.
    pub fn reset_context(&mut self) {
        self.previous_context = self.context;
        self.context = None;
    }

    /// Bring back the tag that was current before the last set/reset.
    pub fn restore_context(&mut self) {
        self.context = self.previous_context;
    }

    /// Emit `args` at `level` if it passes the threshold.
    pub fn log(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let Some(message) = render(args) else {
            self.sink.emit_at(Some(level), FORMAT_ERROR_LINE);
            return;
        };

        let line = match self.context {
            Some(pd) => format!("{LINE_PREFIX}: {}: PD[{pd}]: {message}", level.name()),
            None => format!("{LINE_PREFIX}: {}: {message}", level.name()),
        };
        if self.sink.supports_color() {
            let colored = format!("{}{line}{RESET}", level.color());
            self.sink.emit_at(Some(level), &colored);
        } else {
            self.sink.emit_at(Some(level), &line);
        }
    }

    /// Emit `args` regardless of threshold, without level tag, device tag or
    /// colour.
    pub fn log_raw(&mut self, args: fmt::Arguments<'_>) {
        match render(args) {
            Some(message) => self.sink.emit_at(None, &format!("{LINE_PREFIX}: {message}")),
            None => self.sink.emit_at(None, FORMAT_ERROR_LINE),
        }
    }
}

fn render(args: fmt::Arguments<'_>) -> Option<String> {
    let mut message = String::new();
    fmt::write(&mut message, args).ok()?;
    Some(message)
}

/// Log through a [`Logger`] with `format!` syntax.
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use osdp_core::logger::{LogLevel, Logger};
/// use osdp_core::osdp_log;
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&lines);
/// let mut log = Logger::with_sink(LogLevel::Info, move |l: &str| {
///     sink.lock().unwrap().push(l.to_owned());
/// });
/// log.set_context(2);
/// osdp_log!(log, LogLevel::Info, "sequence {} acked", 3);
/// assert_eq!(*lines.lock().unwrap(), ["OSDP: INFO : PD[2]: sequence 3 acked"]);
/// ```
#[macro_export]
macro_rules! osdp_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::format_args!($($arg)+))
    };
}

//! Diagnostic and usage output
//!
//! Two implementations of one [`Logger`] trait, chosen at construction:
//!
//! - [`StructuredLogger`]: `LEVEL message key=value ...` lines rendered by a
//!   `tracing-subscriber` fmt subscriber, never with a timestamp.
//! - [`PlainLogger`]: the message text and a newline, nothing else. Used for
//!   usage/help text.
//!
//! Both write to stderr unless given another writer. Write failures are
//! ignored.

use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

/// One key/value attribute of a log line.
pub type Field<'a> = (&'a str, &'a dyn fmt::Display);

/// Leveled logging with optional key/value attributes.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str, fields: &[Field<'_>]);

    fn debug(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::DEBUG, message, fields)
    }

    fn info(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::INFO, message, fields)
    }

    fn warn(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::WARN, message, fields)
    }

    fn error(&self, message: &str, fields: &[Field<'_>]) {
        self.log(Level::ERROR, message, fields)
    }
}

/// Render a value, quoting it when it would not read back as one token.
fn format_value(value: &dyn fmt::Display) -> String {
    let raw = value.to_string();
    let needs_quotes =
        raw.is_empty() || raw.chars().any(|c| c.is_whitespace() || c == '=' || c == '"');
    if needs_quotes {
        format!("{raw:?}")
    } else {
        raw
    }
}

/// `message key=value key=value`
pub fn render_line(message: &str, fields: &[Field<'_>]) -> String {
    let mut line = String::from(message);
    for (key, value) in fields {
        let _ = write!(line, " {}={}", key, format_value(*value));
    }
    line
}

/// `LEVEL message key=value` with nothing before the level.
///
/// The fmt default right-aligns the level and adds time and target.
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{} ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Key/value log lines without timestamps.
pub struct StructuredLogger {
    dispatch: Dispatch,
}

impl StructuredLogger {
    pub fn new<W>(level: Level, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_max_level(level)
            .with_ansi(false)
            .event_format(LineFormat)
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn stderr(level: Level) -> Self {
        Self::new(level, io::stderr)
    }

    /// The underlying dispatcher, e.g. to install it process-wide.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

impl Logger for StructuredLogger {
    fn log(&self, level: Level, message: &str, fields: &[Field<'_>]) {
        let line = render_line(message, fields);
        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Level::ERROR => tracing::error!("{}", line),
            Level::WARN => tracing::warn!("{}", line),
            Level::INFO => tracing::info!("{}", line),
            Level::DEBUG => tracing::debug!("{}", line),
            _ => tracing::trace!("{}", line),
        });
    }
}

/// Message-only lines for usage and help text.
pub struct PlainLogger {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl PlainLogger {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl Logger for PlainLogger {
    fn log(&self, _level: Level, message: &str, _fields: &[Field<'_>]) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", message);
        }
    }
}

/// In-memory writer usable by both loggers, for capturing output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fields_when_rendered_then_key_value_pairs_follow_message() {
        let dir = "/tmp/repo";
        let count = 3;
        let line = render_line("Found", &[("dir", &dir), ("count", &count)]);
        assert_eq!(line, "Found dir=/tmp/repo count=3");
    }

    #[test]
    fn given_values_with_spaces_when_rendered_then_quoted() {
        let line = render_line("failed", &[("error", &"no such file"), ("empty", &"")]);
        assert_eq!(line, r#"failed error="no such file" empty="""#);
    }

    #[test]
    fn given_structured_logger_when_logging_then_level_message_fields_without_time() {
        let sink = SharedBuffer::new();
        let log = StructuredLogger::new(Level::TRACE, sink.clone());

        log.info("Detecting project types", &[("dir", &".")]);
        log.error("boom", &[]);
        log.debug("detail", &[]);
        log.log(Level::TRACE, "fine", &[]);

        let out = sink.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4, "{out}");
        assert_eq!(lines[0], "INFO Detecting project types dir=.");
        assert_eq!(lines[1], "ERROR boom");
        assert_eq!(lines[2], "DEBUG detail");
        assert_eq!(lines[3], "TRACE fine");
        assert!(!out.contains("time="));
    }

    #[test]
    fn given_info_level_when_debug_logged_then_suppressed() {
        let sink = SharedBuffer::new();
        let log = StructuredLogger::new(Level::INFO, sink.clone());

        log.debug("hidden", &[]);
        log.warn("shown", &[]);

        let out = sink.contents();
        assert!(!out.contains("hidden"));
        assert_eq!(out, "WARN shown\n");
    }

    #[test]
    fn given_plain_logger_when_logging_then_message_only() {
        let sink = SharedBuffer::new();
        let log = PlainLogger::new(sink.clone());

        log.info("Usage: reposync [flags] <command>", &[("ignored", &1)]);
        log.error("Commands:", &[]);

        assert_eq!(sink.contents(), "Usage: reposync [flags] <command>\nCommands:\n");
    }
}

//! Logging setup
//!
//! Events are written to stdout as runner workflow commands so that warnings
//! and errors show up as annotations. An optional plain-text log file can be
//! written alongside.

use clap::ValueEnum;
use std::path::Path;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// `RUST_LOG` when set, otherwise this level for our own targets only
    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,apimap_sync={}", self.as_str())))
    }
}

/// Render events as workflow commands
pub struct WorkflowCommands;

impl<S, N> FormatEvent<S, N> for WorkflowCommands
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        let line = match *event.metadata().level() {
            Level::ERROR => pipeline::command("error", &message),
            Level::WARN => pipeline::command("warning", &message),
            Level::INFO => message,
            _ => pipeline::command("debug", &message),
        };
        writeln!(writer, "{}", line)
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so the log file is flushed.
pub fn init(level: LogLevel, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(WorkflowCommands)
        .with_writer(std::io::stdout)
        .with_filter(level.filter());

    let (file_layer, guard) = match log_file.and_then(|path| Some((path.parent()?, path.file_name()?))) {
        Some((dir, file_name)) => {
            let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(level.filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file {
        tracing::info!("Log file: {:?}", path);
    }

    guard
}

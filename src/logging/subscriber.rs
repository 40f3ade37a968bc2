//! Tracing subscriber: a compact stderr formatter plus a per-command log file.
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::utils::{FILTER_ENV, local_datetime, local_time, log_file_path, rotate, strip_ansi};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "deskutil::stage";

/// Collects an event's message and any extra fields other than `command`.
#[derive(Default)]
struct EventText {
    message: String,
    fields: String,
}

impl EventText {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut text = Self::default();
        event.record(&mut text);
        text
    }

    fn line(&self) -> String {
        if self.fields.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, self.fields.trim_start())
        }
    }
}

impl Visit for EventText {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "command" => {}
            name => {
                let _ = write!(self.fields, " {name}={value:?}");
            }
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.record_debug(field, &value);
        }
    }
}

/// Layer appending every event to `<command>.log` as plain text.
///
/// The previous run is kept as `<command>.log.1`.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Start a fresh log for `command` with a run header.
    ///
    /// Returns `None` when the cache directory or file is unusable; logging
    /// then goes to the console only.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        rotate(&path);
        let version =
            option_env!("DESKUTIL_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let mut file = fs::File::create(&path).ok()?;
        writeln!(
            file,
            "# deskutil {version} {command} pid {} started {}",
            std::process::id(),
            local_datetime(),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let msg = strip_ansi(&EventText::of(event).line());
        let tag = match (*metadata.level(), metadata.target()) {
            (Level::INFO, STAGE_TARGET) => "==>",
            (Level::ERROR, _) => "ERR",
            (Level::WARN, _) => "WRN",
            (Level::INFO, _) => "   ",
            _ => "dbg",
        };
        if let Ok(mut f) = self.file.lock() {
            let _ = writeln!(f, "{} {tag} {msg}", local_time());
        }
    }
}

/// Console formatter: colored level markers, no timestamps.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let msg = EventText::of(event).line();
        match *metadata.level() {
            Level::ERROR => writeln!(writer, "\x1b[31merror:\x1b[0m {msg}"),
            Level::WARN => writeln!(writer, "\x1b[33mwarning:\x1b[0m {msg}"),
            Level::INFO if metadata.target() == STAGE_TARGET => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for `command`.
///
/// The console (stderr) shows warnings and errors, or everything down to
/// `debug` with `verbose`. `DESKUTIL_LOG` takes an `EnvFilter` directive
/// and overrides both. The log file always records `debug` and above.
/// Call once, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(FILTER_ENV)
        .from_env_lossy();

    let console_layer = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use super::types::MessageKind;
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "dotfiles::stage";
/// Target used for dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "dotfiles::dry_run";

/// Pulls the `message` field out of an event.
#[derive(Default)]
struct MessageText(String);

impl tracing::field::Visit for MessageText {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }
}

/// Map an event back to the [`MessageKind`] that produced it.
///
/// Events from other crates land on `Info` or `Debug` by level.
fn classify(event: &tracing::Event<'_>) -> (MessageKind, String) {
    let metadata = event.metadata();
    let kind = match (*metadata.level(), metadata.target()) {
        (tracing::Level::ERROR, _) => MessageKind::Error,
        (tracing::Level::WARN, _) => MessageKind::Warn,
        (tracing::Level::INFO, STAGE_TARGET) => MessageKind::Stage,
        (tracing::Level::INFO, DRY_RUN_TARGET) => MessageKind::DryRun,
        (tracing::Level::INFO, _) => MessageKind::Info,
        _ => MessageKind::Debug,
    };
    let mut text = MessageText::default();
    event.record(&mut text);
    (kind, text.0)
}

/// Plain-text line for the install log, without the timestamp.
fn file_line(kind: MessageKind, msg: &str) -> String {
    match kind {
        MessageKind::Stage => format!("==> {msg}"),
        MessageKind::Info => format!("    {msg}"),
        MessageKind::Debug => format!("    [debug] {msg}"),
        MessageKind::Warn => format!("    [warn] {msg}"),
        MessageKind::Error => format!("    [error] {msg}"),
        MessageKind::DryRun => format!("    [dry run] {msg}"),
    }
}

/// Coloured console line.
fn console_line(kind: MessageKind, msg: &str) -> String {
    match kind {
        MessageKind::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        MessageKind::Info => format!("  {msg}"),
        MessageKind::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        MessageKind::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        MessageKind::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
        MessageKind::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the install
/// log with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the default install log, write a run header, and return a layer
    /// ready to receive events.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new() -> Option<Self> {
        Self::open(&log_file_path()?)
    }

    /// Truncate `path`, write a run header, and return a layer appending to it.
    pub(super) fn open(path: &Path) -> Option<Self> {
        let header = format!(
            "==========================================\n\
             Dotfiles installer {} {}\n\
             ==========================================\n",
            crate::VERSION,
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
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
        let (kind, msg) = classify(event);
        let line = format!(
            "[{}] {}",
            format_utc_time(),
            file_line(kind, &strip_ansi(&msg))
        );

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console [`FormatEvent`](tracing_subscriber::fmt::FormatEvent) for installer output.
struct InstallFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for InstallFormatter
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
        let (kind, msg) = classify(event);
        writeln!(writer, "{}", console_line(kind, &msg))
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (INFO and below) and stderr (WARN and
/// above), at DEBUG when `verbose` is set. Every event at DEBUG and above is
/// also appended to `$XDG_CACHE_HOME/dotfiles/install.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(InstallFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new().map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

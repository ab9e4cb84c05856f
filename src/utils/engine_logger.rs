use std::collections::VecDeque;
use std::env;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format with timestamp, level, target, and message
    Text,
    /// JSON format with structured fields: timestamp, level, target, message
    Json,
}

impl LogFormat {
    /// Parses `text` or `json` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }

    /// Reads `CURRY_LOG_FORMAT` or returns the default Text format
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use curry_engine::utils::engine_logger::LogFormat;
    ///
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Text); // default
    /// std::env::set_var("CURRY_LOG_FORMAT", "json");
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Json);
    /// ```
    pub fn from_env_or_default() -> Self {
        env::var("CURRY_LOG_FORMAT")
            .ok()
            .and_then(|s| Self::parse(&s))
            .unwrap_or(LogFormat::Text)
    }
}

/// Logging configuration gathered from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Format of captured log lines
    pub format: LogFormat,
    /// `EnvFilter` directives, e.g. `curry_engine=trace`
    pub filter: String,
    /// Number of lines kept by the in-memory sink
    pub capture_capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".to_string(),
            capture_capacity: 256,
        }
    }
}

impl LoggingConfig {
    /// Builds the configuration from `CURRY_LOG_FORMAT`, `RUST_LOG` and
    /// `CURRY_LOG_CAPACITY`, loading a `.env` file first when one exists.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();
        Self {
            format: LogFormat::from_env_or_default(),
            filter: env::var(EnvFilter::DEFAULT_ENV).unwrap_or(defaults.filter),
            capture_capacity: env::var("CURRY_LOG_CAPACITY")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.capture_capacity),
        }
    }
}

/// Bounded in-memory buffer of formatted log lines.
///
/// When full, the oldest line is dropped.
#[derive(Clone)]
pub struct LogSink {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogSink {
    /// Creates a sink holding at most `capacity` lines; zero is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        LogSink {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Copies the buffered lines, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Removes and returns the buffered lines, oldest first.
    pub fn drain(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("capacity", &self.capacity)
            .field("len", &self.snapshot().len())
            .finish()
    }
}

/// Tracing layer that formats events into a [`LogSink`].
pub struct CaptureLayer {
    sink: LogSink,
    format: LogFormat,
}

impl CaptureLayer {
    pub fn new(sink: LogSink, format: LogFormat) -> Self {
        CaptureLayer { sink, format }
    }
}

impl<S> tracing_subscriber::Layer<S> for CaptureLayer
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.sink.push(format_log_event(event, self.format));
    }
}

#[cfg(feature = "datetime")]
fn timestamp() -> Option<String> {
    Some(
        chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string(),
    )
}

#[cfg(not(feature = "datetime"))]
fn timestamp() -> Option<String> {
    None
}

/// Formats a tracing event as a text line or a JSON object.
fn format_log_event(event: &tracing::Event<'_>, format: LogFormat) -> String {
    let metadata = event.metadata();
    let level = metadata.level();
    let target = metadata.target();

    let mut visitor = LogVisitor::default();
    event.record(&mut visitor);

    let message = if visitor.message.is_empty() {
        "[no message]".to_string()
    } else {
        visitor.message
    };

    match (format, timestamp()) {
        (LogFormat::Text, Some(ts)) => format!("[{}] {} [{}] {}", ts, level, target, message),
        (LogFormat::Text, None) => format!("{} [{}] {}", level, target, message),
        (LogFormat::Json, ts) => serde_json::json!({
            "timestamp": ts,
            "level": level.to_string(),
            "target": target,
            "message": message,
        })
        .to_string(),
    }
}

/// A visitor that extracts the message from a tracing event.
#[derive(Default)]
struct LogVisitor {
    message: String,
}

impl tracing::field::Visit for LogVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter { filter: String, reason: String },
}

static CAPTURE_SINK: OnceCell<LogSink> = OnceCell::new();

/// Initializes the global tracing subscriber and returns the sink that
/// captures its events.
///
/// Sets up:
/// - an `EnvFilter` built from `config.filter`
/// - a console `fmt` layer, JSON or text depending on `config.format`
/// - a [`CaptureLayer`] writing into a [`LogSink`] of `config.capture_capacity`
/// - the `log` → `tracing` bridge, so the engine's `log` records are seen
///
/// The first successful call installs everything; later calls only validate
/// their filter and return the installed sink.
pub fn init_logging(config: &LoggingConfig) -> Result<LogSink, LoggingError> {
    let env_filter =
        EnvFilter::try_new(&config.filter).map_err(|e| LoggingError::InvalidFilter {
            filter: config.filter.clone(),
            reason: e.to_string(),
        })?;

    let sink = CAPTURE_SINK.get_or_init(|| install(config, env_filter));
    Ok(sink.clone())
}

fn install(config: &LoggingConfig, env_filter: EnvFilter) -> LogSink {
    use tracing_log::LogTracer;
    use tracing_subscriber::fmt;

    let sink = LogSink::new(config.capture_capacity);
    let (json_layer, text_layer) = match config.format {
        LogFormat::Json => (Some(fmt::layer().json().with_target(true)), None),
        LogFormat::Text => (None, Some(fmt::layer().with_target(true))),
    };

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(CaptureLayer::new(sink.clone(), config.format))
        .with(json_layer)
        .with(text_layer)
        .try_init();

    if let Err(e) = result {
        log::debug!("tracing subscriber already initialized: {}", e);
    }
    // Bridge errors only mean a logger is already installed.
    let _ = LogTracer::init();

    sink
}

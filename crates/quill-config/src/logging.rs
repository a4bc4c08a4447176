use std::path::PathBuf;
use std::sync::{Mutex, Once};

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Level applied to targets outside `quill.*` when `level` is a bare level.
const DEPENDENCY_LEVEL: &str = "warn";

/// The `[logging]` table of `quill.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Either a bare level for the `quill.*` targets (`debug`, `warning`, ...)
    /// or a complete `EnvFilter` directive string used as-is.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Log file, opened in append mode. An unopenable file only disables this
    /// sink.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    /// `EnvFilter` directives for `level`.
    ///
    /// A bare level only raises or lowers the `quill.*` targets; dependencies
    /// stay at `warn`, so `level = "trace"` shows memo hits without flooding
    /// the output with third-party spans.
    pub fn directives(&self) -> String {
        let level = match self.level.trim() {
            "" => "info",
            level if level.eq_ignore_ascii_case("warning") => "warn",
            level => level,
        };
        match level.parse::<LevelFilter>() {
            Ok(filter) => {
                let filter = filter.to_string().to_ascii_lowercase();
                format!("{DEPENDENCY_LEVEL},quill={filter}")
            }
            Err(_) => level.to_owned(),
        }
    }

    pub fn level_is_valid(&self) -> bool {
        EnvFilter::try_new(self.directives()).is_ok()
    }

    /// Filter for [`init_tracing`]. A non-empty `RUST_LOG` is appended to the
    /// configured directives, so it can refine individual targets. Invalid
    /// directives degrade to the configured ones, then to `warn,quill=info`.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = self.directives();
        let rust_log = std::env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty());

        rust_log
            .and_then(|extra| EnvFilter::try_new(format!("{configured},{}", extra.trim())).ok())
            .or_else(|| EnvFilter::try_new(&configured).ok())
            .unwrap_or_else(|| EnvFilter::new(format!("{DEPENDENCY_LEVEL},quill=info")))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber described by `config`.
///
/// Safe to call multiple times; only the first call has an effect. Returns
/// whether this call installed the subscriber.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut installed = false;
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(std::io::sink);
        if config.stderr {
            // Debug builds go through `TestWriter` so the test harness captures it.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(std::io::stderr));
            }
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(Mutex::new(file)));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            installed = true;
            if file_open_failed {
                if let Some(path) = config.file.as_ref() {
                    tracing::warn!(
                        target: "quill.config",
                        path = %path.display(),
                        "failed to open log file; file logging disabled"
                    );
                }
            }
        }
    });
    installed
}

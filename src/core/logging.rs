//! Structured logging
//!
//! Installs the global tracing subscriber: JSON or text lines, written through a
//! non-blocking worker either to stdout or to a size-rotated log file.

use crate::core::config::{LogFormat, LogOutput, LoggingConfig};
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Keeps the background log writer alive; drop it only at shutdown
pub struct Logger {
    _guard: WorkerGuard,
}

impl Logger {
    /// Initialize the logging system based on configuration
    ///
    /// `RUST_LOG` takes precedence over the configured level when set.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let level = parse_log_level(&config.level)?;
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

        let (writer, guard) = match config.output {
            LogOutput::Stdout => tracing_appender::non_blocking(io::stdout()),
            LogOutput::File => {
                let log_file = config
                    .log_file
                    .as_ref()
                    .context("log_file must be specified when output is 'file'")?;
                let appender =
                    SizeRotatingFile::open(log_file, config.max_file_size, config.max_backups)?;
                tracing_appender::non_blocking(appender)
            }
        };

        let fmt_layer = match config.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true)
                .boxed(),
            LogFormat::Text => fmt::layer()
                .with_writer(writer)
                .with_ansi(config.output == LogOutput::Stdout)
                .with_target(true)
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize tracing subscriber")?;

        tracing::info!(
            level = %config.level,
            format = ?config.format,
            output = ?config.output,
            "Logging system initialized"
        );

        Ok(Logger { _guard: guard })
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    level
        .parse::<Level>()
        .map_err(|_| anyhow::anyhow!("Invalid log level: {}", level))
}

/// Log file that is renamed to `<name>.1`, `<name>.2`, ... once it grows past a size limit
pub struct SizeRotatingFile {
    path: PathBuf,
    max_file_size: u64,
    max_backups: usize,
    file: File,
    written: u64,
}

impl SizeRotatingFile {
    pub fn open(path: &Path, max_file_size: u64, max_backups: usize) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }

        let file = open_append(path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        let written = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            max_file_size,
            max_backups,
            file,
            written,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        // Oldest backup falls off the end
        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for SizeRotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_file_size {
            self.rotate()?;
        }

        let written = self.file.write(buf)?;
        self.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

//! Tracing setup: human-readable logs on stdout plus a size-rotated log file.
//!
//! File lines look like `[2024-05-01 12:00:00] [INFO    ] asdana::bot: Bot stopped`.

use chrono::Local;
use std::{
    ffi::OsString,
    fmt,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{Event, Subscriber, info, warn};
use tracing_subscriber::{
    EnvFilter,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Log file written in the working directory.
pub const LOG_FILE_NAME: &str = "discord.log";
/// Size at which the log file is rotated.
pub const MAX_LOG_BYTES: u64 = 32 * 1024 * 1024;
/// Rotated files kept next to the live one (`discord.log.1` .. `discord.log.5`).
pub const LOG_BACKUPS: usize = 5;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level`. If the log file cannot be opened, logging
/// continues on stdout only.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file, file_error) = match RotatingFile::open(LOG_FILE_NAME, MAX_LOG_BYTES, LOG_BACKUPS) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };
    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .event_format(FileFormat)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    match file_error {
        None => info!("File logging enabled: {LOG_FILE_NAME}"),
        Some(e) => warn!("File logging disabled, could not open {LOG_FILE_NAME}: {e}"),
    }
}

/// `[time] [LEVEL   ] target: message`, one event per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFormat;

impl<S, N> FormatEvent<S, N> for FileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(
            writer,
            "[{}] [{:<8}] {}: ",
            Local::now().format(TIME_FORMAT),
            metadata.level().as_str(),
            metadata.target()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Append-only file that rolls over once it would exceed `max_bytes`.
///
/// On rollover `name.N` becomes `name.N+1`, the oldest backup is dropped and
/// the live file becomes `name.1`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    backups: usize,
}

impl RotatingFile {
    /// Opens (or creates) `path` for appending.
    pub fn open(path: impl AsRef<Path>, max_bytes: u64, backups: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            written,
            max_bytes,
            backups,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backups > 0 {
            match fs::remove_file(self.backup_path(self.backups)) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
                _ => {}
            }
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{LevelFilter, Log, Metadata, Record};

enum Target {
    File(Mutex<File>),
    Stderr,
}

struct NormalizerLogger {
    target: Target,
    level: LevelFilter,
}

impl NormalizerLogger {
    fn new(log_file: Option<&Path>, level: LevelFilter) -> io::Result<Self> {
        let target = match log_file {
            Some(file_path) => {
                // Create parent directories if they don't exist
                if let Some(parent) = file_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(file_path)?;
                Target::File(Mutex::new(file))
            }
            None => Target::Stderr,
        };

        Ok(NormalizerLogger { target, level })
    }

    fn format(record: &Record) -> String {
        format!(
            "[{}] [{}] {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    }
}

impl Log for NormalizerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format(record);
        match &self.target {
            Target::File(file) => {
                if let Ok(mut file) = file.lock() {
                    let _ = writeln!(file, "{}", line);
                    let _ = file.flush();
                }
            }
            Target::Stderr => {
                let _ = writeln!(io::stderr(), "{}", line);
            }
        }
    }

    fn flush(&self) {
        if let Target::File(file) = &self.target {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Initialize the logger, writing to `log_file` (overwriting previous logs) or to stderr
pub fn init_logger(log_file: Option<&Path>, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    let logger = NormalizerLogger::new(log_file, level)?;

    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(level))?;

    Ok(())
}

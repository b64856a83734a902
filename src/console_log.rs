use std::sync::mpsc::Sender;

use anyhow::{Result, anyhow};
use log::{LevelFilter, Log, Metadata, Record};

use crate::state::Delta;

/// Routes `log` records into the dashboard console as `Delta::Log` lines.
pub struct ConsoleLogger {
    tx: Sender<Delta>,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(tx: Sender<Delta>, level: LevelFilter) -> Self {
        Self { tx, level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        // The UI may already be gone during shutdown.
        let _ = self.tx.send(Delta::Log(line));
    }

    fn flush(&self) {}
}

/// Install the console logger as the global `log` sink.
pub fn init(tx: Sender<Delta>, level: LevelFilter) -> Result<()> {
    log::set_boxed_logger(Box::new(ConsoleLogger::new(tx, level)))
        .map_err(|err| anyhow!("logger already installed: {err}"))?;
    log::set_max_level(level);
    Ok(())
}

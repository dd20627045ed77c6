//! Rotating Log Sink: größenbegrenzte Log-Datei mit nummerierten Backups

use crate::logging::formatter::Formatter;
use crate::traits::{LogSink, LogStore, StoreError};
use crate::types::{Level, LogRecord, SinkConfig};

/// Zeilenende jedes Eintrags
const TERMINATOR: char = '\n';

/// Hängt formatierte Zeilen an die aktive Datei und rotiert vor dem Überlauf
///
/// Rotation wird VOR dem Schreiben geprüft: die aktive Datei überschreitet
/// `max_bytes` höchstens um eine Zeile. Fehler beim Umbenennen/Löschen werden
/// geschluckt, nur Schreibfehler gehen an den Aufrufer.
///
/// Nur eine Instanz pro Pfad, kein gleichzeitiger Zugriff.
pub struct RotatingFileSink<S: LogStore> {
    store: S,
    config: SinkConfig,
    formatter: Formatter,
    level: Level,
    current_size: u64,
}

impl<S: LogStore> RotatingFileSink<S> {
    /// Übernimmt die Größe einer bereits existierenden Datei (sonst 0)
    pub fn new(mut store: S, config: SinkConfig, formatter: Formatter) -> Self {
        let current_size = store.size(&config.path).ok().flatten().unwrap_or(0);
        Self {
            store,
            config,
            formatter,
            level: Level::Debug,
            current_size,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Bytes seit Start bzw. letzter Rotation
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn should_rollover(&self, line_len: u64) -> bool {
        self.config.max_bytes > 0
            && self.current_size.saturating_add(line_len) > self.config.max_bytes
    }

    /// Generation i → i+1 (älteste zuerst), ohne Backups wird gelöscht
    fn do_rollover(&mut self) {
        if self.config.backup_count > 0 {
            for generation in (0..self.config.backup_count).rev() {
                let from = self.config.generation_path(generation);
                let to = self.config.generation_path(generation + 1);
                let _ = self.store.rename(&from, &to);
            }
        } else {
            let _ = self.store.remove(&self.config.path);
        }
        self.current_size = 0;
    }
}

impl<S: LogStore> LogSink for RotatingFileSink<S> {
    fn emit(&mut self, record: &LogRecord) -> Result<(), StoreError> {
        if record.level < self.level {
            return Ok(());
        }

        let mut line = self.formatter.format(record);
        line.push(TERMINATOR);
        let line_len = line.len() as u64;

        if self.should_rollover(line_len) {
            self.do_rollover();
        }

        self.store.append(&self.config.path, line.as_bytes())?;
        self.current_size += line_len;
        Ok(())
    }
}

//! Logger-Fassade: erzeugt LogRecords und verteilt sie an alle Sinks

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

use crate::traits::{Clock, LogSink, StoreError};
use crate::types::{Level, LogRecord};

/// Benannter Logger mit eigenem Mindest-Level
///
/// Jeder Record geht synchron, in Reihenfolge des Anhängens, an jeden Sink.
/// Jeder Sink filtert zusätzlich mit seinem eigenen Level.
pub struct Logger {
    name: &'static str,
    level: Level,
    clock: Box<dyn Clock>,
    epoch_offset_ms: u64,
    sinks: Vec<Box<dyn LogSink>>,
}

impl Logger {
    /// Neuer Logger ohne Sinks, Level DEBUG
    pub fn new(name: &'static str, clock: impl Clock + 'static) -> Self {
        Self {
            name,
            level: Level::Debug,
            clock: Box::new(clock),
            epoch_offset_ms: 0,
            sinks: Vec::new(),
        }
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn add_sink(&mut self, sink: impl LogSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Abbildung monotone Uhr → Wall-Clock: `timestamp = now_ms + offset`
    pub fn set_epoch_offset_ms(&mut self, offset_ms: u64) {
        self.epoch_offset_ms = offset_ms;
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Erzeugt einen Record und reicht ihn an alle Sinks weiter
    ///
    /// Ein fehlschlagender Sink hält die übrigen nicht auf.
    /// Der erste Schreibfehler wird zurückgegeben.
    pub fn log(&mut self, level: Level, args: fmt::Arguments<'_>) -> Result<(), StoreError> {
        if !self.is_enabled_for(level) {
            return Ok(());
        }

        let record = LogRecord {
            timestamp_ms: self.clock.now_ms().saturating_add(self.epoch_offset_ms),
            level,
            name: self.name,
            message: args.to_string(),
        };

        let mut result = Ok(());
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.emit(&record) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    pub fn debug(&mut self, args: fmt::Arguments<'_>) -> Result<(), StoreError> {
        self.log(Level::Debug, args)
    }

    pub fn info(&mut self, args: fmt::Arguments<'_>) -> Result<(), StoreError> {
        self.log(Level::Info, args)
    }

    pub fn warning(&mut self, args: fmt::Arguments<'_>) -> Result<(), StoreError> {
        self.log(Level::Warning, args)
    }

    pub fn error(&mut self, args: fmt::Arguments<'_>) -> Result<(), StoreError> {
        self.log(Level::Error, args)
    }
}

// Application-Logging: Logger mit Konsolen- und Flash-Sink
use defmt::{debug, error, info, warn};
use esp_core::flash_store::FlashLogStore;
use esp_core::{
    Formatter, Level, LogRecord, LogSink, Logger, RotatingFileSink, SinkConfig, StoreError,
};
use esp_storage::FlashStorage;

use crate::config::{
    FILELOG_BACKUP_COUNT, FILELOG_FILENAME, FILELOG_MAX_BYTES, LOG_FLASH_OFFSET, LOG_SLOT_SIZE,
    LOGGER_NAME,
};
use crate::hal::EmbassyClock;

/// Log-Datei im SPI-Flash
pub type FileSink = RotatingFileSink<FlashLogStore<FlashStorage<'static>>>;

/// Konsolen-Sink: formatierte Zeile über defmt (esp-println)
pub struct DefmtSink {
    level: Level,
    formatter: Formatter,
}

impl DefmtSink {
    pub fn new(level: Level, formatter: Formatter) -> Self {
        Self { level, formatter }
    }
}

impl LogSink for DefmtSink {
    fn emit(&mut self, record: &LogRecord) -> Result<(), StoreError> {
        if record.level < self.level {
            return Ok(());
        }

        let line = self.formatter.format(record);
        match record.level {
            Level::Debug => debug!("{=str}", line.as_str()),
            Level::Info => info!("{=str}", line.as_str()),
            Level::Warning => warn!("{=str}", line.as_str()),
            Level::Error => error!("{=str}", line.as_str()),
        }
        Ok(())
    }
}

/// Mountet den Log-Bereich und erstellt die rotierende Log-Datei (INFO+)
pub fn file_sink(flash: FlashStorage<'static>) -> Result<FileSink, StoreError> {
    let slots = FILELOG_BACKUP_COUNT as usize + 1;
    let store = FlashLogStore::new(flash, LOG_FLASH_OFFSET, LOG_SLOT_SIZE, slots)?;

    let config = SinkConfig::new(FILELOG_FILENAME, FILELOG_MAX_BYTES, FILELOG_BACKUP_COUNT);
    Ok(RotatingFileSink::new(store, config, Formatter::default()).with_level(Level::Info))
}

/// Logger "led_controller": Konsole ab DEBUG, Flash ab INFO
///
/// Ohne nutzbaren Flash-Bereich wird nur auf die Konsole geloggt.
///
/// Es gibt keine Uhrzeit-Synchronisation: der Epoch-Offset bleibt 0,
/// `asctime` zeigt daher 1970-01-01 plus Laufzeit seit dem Boot.
pub fn init_logger(flash: FlashStorage<'static>) -> Logger {
    let mut logger = Logger::new(LOGGER_NAME, EmbassyClock);
    logger.set_level(Level::Debug);
    logger.add_sink(DefmtSink::new(Level::Debug, Formatter::default()));

    match file_sink(flash) {
        Ok(sink) => {
            info!(
                "Log: {} on flash, {} bytes written",
                FILELOG_FILENAME,
                sink.current_size()
            );
            logger.add_sink(sink);
        }
        Err(e) => error!("Log: Flash store unavailable: {}", e),
    }
    logger
}

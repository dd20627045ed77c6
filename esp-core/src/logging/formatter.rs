//! Log Formatter: LogRecord → eine Textzeile

use alloc::string::String;
use core::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::types::LogRecord;

/// Standard-Template: Zeit, Level, Nachricht
pub const DEFAULT_TEMPLATE: &str = "{asctime} {levelname} {message}";

/// Standard-Datumsformat (chrono strftime Syntax)
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formatiert Records über ein Template mit benannten Feldern
///
/// Felder: `{name}`, `{message}`, `{levelname}`, `{asctime}`, `{msecs}`.
/// Unbekannte Platzhalter bleiben unverändert stehen.
///
/// # Beispiele
///
/// ```
/// # use esp_core::{Formatter, Level, LogRecord};
/// let formatter = Formatter::new("{levelname}:{name}:{message}", "%H:%M");
/// let record = LogRecord {
///     timestamp_ms: 0,
///     level: Level::Info,
///     name: "led_controller",
///     message: "ready".into(),
/// };
/// assert_eq!(formatter.format(&record), "INFO:led_controller:ready");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: String,
    date_format: String,
    utc_offset: FixedOffset,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, DEFAULT_DATE_FORMAT)
    }
}

impl Formatter {
    pub fn new(template: &str, date_format: &str) -> Self {
        Self {
            template: String::from(template),
            date_format: String::from(date_format),
            utc_offset: Utc.fix(),
        }
    }

    /// Lokale Zeitzone als fester Offset zu UTC (Minuten, östlich positiv)
    ///
    /// Ungültige Offsets (|offset| >= 24h) fallen auf UTC zurück.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or(Utc.fix());
        self
    }

    /// Referenziert das Template die Zeit?
    pub fn uses_time(&self) -> bool {
        self.template.contains("{asctime}")
    }

    /// Rendert einen Unix-Zeitstempel (ms) mit dem Datumsformat in lokaler Zeit
    pub fn format_time(&self, timestamp_ms: u64) -> String {
        let mut out = String::new();
        let Some(utc) = i64::try_from(timestamp_ms)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
        else {
            return out;
        };

        let local = utc.with_timezone(&self.utc_offset);
        // chrono meldet ungültige Format-Spezifizierer als fmt::Error
        if write!(out, "{}", local.format(&self.date_format)).is_err() {
            out.clear();
        }
        out
    }

    pub fn format(&self, record: &LogRecord) -> String {
        let asctime = if self.uses_time() {
            self.format_time(record.timestamp_ms)
        } else {
            String::new()
        };

        let mut out = String::with_capacity(self.template.len() + record.message.len() + 24);
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open..];

            let Some(close) = after.find('}') else {
                out.push_str(after);
                return out;
            };

            let field = &after[1..close];
            match field {
                "name" => out.push_str(record.name),
                "message" => out.push_str(&record.message),
                "levelname" => out.push_str(record.level.name()),
                "asctime" => out.push_str(&asctime),
                "msecs" => {
                    let _ = write!(out, "{:03}", record.timestamp_ms % 1000);
                }
                _ => out.push_str(&after[..=close]),
            }
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        out
    }
}

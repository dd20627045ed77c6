//! Core Types für Logging, Retry und Schaltzustand
//!
//! Datenstrukturen ohne Hardware-Dependencies

use alloc::string::String;
use core::fmt;

/// Log-Level, geordnet: DEBUG < INFO < WARNING < ERROR
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    /// Name wie er im `{levelname}` Feld erscheint
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logischer Zustand des Eingangs-Pins bzw. Soll-Zustand des LED-Strips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    Off,
    On,
}

impl SwitchState {
    /// High-Pegel → On, Low-Pegel → Off
    pub const fn from_level(high: bool) -> Self {
        if high { SwitchState::On } else { SwitchState::Off }
    }

    /// Wert der in das Payload-Template injiziert wird ("on" / "off")
    pub const fn as_str(self) -> &'static str {
        match self {
            SwitchState::On => "on",
            SwitchState::Off => "off",
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ein einzelner Log-Eintrag
///
/// Wird pro Log-Aufruf erzeugt und synchron an alle Sinks gereicht.
/// Danach nie mehr verändert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Wall-Clock Zeitpunkt in Millisekunden seit Unix-Epoche
    pub timestamp_ms: u64,
    pub level: Level,
    /// Name des Loggers (`{name}` Feld)
    pub name: &'static str,
    pub message: String,
}

/// Konfiguration einer rotierenden Log-Datei
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Name der aktiven Datei im Log-Store
    pub path: String,
    /// Größenbudget in Bytes, 0 = unbegrenzt (keine Rotation)
    pub max_bytes: u64,
    /// Anzahl aufbewahrter Generationen, 0 = aktive Datei wird gelöscht statt umbenannt
    pub backup_count: u32,
}

impl SinkConfig {
    pub fn new(path: &str, max_bytes: u64, backup_count: u32) -> Self {
        Self {
            path: String::from(path),
            max_bytes,
            backup_count,
        }
    }

    /// Dateiname einer Generation: 0 = aktive Datei, k > 0 = `<path>.k`
    pub fn generation_path(&self, generation: u32) -> String {
        if generation == 0 {
            self.path.clone()
        } else {
            alloc::format!("{}.{}", self.path, generation)
        }
    }
}

/// Retry-Policy des Notifiers: feste Anzahl Versuche mit konstanter Wartezeit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    max_attempts: u32,
    retry_interval_ms: u64,
}

impl RetryPolicy {
    /// `max_attempts` wird auf mindestens 1 angehoben
    pub const fn new(max_attempts: u32, retry_interval_ms: u64) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            retry_interval_ms,
        }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn retry_interval_ms(&self) -> u64 {
        self.retry_interval_ms
    }
}

impl Default for RetryPolicy {
    /// 3 Versuche, 500 ms Pause
    fn default() -> Self {
        Self::new(3, 500)
    }
}

/// Antwort des Remote-Endpunkts (beliebiger Status-Code)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn test_generation_path() {
        let config = SinkConfig::new("led_controller.log", 1024, 2);
        assert_eq!(config.generation_path(0), "led_controller.log");
        assert_eq!(config.generation_path(2), "led_controller.log.2");
    }

    #[test]
    fn test_retry_policy_minimum_one_attempt() {
        assert_eq!(RetryPolicy::new(0, 10).max_attempts(), 1);
        assert_eq!(RetryPolicy::default().max_attempts(), 3);
        assert_eq!(RetryPolicy::default().retry_interval_ms(), 500);
    }
}

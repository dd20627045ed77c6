//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware- und Netzwerk-Zugriff
//! ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** esp-firmware (`hal`, `net`, `logging`)
//! - **Testing:** Mocks in esp-tests (`tests/common/mod.rs`)

use alloc::string::String;
use core::fmt;
use rgb::RGB8;

use crate::blink::BlinkPattern;
use crate::config::WifiCredentials;
use crate::http::Request;
use crate::types::{LogRecord, Response};

// ============================================================================
// LED
// ============================================================================

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf die Status-LED (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

/// Blink-Treiber: setzt das aktuelle Muster, der letzte Aufruf gewinnt
///
/// Der Treiber läuft unabhängig vom Aufrufer (eigener Task / Timer),
/// `set_pattern` blockiert nie.
pub trait Blinker {
    fn set_pattern(&mut self, pattern: BlinkPattern);
}

// ============================================================================
// Log Store
// ============================================================================

/// Fehler-Typ für Log-Store Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Datei existiert nicht
    NotFound,
    /// Kein freier Slot bzw. Slot voll
    Full,
    /// Daten enthalten 0xFF (reserviert als "gelöscht"-Marker)
    InvalidData,
    /// Dateiname länger als der Store erlaubt
    NameTooLong,
    /// Flash-Zugriff fehlgeschlagen
    Io,
    /// Geometrie des Flash-Bereichs ungültig
    Geometry,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StoreError::NotFound => "file not found",
            StoreError::Full => "store full",
            StoreError::InvalidData => "invalid data",
            StoreError::NameTooLong => "file name too long",
            StoreError::Io => "flash I/O error",
            StoreError::Geometry => "invalid flash geometry",
        };
        f.write_str(text)
    }
}

/// Append-only, byte-orientierter persistenter Speicher mit Dateinamen
///
/// Überlebt Neustarts. Unterstützt stat (Größe), rename und delete.
pub trait LogStore {
    /// Aktuelle Größe der Datei, `None` wenn sie nicht existiert
    fn size(&mut self, path: &str) -> Result<Option<u64>, StoreError>;

    /// Hängt Bytes an (legt die Datei an falls nötig), durable vor Rückkehr
    fn append(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Benennt um, ein existierendes Ziel wird ersetzt
    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError>;

    fn remove(&mut self, path: &str) -> Result<(), StoreError>;
}

/// Empfänger von Log-Records mit eigenem Mindest-Level
pub trait LogSink {
    fn emit(&mut self, record: &LogRecord) -> Result<(), StoreError>;
}

// ============================================================================
// Zeit
// ============================================================================

/// Monotone Uhr in Millisekunden seit Boot
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Blockierende (aus Sicht des Aufrufers) Wartezeit
#[allow(async_fn_in_trait)]
pub trait Delay {
    async fn delay_ms(&mut self, ms: u64);
}

// ============================================================================
// GPIO / System
// ============================================================================

/// Digitaler Eingang, der den Schaltzustand liefert
pub trait InputPin {
    fn is_high(&mut self) -> bool;
}

/// Physischer Taster (gepollt, nicht interrupt-getrieben)
pub trait Button {
    fn is_asserted(&mut self) -> bool;
}

/// Kompletter Geräte-Neustart, kehrt nie zurück
pub trait Restart {
    fn restart(&mut self) -> !;
}

// ============================================================================
// Netzwerk
// ============================================================================

/// Fehler-Typ für Netzwerk- und Request-Fehler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    NotConnected,
    DnsResolutionFailed,
    ConnectionFailed,
    Io,
    Timeout,
    UnsupportedScheme,
    /// TLS-Handshake oder verschlüsselter Datenaustausch fehlgeschlagen
    Tls,
    InvalidUrl,
    InvalidResponse,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransportError::NotConnected => "network not connected",
            TransportError::DnsResolutionFailed => "DNS resolution failed",
            TransportError::ConnectionFailed => "connection failed",
            TransportError::Io => "socket I/O error",
            TransportError::Timeout => "timeout",
            TransportError::UnsupportedScheme => "unsupported URL scheme",
            TransportError::Tls => "TLS error",
            TransportError::InvalidUrl => "invalid URL",
            TransportError::InvalidResponse => "invalid HTTP response",
        };
        f.write_str(text)
    }
}

/// WLAN-Verbindung
#[allow(async_fn_in_trait)]
pub trait Connectivity {
    fn is_connected(&self) -> bool;

    /// Verbindet und wartet ohne Timeout bis Link + IP-Adresse vorhanden sind
    async fn connect(&mut self, credentials: &WifiCredentials) -> Result<(), TransportError>;

    /// Aktuelle IPv4-Adresse (nur für Logging)
    fn address(&self) -> Option<String>;
}

/// HTTP-Transport: liefert jede empfangene Antwort, Fehler nur auf Transport-Ebene
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn submit(&mut self, request: &Request<'_>) -> Result<Response, TransportError>;
}

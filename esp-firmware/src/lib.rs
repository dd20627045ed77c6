// Library-Root: Hardware-Implementierungen der esp-core Traits und Tasks
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod logging;
pub mod net;
pub mod tasks;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use esp_core::{BlinkPattern, WifiCredentials};

/// Inhalt von config.json, zur Build-Zeit eingebettet (leer wenn die Datei fehlte)
pub static CONFIG_JSON: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/config.json"));

// ============================================================================
// Type-Aliase für Signal-Typen
// ============================================================================
//
// Signal = "letzter Wert gewinnt", genau das Verhalten das Blinker und
// WLAN-Zugangsdaten brauchen.

/// Blink-Muster: Main Task (Monitor/Supervisor) → LED Blink Task
pub type BlinkSignal = Signal<CriticalSectionRawMutex, BlinkPattern>;

/// WLAN-Zugangsdaten: Notifier (beim ersten Verbinden) → WiFi Connection Task
pub type CredentialsSignal = Signal<CriticalSectionRawMutex, WifiCredentials>;

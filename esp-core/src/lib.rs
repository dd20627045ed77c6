//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits für alle Kollaborateure (LED, Taster, Flash, Netzwerk)
//! und die komplette Steuerlogik: Logging mit Rotation, Notifier mit Retry,
//! Fatal-Error Supervisor und State-Change Monitor.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod blink;
pub mod config;
pub mod flash_store;
pub mod http;
pub mod logging;
pub mod monitor;
pub mod notifier;
pub mod supervisor;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use blink::{BlinkPattern, BlinkRenderer};
pub use config::{AppConfig, ConfigError, RequestTemplate, WifiCredentials};
pub use flash_store::FlashLogStore;
pub use logging::{Formatter, Logger, RotatingFileSink};
pub use monitor::{EdgeDetector, Monitor};
pub use notifier::{Notifier, NotifyError};
pub use supervisor::Supervisor;
pub use traits::{
    Blinker, Button, Clock, Connectivity, Delay, InputPin, LedError, LogSink, LogStore, Restart,
    SmartLedWriter, StoreError, Transport, TransportError,
};
pub use types::{Level, LogRecord, Response, RetryPolicy, SinkConfig, SwitchState};

// Task-Modul: Enthält alle Embassy Tasks
//
// Die Steuerlogik (Monitor, Notifier, Supervisor) läuft im Main Task.
// Hier laufen nur die unabhängigen Hintergrund-Tasks:
// LED-Blinken und WLAN-Verbindung (Kommunikation über Signals).

pub mod led_blink;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use led_blink::led_blink_task;
pub use wifi::{connection_task, net_task};

// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus esp-core auf der echten Hardware.
// Die Logik dahinter wird in esp-tests gegen Mocks getestet.

pub mod board;
pub mod led_writer;

pub use board::{BootButton, EmbassyClock, EmbassyDelay, SignalBlinker, SwitchInput, SystemRestart};
pub use led_writer::RmtLedWriter;

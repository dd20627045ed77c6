//! Logging: Formatter, Logger-Fassade und rotierende Log-Datei

pub mod formatter;
pub mod logger;
pub mod rotating;

pub use formatter::{DEFAULT_DATE_FORMAT, DEFAULT_TEMPLATE, Formatter};
pub use logger::Logger;
pub use rotating::RotatingFileSink;

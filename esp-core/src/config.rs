//! Laufzeit-Konfiguration (`config.json`)
//!
//! Struktur: `{wifi:{ssid,password}, govee:{url,headers,data}}`.
//! Wird einmal beim Start geparst und validiert. Fehler sind beim Start fatal.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::http::HttpUrl;
use crate::types::SwitchState;

/// Dateiname der Konfiguration (für Fehlermeldungen)
pub const CONFIG_FILENAME: &str = "config.json";

/// WLAN-Zugangsdaten
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
struct RawGovee {
    url: String,
    #[serde(default)]
    headers: Map<String, Value>,
    data: Value,
}

#[derive(Deserialize)]
struct RawConfig {
    wifi: WifiCredentials,
    govee: RawGovee,
}

/// Fehler beim Laden der Konfiguration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Datei fehlt oder ist leer
    NotFound,
    /// Kein gültiges JSON
    Decode,
    /// JSON gültig, Inhalt nicht
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound => {
                write!(f, "Configuration file '{}' not found.", CONFIG_FILENAME)
            }
            ConfigError::Decode => write!(f, "Error decoding JSON from '{}'.", CONFIG_FILENAME),
            ConfigError::Invalid(detail) => {
                write!(f, "Invalid configuration in '{}': {}", CONFIG_FILENAME, detail)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::NotFound => defmt::write!(fmt, "NotFound"),
            ConfigError::Decode => defmt::write!(fmt, "Decode"),
            ConfigError::Invalid(detail) => defmt::write!(fmt, "Invalid({=str})", detail.as_str()),
        }
    }
}

/// Unveränderliche Request-Parameter für den Notifier
///
/// `data` ist das Payload-Template, `cmd.value` wird pro Request ersetzt.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTemplate {
    url: String,
    headers: Vec<(String, String)>,
    data: Value,
}

impl RequestTemplate {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Payload mit injiziertem Soll-Zustand, z.B. `{"cmd":{"name":"turn","value":"on"},...}`
    pub fn payload_for(&self, state: SwitchState) -> String {
        let mut data = self.data.clone();
        if let Some(Value::Object(cmd)) = data.get_mut("cmd") {
            cmd.insert(
                String::from("value"),
                Value::String(String::from(state.as_str())),
            );
        }
        data.to_string()
    }
}

/// Validierte Anwendungs-Konfiguration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub wifi: WifiCredentials,
    pub request: RequestTemplate,
}

impl AppConfig {
    /// Parst und validiert den Inhalt von `config.json`
    ///
    /// Leerer Inhalt (Datei beim Build nicht gefunden) → `ConfigError::NotFound`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ConfigError::NotFound);
        }

        let raw: RawConfig = serde_json::from_slice(bytes).map_err(|e| {
            if e.is_data() {
                ConfigError::Invalid(e.to_string())
            } else {
                ConfigError::Decode
            }
        })?;

        if raw.wifi.ssid.is_empty() {
            return Err(ConfigError::Invalid(String::from("wifi.ssid is empty")));
        }

        HttpUrl::parse(&raw.govee.url)
            .map_err(|_| ConfigError::Invalid(alloc::format!("govee.url '{}'", raw.govee.url)))?;

        let mut headers = Vec::with_capacity(raw.govee.headers.len());
        for (name, value) in raw.govee.headers {
            match value {
                Value::String(value) => headers.push((name, value)),
                _ => {
                    return Err(ConfigError::Invalid(alloc::format!(
                        "govee.headers.{} is not a string",
                        name
                    )));
                }
            }
        }

        if !matches!(raw.govee.data.get("cmd"), Some(Value::Object(_))) {
            return Err(ConfigError::Invalid(String::from(
                "govee.data.cmd is not an object",
            )));
        }

        Ok(Self {
            wifi: raw.wifi,
            request: RequestTemplate {
                url: raw.govee.url,
                headers,
                data: raw.govee.data,
            },
        })
    }
}

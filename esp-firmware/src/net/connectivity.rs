// WLAN-Verbindung für den Notifier
use alloc::format;
use alloc::string::String;

use defmt::info;
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use esp_core::{Connectivity, TransportError, WifiCredentials};

use crate::CredentialsSignal;
use crate::config::NETWORK_POLL_MS;

/// Verbindung über den embassy-net Stack
///
/// Das Assoziieren macht der WiFi Connection Task. `connect` übergibt ihm
/// die Zugangsdaten und wartet ohne Timeout auf Link + DHCP-Adresse.
pub struct WifiConnectivity {
    stack: Stack<'static>,
    credentials: &'static CredentialsSignal,
    credentials_sent: bool,
}

impl WifiConnectivity {
    pub fn new(stack: Stack<'static>, credentials: &'static CredentialsSignal) -> Self {
        Self {
            stack,
            credentials,
            credentials_sent: false,
        }
    }
}

impl Connectivity for WifiConnectivity {
    fn is_connected(&self) -> bool {
        self.stack.is_link_up() && self.stack.config_v4().is_some()
    }

    async fn connect(&mut self, credentials: &WifiCredentials) -> Result<(), TransportError> {
        if !self.credentials_sent {
            info!("Net: Handing credentials for '{=str}' to WiFi task", credentials.ssid.as_str());
            self.credentials.signal(credentials.clone());
            self.credentials_sent = true;
        }

        while !self.is_connected() {
            Timer::after(Duration::from_millis(NETWORK_POLL_MS)).await;
        }
        Ok(())
    }

    fn address(&self) -> Option<String> {
        self.stack
            .config_v4()
            .map(|config| format!("{}", config.address.address()))
    }
}

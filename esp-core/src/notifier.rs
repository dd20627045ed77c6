//! Resilient Notifier: schaltet den LED-Strip per HTTP PUT mit begrenzten Wiederholungen

use core::fmt;

use crate::config::{RequestTemplate, WifiCredentials};
use crate::http::{Method, Request};
use crate::logging::Logger;
use crate::traits::{Connectivity, Delay, StoreError, Transport, TransportError};
use crate::types::{Response, RetryPolicy, SwitchState};

/// Fehler des Notifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotifyError {
    /// Einzelner Versuch fehlgeschlagen (Verbindung oder Request)
    Transport(TransportError),
    /// Alle Versuche ohne Antwort verbraucht
    RetriesExhausted { attempts: u32 },
    /// Log konnte nicht geschrieben werden
    Log(StoreError),
}

impl From<StoreError> for NotifyError {
    fn from(e: StoreError) -> Self {
        NotifyError::Log(e)
    }
}

impl From<TransportError> for NotifyError {
    fn from(e: TransportError) -> Self {
        NotifyError::Transport(e)
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Transport(e) => write!(f, "{}", e),
            NotifyError::RetriesExhausted { attempts } => {
                write!(f, "Failed to toggle LED strip after {} retries.", attempts)
            }
            NotifyError::Log(e) => write!(f, "Failed to write log: {}", e),
        }
    }
}

/// Setzt den Remote-Zustand des LED-Strips
///
/// Pro Versuch: Netzwerk sicherstellen (ohne Timeout), PUT absenden.
/// Jede empfangene Antwort beendet die Wiederholungen, auch 4xx/5xx.
/// Nur Transport-Fehler führen zu einer Wiederholung nach `retry_interval_ms`.
pub struct Notifier<N: Connectivity, T: Transport, D: Delay> {
    connectivity: N,
    transport: T,
    delay: D,
    credentials: WifiCredentials,
    request: RequestTemplate,
    policy: RetryPolicy,
}

impl<N: Connectivity, T: Transport, D: Delay> Notifier<N, T, D> {
    pub fn new(
        connectivity: N,
        transport: T,
        delay: D,
        credentials: WifiCredentials,
        request: RequestTemplate,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            connectivity,
            transport,
            delay,
            credentials,
            request,
            policy,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn connectivity(&self) -> &N {
        &self.connectivity
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Schickt `state` an den LED-Strip
    ///
    /// # Fehlerbehandlung
    /// - `RetriesExhausted` nach `max_attempts` fehlgeschlagenen Versuchen
    /// - `Log` wenn ein Log-Eintrag nicht geschrieben werden konnte
    pub async fn set_remote_state(
        &mut self,
        state: SwitchState,
        log: &mut Logger,
    ) -> Result<Response, NotifyError> {
        let body = self.request.payload_for(state);

        for _ in 0..self.policy.max_attempts() {
            match self.attempt(&body, log).await {
                Ok(response) => {
                    log.debug(format_args!(
                        "Govee response: {} {}",
                        response.status, response.body
                    ))?;
                    return Ok(response);
                }
                Err(NotifyError::Transport(e)) => {
                    log.error(format_args!("Error toggling LED strip: {}", e))?;
                    self.delay.delay_ms(self.policy.retry_interval_ms()).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(NotifyError::RetriesExhausted {
            attempts: self.policy.max_attempts(),
        })
    }

    async fn attempt(&mut self, body: &str, log: &mut Logger) -> Result<Response, NotifyError> {
        self.ensure_connected(log).await?;

        let request = Request {
            method: Method::Put,
            url: self.request.url(),
            headers: self.request.headers(),
            body,
        };
        Ok(self.transport.submit(&request).await?)
    }

    async fn ensure_connected(&mut self, log: &mut Logger) -> Result<(), NotifyError> {
        if self.connectivity.is_connected() {
            let address = self.connectivity.address().unwrap_or_default();
            log.debug(format_args!("Already connected to network: {}", address))?;
            return Ok(());
        }

        log.info(format_args!("Connecting to network..."))?;
        self.connectivity.connect(&self.credentials).await?;
        let address = self.connectivity.address().unwrap_or_default();
        log.info(format_args!("Network connected: {}", address))?;
        Ok(())
    }
}

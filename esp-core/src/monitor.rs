//! State-Change Monitor: pollt den Eingang und meldet Zustandswechsel

use core::convert::Infallible;

use crate::blink::BlinkPattern;
use crate::logging::Logger;
use crate::notifier::{Notifier, NotifyError};
use crate::supervisor::Supervisor;
use crate::traits::{Blinker, Button, Clock, Connectivity, Delay, InputPin, Restart, Transport};
use crate::types::SwitchState;

/// Poll-Intervall des Eingangs
pub const POLL_INTERVAL_MS: u64 = 100;

/// Flankenerkennung mit optionaler Entprellung
///
/// `stable_reads = 1`: jede Abweichung vom letzten gemeldeten Wert wird sofort gemeldet.
/// Ohne vorherigen Wert gilt der erste (stabile) Wert immer als Wechsel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDetector {
    previous: Option<bool>,
    candidate: Option<bool>,
    count: u32,
    stable_reads: u32,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EdgeDetector {
    /// `stable_reads` wird auf mindestens 1 angehoben
    pub const fn new(stable_reads: u32) -> Self {
        Self {
            previous: None,
            candidate: None,
            count: 0,
            stable_reads: if stable_reads == 0 { 1 } else { stable_reads },
        }
    }

    /// Verarbeitet eine Messung, liefert den neuen Pegel bei einem Wechsel
    pub fn update(&mut self, level: bool) -> Option<bool> {
        if self.previous == Some(level) {
            self.candidate = None;
            self.count = 0;
            return None;
        }

        if self.candidate == Some(level) {
            self.count += 1;
        } else {
            self.candidate = Some(level);
            self.count = 1;
        }

        if self.count < self.stable_reads {
            return None;
        }

        self.previous = Some(level);
        self.candidate = None;
        self.count = 0;
        Some(level)
    }
}

pub struct Monitor<P: InputPin, D: Delay, K: Blinker> {
    pin: P,
    delay: D,
    blinker: K,
    detector: EdgeDetector,
    poll_interval_ms: u64,
}

impl<P: InputPin, D: Delay, K: Blinker> Monitor<P, D, K> {
    pub fn new(pin: P, delay: D, blinker: K) -> Self {
        Self {
            pin,
            delay,
            blinker,
            detector: EdgeDetector::default(),
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }

    pub fn with_detector(mut self, detector: EdgeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Liest den Pin einmal, `Some` bei einem Zustandswechsel
    pub fn poll_once(&mut self) -> Option<SwitchState> {
        let level = self.pin.is_high();
        self.detector.update(level).map(SwitchState::from_level)
    }

    /// Ein Tick ohne Wartezeit: lesen, bei Wechsel loggen und Strip schalten
    pub async fn step<N, T, ND>(
        &mut self,
        notifier: &mut Notifier<N, T, ND>,
        log: &mut Logger,
    ) -> Result<Option<SwitchState>, NotifyError>
    where
        N: Connectivity,
        T: Transport,
        ND: Delay,
    {
        let Some(state) = self.poll_once() else {
            return Ok(None);
        };

        log.info(format_args!("Input state changed to {}", state))?;
        notifier.set_remote_state(state, log).await?;
        Ok(Some(state))
    }

    /// Läuft für immer, Fehler landen beim Supervisor
    pub async fn run<N, T, ND, B, SK, C, R>(
        &mut self,
        notifier: &mut Notifier<N, T, ND>,
        supervisor: &mut Supervisor<B, SK, C, R>,
        log: &mut Logger,
    ) -> Infallible
    where
        N: Connectivity,
        T: Transport,
        ND: Delay,
        B: Button,
        SK: Blinker,
        C: Clock,
        R: Restart,
    {
        self.blinker.set_pattern(BlinkPattern::WORKING);

        loop {
            if let Err(e) = self.step(notifier, log).await {
                return supervisor.fatal(e, log).await;
            }
            self.delay.delay_ms(self.poll_interval_ms).await;
        }
    }
}

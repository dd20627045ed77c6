//! Fatal-Error Supervisor
//!
//! Endzustand nach nicht behebbaren Fehlern. Verlassen nur per Neustart:
//!
//! ```text
//! Idle-Polling ──Taster──► Pressed-Measuring ──losgelassen, >= 3 s──► Rebooting
//!      ▲                          │
//!      └──losgelassen, < 3 s──────┘
//! ```

use core::convert::Infallible;
use core::fmt;

use embassy_futures::yield_now;

use crate::blink::BlinkPattern;
use crate::logging::Logger;
use crate::traits::{Blinker, Button, Clock, Restart};

/// Mindest-Haltedauer des Tasters für einen Neustart
pub const HOLD_THRESHOLD_MS: u64 = 3000;

pub struct Supervisor<B: Button, K: Blinker, C: Clock, R: Restart> {
    button: B,
    blinker: K,
    clock: C,
    restart: R,
    hold_threshold_ms: u64,
}

impl<B: Button, K: Blinker, C: Clock, R: Restart> Supervisor<B, K, C, R> {
    pub fn new(button: B, blinker: K, clock: C, restart: R) -> Self {
        Self {
            button,
            blinker,
            clock,
            restart,
            hold_threshold_ms: HOLD_THRESHOLD_MS,
        }
    }

    pub fn with_hold_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.hold_threshold_ms = threshold_ms;
        self
    }

    pub fn hold_threshold_ms(&self) -> u64 {
        self.hold_threshold_ms
    }

    /// Loggt `message`, blinkt schnell und wartet auf einen langen Tastendruck
    ///
    /// Kehrt nie zurück. Kurze Drücke schalten wieder auf Fehler-Blinken.
    /// Log-Fehler werden hier ignoriert.
    pub async fn fatal(&mut self, message: impl fmt::Display, log: &mut Logger) -> Infallible {
        let _ = log.error(format_args!("{}", message));
        self.blinker.set_pattern(BlinkPattern::ERROR);

        loop {
            let held_ms = self.measure_press().await;
            if held_ms >= self.hold_threshold_ms {
                let _ = log.info(format_args!("Button pressed for 3s, rebooting the device..."));
                self.blinker.set_pattern(BlinkPattern::Off);
                self.restart.restart();
            }
            self.blinker.set_pattern(BlinkPattern::ERROR);
        }
    }

    /// Wartet auf einen Tastendruck und liefert die Haltedauer in ms
    ///
    /// Die LED leuchtet dauerhaft solange der Taster gedrückt ist.
    pub async fn measure_press(&mut self) -> u64 {
        while !self.button.is_asserted() {
            yield_now().await;
        }

        self.blinker.set_pattern(BlinkPattern::Solid);
        let pressed_at = self.clock.now_ms();
        while self.button.is_asserted() {
            yield_now().await;
        }
        self.clock.now_ms().saturating_sub(pressed_at)
    }
}

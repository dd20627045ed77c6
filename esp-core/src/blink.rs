//! Blink-Muster für die Status-LED
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::traits::{LedError, SmartLedWriter};

/// Visuelles Signal der Status-LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPattern {
    /// LED aus
    Off,
    /// LED dauerhaft an (Taster gedrückt)
    Solid,
    /// Periodisch: `on_ms` an, Rest der Periode aus
    Blink { period_ms: u32, on_ms: u32 },
}

impl BlinkPattern {
    /// Heartbeat im Normalbetrieb: alle 3 s für 100 ms
    pub const WORKING: Self = BlinkPattern::Blink {
        period_ms: 3000,
        on_ms: 100,
    };

    /// Schnelles Blinken im Fehlerzustand
    pub const ERROR: Self = BlinkPattern::Blink {
        period_ms: 200,
        on_ms: 100,
    };

    /// Ist die LED `elapsed_ms` nach Start des Musters an?
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use esp_core::BlinkPattern;
    /// assert!(BlinkPattern::ERROR.is_lit_at(50));
    /// assert!(!BlinkPattern::ERROR.is_lit_at(150));
    /// assert!(BlinkPattern::ERROR.is_lit_at(250));
    /// ```
    pub fn is_lit_at(self, elapsed_ms: u64) -> bool {
        match self {
            BlinkPattern::Off => false,
            BlinkPattern::Solid => true,
            BlinkPattern::Blink { period_ms: 0, on_ms } => on_ms > 0,
            BlinkPattern::Blink { period_ms, on_ms } => {
                elapsed_ms % u64::from(period_ms) < u64::from(on_ms)
            }
        }
    }
}

/// Setzt ein Blink-Muster auf einen SmartLedWriter um
///
/// Schreibt nur bei Wechsel zwischen an/aus, nicht bei jedem Tick.
pub struct BlinkRenderer<L: SmartLedWriter> {
    led: L,
    on_color: RGB8,
    lit: Option<bool>,
}

impl<L: SmartLedWriter> BlinkRenderer<L> {
    pub fn new(led: L, on_color: RGB8) -> Self {
        Self {
            led,
            on_color,
            lit: None,
        }
    }

    /// Ändert die "an"-Farbe, der nächste `render` schreibt in jedem Fall
    pub fn set_on_color(&mut self, color: RGB8) {
        if self.on_color != color {
            self.on_color = color;
            self.lit = None;
        }
    }

    pub fn render(&mut self, pattern: BlinkPattern, elapsed_ms: u64) -> Result<(), LedError> {
        let lit = pattern.is_lit_at(elapsed_ms);
        if self.lit == Some(lit) {
            return Ok(());
        }

        let color = if lit { self.on_color } else { RGB8::default() };
        self.led.write(color)?;
        self.lit = Some(lit);
        Ok(())
    }

    pub fn led(&self) -> &L {
        &self.led
    }
}

// Board-Kollaborateure: GPIO, Zeit, Neustart, Blinker
//
// Dünne Adapter von esp-hal / embassy auf die esp-core Traits.

use embassy_time::{Instant, Timer};
use esp_core::{BlinkPattern, Blinker, Button, Clock, Delay, InputPin, Restart};
use esp_hal::gpio::Input;

use crate::BlinkSignal;

/// Digitaler Eingang der den Schaltzustand liefert (high = an)
pub struct SwitchInput<'d> {
    pin: Input<'d>,
}

impl<'d> SwitchInput<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl InputPin for SwitchInput<'_> {
    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}

/// BOOT-Taster des DevKits (active low, interner Pull-Up)
pub struct BootButton<'d> {
    pin: Input<'d>,
}

impl<'d> BootButton<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl Button for BootButton<'_> {
    fn is_asserted(&mut self) -> bool {
        self.pin.is_low()
    }
}

/// Monotone Uhr seit Boot (embassy-time)
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Async Wartezeit, gibt die CPU an andere Tasks ab
#[derive(Clone, Copy, Default)]
pub struct EmbassyDelay;

impl Delay for EmbassyDelay {
    async fn delay_ms(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}

/// Software-Reset des kompletten Chips
pub struct SystemRestart;

impl Restart for SystemRestart {
    #[allow(unreachable_code)]
    fn restart(&mut self) -> ! {
        esp_hal::system::software_reset();
        loop {
            core::hint::spin_loop();
        }
    }
}

/// Blinker-Handle: reicht das Muster an den LED Blink Task weiter
///
/// Kopierbar, Monitor und Supervisor halten je ein Handle.
#[derive(Clone, Copy)]
pub struct SignalBlinker {
    signal: &'static BlinkSignal,
}

impl SignalBlinker {
    pub fn new(signal: &'static BlinkSignal) -> Self {
        Self { signal }
    }
}

impl Blinker for SignalBlinker {
    fn set_pattern(&mut self, pattern: BlinkPattern) {
        self.signal.signal(pattern);
    }
}

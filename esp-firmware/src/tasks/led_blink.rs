// LED Blink Task - Zeigt das aktuelle Blink-Muster auf der RGB LED
use defmt::{error, info};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant, Timer};
use esp_core::{BlinkPattern, BlinkRenderer, SmartLedWriter};
use esp_hal_smartled::smart_led_buffer;
use rgb::RGB8;

use crate::BlinkSignal;
use crate::config::{BLINK_TICK_MS, LED_BRIGHTNESS, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;

/// LED Blink Logic - ohne direkte Hardware-Abhängigkeit
///
/// - Übernimmt jedes neue Muster aus dem Signal (letzter Aufruf gewinnt)
/// - Periodische Muster werden alle `BLINK_TICK_MS` neu gerendert
/// - Statische Muster (Off, Solid) warten nur auf das nächste Signal
pub async fn led_blink_logic<L: SmartLedWriter>(
    mut renderer: BlinkRenderer<L>,
    signal: &'static BlinkSignal,
) -> ! {
    let mut pattern = BlinkPattern::Off;
    let mut started = Instant::now();

    loop {
        if renderer
            .render(pattern, started.elapsed().as_millis())
            .is_err()
        {
            error!("Blink: Failed to write to LED");
        }

        let next = match pattern {
            BlinkPattern::Blink { .. } => {
                match select(
                    signal.wait(),
                    Timer::after(Duration::from_millis(BLINK_TICK_MS)),
                )
                .await
                {
                    Either::First(next) => Some(next),
                    Either::Second(()) => None,
                }
            }
            BlinkPattern::Off | BlinkPattern::Solid => Some(signal.wait().await),
        };

        if let Some(next) = next {
            info!("Blink: Pattern {}", next);
            pattern = next;
            started = Instant::now();
        }
    }
}

/// LED Blink Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung und ruft dann `led_blink_logic()` auf.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für LED-Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `signal`: Blink-Muster vom Main Task
#[embassy_executor::task]
pub async fn led_blink_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    signal: &'static BlinkSignal,
) {
    // Buffer für SmartLED Daten erstellen (1 LED)
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(1);

    let led = RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer);
    let on_color = RGB8 {
        r: 0,
        g: LED_BRIGHTNESS,
        b: 0,
    };

    led_blink_logic(BlinkRenderer::new(led, on_color), signal).await
}

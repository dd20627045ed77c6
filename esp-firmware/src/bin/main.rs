// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi und Logger benötigen dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_sync::signal::Signal;

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_storage::FlashStorage;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use esp_core::{AppConfig, Monitor, Notifier, RetryPolicy, Supervisor};

// Projekt-Module und Konfiguration
use esp_govee_schalter::config::{
    EXTRA_HEAP_SIZE, POLL_INTERVAL_MS, REQUEST_RETRIES, RESET_HOLD_MS, RETRY_INTERVAL_MS,
    WIFI_HEAP_SIZE,
};
use esp_govee_schalter::hal::{
    BootButton, EmbassyClock, EmbassyDelay, SignalBlinker, SwitchInput, SystemRestart,
};
use esp_govee_schalter::logging::init_logger;
use esp_govee_schalter::net::{HttpTransport, WifiConnectivity};
use esp_govee_schalter::tasks::{connection_task, led_blink_task, net_task};
use esp_govee_schalter::{BlinkSignal, CONFIG_JSON, CredentialsSignal};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, Logging und WiFi, danach läuft hier der
/// State-Change Monitor für immer. Fatale Fehler landen beim Supervisor,
/// der nur per 3 s Druck auf den BOOT-Taster (Neustart) verlassen wird.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (72 KB) = 136 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Status-LED: Blink Task startet mit LED aus
    static BLINK_SIGNAL: static_cell::StaticCell<BlinkSignal> = static_cell::StaticCell::new();
    let blink_signal = &*BLINK_SIGNAL.init(Signal::new());
    spawner
        .spawn(led_blink_task(peripherals.GPIO8, peripherals.RMT, blink_signal))
        .unwrap();
    let blinker = SignalBlinker::new(blink_signal);

    // Logger: Konsole (DEBUG+) und rotierende Datei im Flash (INFO+)
    let mut log = init_logger(FlashStorage::new(peripherals.FLASH));
    let _ = log.info(format_args!("Booting..."));

    // Supervisor: BOOT-Taster (GPIO9, active low)
    let button = Input::new(peripherals.GPIO9, InputConfig::default().with_pull(Pull::Up));
    let mut supervisor = Supervisor::new(
        BootButton::new(button),
        blinker,
        EmbassyClock,
        SystemRestart,
    )
    .with_hold_threshold_ms(RESET_HOLD_MS);

    // Laufzeit-Konfiguration, Fehler sind fatal
    let app_config = match AppConfig::from_slice(CONFIG_JSON) {
        Ok(app_config) => app_config,
        Err(e) => match supervisor.fatal(e, &mut log).await {},
    };

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net: 1 HTTP(S)-Socket + DNS + DHCP
    static RESOURCES: static_cell::StaticCell<StackResources<4>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Zugangsdaten gehen beim ersten Verbindungsversuch an den WiFi Task
    static CREDENTIALS: static_cell::StaticCell<CredentialsSignal> =
        static_cell::StaticCell::new();
    let credentials = &*CREDENTIALS.init(Signal::new());

    spawner
        .spawn(connection_task(wifi_controller, credentials))
        .unwrap();
    spawner.spawn(net_task(runner)).unwrap();

    let mut notifier = Notifier::new(
        WifiConnectivity::new(stack, credentials),
        HttpTransport::new(stack, Rng::new()),
        EmbassyDelay,
        app_config.wifi,
        app_config.request,
        RetryPolicy::new(REQUEST_RETRIES, RETRY_INTERVAL_MS),
    );

    // Eingang (GPIO4, Pull-Down): high = Strip an
    let input = Input::new(peripherals.GPIO4, InputConfig::default().with_pull(Pull::Down));
    let mut monitor = Monitor::new(SwitchInput::new(input), EmbassyDelay, blinker)
        .with_poll_interval_ms(POLL_INTERVAL_MS);

    match monitor.run(&mut notifier, &mut supervisor, &mut log).await {}
}

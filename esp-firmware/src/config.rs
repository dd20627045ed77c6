// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Laufzeit-Konfiguration (WLAN, Govee-Request) steht in config.json,
// siehe CONFIG_JSON in lib.rs.

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die RGB Status-LED (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Render-Intervall des Blink-Tasks in Millisekunden
pub const BLINK_TICK_MS: u64 = 10;

// ============================================================================
// GPIO Konfiguration
// ============================================================================

/// Digitaler Eingang (3,3 V Signal), Pull-Down
pub const INPUT_GPIO_PIN: u8 = 4;

/// BOOT-Taster (active low)
pub const BUTTON_GPIO_PIN: u8 = 9;

/// Poll-Intervall des Eingangs
pub const POLL_INTERVAL_MS: u64 = 100;

/// Haltedauer des BOOT-Tasters für einen Neustart
pub const RESET_HOLD_MS: u64 = 3000;

// ============================================================================
// Notifier Konfiguration
// ============================================================================

/// Versuche pro Zustandswechsel
pub const REQUEST_RETRIES: u32 = 3;

/// Pause nach einem fehlgeschlagenen Versuch
pub const RETRY_INTERVAL_MS: u64 = 500;

// ============================================================================
// Logging Konfiguration
// ============================================================================

/// Name des Application-Loggers
pub const LOGGER_NAME: &str = "led_controller";

/// Aktive Log-Datei
pub const FILELOG_FILENAME: &str = "led_controller.log";

/// Größenbudget der aktiven Log-Datei
pub const FILELOG_MAX_BYTES: u64 = 500 * 1024; // 500 KB

/// Anzahl aufbewahrter Generationen (.1, .2)
pub const FILELOG_BACKUP_COUNT: u32 = 2;

/// Start des Log-Bereichs im SPI-Flash (hinter der App-Partition)
pub const LOG_FLASH_OFFSET: u32 = 0x40_0000;

/// Größe eines Datei-Slots: 1 Header-Sektor + 512 KB Daten
/// Muss FILELOG_MAX_BYTES plus eine Zeile aufnehmen können
pub const LOG_SLOT_SIZE: u32 = 4096 + 512 * 1024;

// ============================================================================
// WiFi / Netzwerk Konfiguration
// ============================================================================

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes) für Logger, HTTP-Antworten und TLS-Record-Buffer
pub const EXTRA_HEAP_SIZE: usize = 73728; // 72 KB

/// Wartezeit nach WLAN-Fehlern vor erneutem Versuch
pub const WIFI_RECONNECT_DELAY_SECS: u64 = 5;

/// Poll-Intervall beim Warten auf Link + DHCP
pub const NETWORK_POLL_MS: u64 = 500;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Socket-Timeout für HTTP-Requests
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// TCP RX/TX Buffer-Größen in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 2048;
pub const TCP_TX_BUFFER_SIZE: usize = 2048;

/// Maximal gelesene Antwort-Größe (Rest wird verworfen)
pub const HTTP_MAX_RESPONSE_SIZE: usize = 4096;

/// TLS Record-Buffer: Lesen muss einen vollen Record (16 KB + Overhead) fassen
pub const TLS_READ_RECORD_SIZE: usize = 16640;
pub const TLS_WRITE_RECORD_SIZE: usize = 4096;

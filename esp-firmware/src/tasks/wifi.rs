// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, ScanConfig, WifiController, WifiDevice};

use crate::CredentialsSignal;
use crate::config::WIFI_RECONNECT_DELAY_SECS;

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Wartet auf die Zugangsdaten aus config.json (erste Verbindungsanfrage)
/// - Verbindet mit Access Point
/// - Überwacht Verbindung und reconnected bei Bedarf, ohne Limit
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    credentials: &'static CredentialsSignal,
) {
    info!("WiFi: Waiting for credentials...");
    let credentials = credentials.wait().await;
    let ssid = credentials.ssid.as_str();
    info!("WiFi: Starting connection task for '{=str}'", ssid);

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(credentials.ssid.clone())
                    .with_password(credentials.password.clone()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Scan nur für die Diagnose (Signalstärke des Ziel-APs)
        match controller
            .scan_with_config_async(ScanConfig::default())
            .await
        {
            Ok(ap_infos) => {
                if let Some(ap_info) = ap_infos.iter().find(|ap| ap.ssid.as_str() == ssid) {
                    info!(
                        "WiFi: Target AP found - SSID: {=str}, Signal: {} dBm",
                        ssid, ap_info.signal_strength
                    );
                } else {
                    warn!("WiFi: Target AP '{=str}' not visible", ssid);
                }
            }
            Err(e) => {
                warn!("WiFi: Scan failed: {}", Debug2Format(&e));
            }
        }

        info!("WiFi: Connecting to '{=str}'...", ssid);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
                continue;
            }
        }

        controller
            .wait_for_event(esp_radio::wifi::WifiEvent::StaDisconnected)
            .await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Network Task
///
/// Prozessiert Netzwerk-Pakete für den embassy-net Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, ScanConfig, WifiController, WifiDevice, WifiEvent};

use crate::config::{NETWORK_POLL_INTERVAL_MS, WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Verbindet mit Access Point
/// - Überwacht Verbindung und reconnected bei Bedarf
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Scan nur für Diagnose (Signalstärke des Ziel-APs)
        match controller
            .scan_with_config_async(ScanConfig::default())
            .await
        {
            Ok(ap_infos) => {
                info!("WiFi: Found {} access points", ap_infos.len());
                for ap_info in ap_infos.iter().filter(|ap| ap.ssid.as_str() == WIFI_SSID) {
                    info!(
                        "WiFi: Target AP found - SSID: {}, Signal: {} dBm",
                        WIFI_SSID, ap_info.signal_strength
                    );
                }
            }
            Err(e) => warn!("WiFi: Scan failed: {}", Debug2Format(&e)),
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }
        info!("WiFi: Connected successfully!");

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
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

/// DHCP Monitor Task
///
/// Loggt die Netzwerk-Konfiguration bei jeder neuen DHCP-Zuweisung
#[embassy_executor::task]
pub async fn dhcp_task(stack: Stack<'static>) {
    loop {
        wait_for_network(stack).await;

        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            info!("  DNS:     {}", Debug2Format(&config.dns_servers));
        }

        stack.wait_config_down().await;
        warn!("WiFi: Lost IP configuration");
    }
}

/// Link oben und IPv4-Konfiguration vorhanden?
pub fn network_ready(stack: Stack<'_>) -> bool {
    stack.is_link_up() && stack.config_v4().is_some()
}

/// Wartet bis Link und DHCP-Konfiguration verfügbar sind
pub async fn wait_for_network(stack: Stack<'_>) {
    while !network_ready(stack) {
        Timer::after(Duration::from_millis(NETWORK_POLL_INTERVAL_MS)).await;
    }
}

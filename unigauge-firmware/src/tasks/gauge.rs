// Gauge Task - Besitzt LED-Strip und Anwendungszustand
use defmt::{error, info};
use embassy_net::Stack;
use embassy_time::Delay;
use esp_hal_smartled::smart_led_buffer;
use unigauge_core::{Gauge, LinkConfig, LinkManager};

use crate::config::*;
use crate::hal::RmtPixelDriver;
use crate::tasks::mqtt::BrokerConnector;
use crate::tasks::wifi::wait_for_network;

/// Gauge Task
///
/// Zeigt den Start-Status, wartet auf das Netzwerk und übergibt dann an
/// den `LinkManager`, der endlos verbindet, Nachrichten dispatcht und bei
/// Verbindungsverlust neu verbindet.
///
/// # Parameter
/// - `stack`: embassy-net Stack für DNS und TCP
/// - `gpio8`: GPIO8 Peripheral für die LED-Datenleitung
/// - `rmt`: RMT Peripheral
/// - `device_seed`: Zufallswert für die Device-ID (falls keine fest konfiguriert ist)
#[embassy_executor::task]
pub async fn gauge_task(
    stack: Stack<'static>,
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt: esp_hal::peripherals::RMT<'static>,
    device_seed: u16,
) {
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);
    let driver = match RmtPixelDriver::new(gpio8, rmt, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(driver) => driver,
        Err(e) => {
            error!("Gauge: Failed to initialise RMT: {}", e);
            return;
        }
    };

    let mut gauge: Gauge<_, LED_COUNT> = Gauge::new(driver, STATUS_LAYOUT);
    gauge.start();

    info!("Gauge: Waiting for network...");
    wait_for_network(stack).await;
    gauge.update_network(true);

    let device_id = device_id(device_seed);
    info!("Gauge: Device ID {}", device_id.as_str());

    let mut link = match LinkManager::new(LinkConfig {
        device_id: &device_id,
        inbound_prefix: MQTT_TOPIC_IN_PREFIX,
        outbound_prefix: MQTT_TOPIC_OUT_PREFIX,
        retry_delay_ms: MQTT_RECONNECT_DELAY_MS,
    }) {
        Ok(link) => link,
        Err(e) => {
            error!("Gauge: Invalid MQTT topic configuration: {}", e);
            return;
        }
    };

    let mut connector = BrokerConnector::new(stack);
    let mut delay = Delay;

    link.run(&mut connector, &mut delay, &mut gauge).await
}

// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
use unigauge_core::{DeviceId, StatusLayout, device_id_from_seed};

// ============================================================================
// LED Konfiguration
// ============================================================================

/// Anzahl der LEDs im Strip
/// Muss zur Länge des "LEDS"-Arrays in den MQTT-Nachrichten passen
pub const LED_COUNT: usize = 36;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// LED-Index für den WiFi-Status
pub const STATUS_LED_WIFI: usize = 3;

/// LED-Index für den Parser-Status
pub const STATUS_LED_PARSER: usize = 6;

/// LED-Index für den MQTT-Status
pub const STATUS_LED_MQTT: usize = 9;

/// Helligkeit der Status-LEDs (0-255)
/// Wert ist gedimmt für Augenschonung
pub const STATUS_LED_BRIGHTNESS: u8 = 32;

pub const STATUS_LAYOUT: StatusLayout = StatusLayout {
    network: STATUS_LED_WIFI,
    link: STATUS_LED_MQTT,
    parser: STATUS_LED_PARSER,
    brightness: STATUS_LED_BRIGHTNESS,
};

const _: () = assert!(
    STATUS_LAYOUT.fits(LED_COUNT),
    "Status-LED Index liegt außerhalb des Strips"
);

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach WiFi-Fehler vor erneutem Versuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Abfrage-Intervall beim Warten auf Link und DHCP
pub const NETWORK_POLL_INTERVAL_MS: u64 = 500;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IPv4-Adresse
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt), kann in .env überschrieben werden
pub const MQTT_PORT: u16 = match option_env!("MQTT_PORT") {
    Some(port) => parse_port(port),
    None => 1883,
};

/// Feste Device-ID (optional)
/// Ohne MQTT_DEVICE_ID wird "uniGauge-XXXX" aus dem Hardware-RNG abgeleitet
pub const MQTT_DEVICE_ID: Option<&str> = option_env!("MQTT_DEVICE_ID");

/// Optionale Zugangsdaten für den Broker
pub const MQTT_USERNAME: Option<&str> = option_env!("MQTT_USERNAME");
pub const MQTT_PASSWORD: Option<&str> = option_env!("MQTT_PASSWORD");

/// Prefix für das Subscribe-Topic, Device-ID wird angehängt
pub const MQTT_TOPIC_IN_PREFIX: &str = match option_env!("MQTT_TOPIC_IN_PREFIX") {
    Some(prefix) => prefix,
    None => "/unigauge/down/",
};

/// Prefix für das Publish-Topic (Capability-Meldung), Device-ID wird angehängt
pub const MQTT_TOPIC_OUT_PREFIX: &str = match option_env!("MQTT_TOPIC_OUT_PREFIX") {
    Some(prefix) => prefix,
    None => "/unigauge/up/",
};

/// MQTT Reconnect Delay in Millisekunden
/// Wartezeit nach Verbindungsfehler vor erneutem Versuch
pub const MQTT_RECONNECT_DELAY_MS: u32 = 5000;

/// MQTT Buffer-Größe in Bytes
/// Muss eine komplette LED-Nachricht (max. 2048 Bytes Payload) plus Header fassen
pub const MQTT_BUFFER_SIZE: usize = 4096;

/// MQTT Keep-Alive in Sekunden
/// Ping wird nach der Hälfte dieser Zeit ohne eingehende Nachricht gesendet
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// Maximale Länge eines eingehenden Topics
pub const MQTT_MAX_TOPIC_LEN: usize = 64;

/// TCP Buffer-Größen für die MQTT-Verbindung
pub const TCP_RX_BUFFER_SIZE: usize = 4096;
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// TCP Socket Timeout in Sekunden
pub const TCP_TIMEOUT_SECS: u64 = 60;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Device-ID für Client-ID und Topics
pub fn device_id(seed: u16) -> DeviceId {
    match MQTT_DEVICE_ID {
        Some(id) => {
            let mut fixed = DeviceId::new();
            match fixed.push_str(id) {
                Ok(()) => fixed,
                Err(_) => device_id_from_seed(seed),
            }
        }
        None => device_id_from_seed(seed),
    }
}

/// Parst einen Port zur Compile-Zeit
const fn parse_port(port: &str) -> u16 {
    let bytes = port.as_bytes();
    assert!(!bytes.is_empty(), "MQTT_PORT ist leer");
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "MQTT_PORT ist keine Zahl");
        value = value * 10 + (digit - b'0') as u32;
        assert!(value <= u16::MAX as u32, "MQTT_PORT ist zu groß");
        i += 1;
    }
    value as u16
}

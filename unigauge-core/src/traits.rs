//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für LED-Strip und MQTT
//! ohne konkrete Implementierung.

use rgb::RGB8;

use crate::types::InboundMessage;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Trait für den adressierbaren LED-Strip
///
/// `set_pixel` und `clear` ändern nur den Puffer, erst `show` schreibt auf die Hardware.
///
/// # Implementierungen
/// - **Production:** RmtPixelDriver (ESP32 RMT Peripheral)
/// - **Testing:** MockPixelDriver (in-memory Mock)
pub trait PixelDriver: Send {
    /// Setzt die Farbe einer LED; Indizes außerhalb des Strips werden ignoriert
    fn set_pixel(&mut self, index: usize, color: RGB8);

    /// Setzt alle LEDs auf Schwarz
    fn clear(&mut self);

    /// Überträgt den Puffer auf den Strip
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn show(&mut self) -> Result<(), LedError>;
}

/// Fehler-Typ für MQTT-Link-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Netzwerk (WiFi/DHCP) nicht verfügbar
    NetworkDown,
    /// Verbindungsaufbau (DNS, TCP oder MQTT CONNECT) fehlgeschlagen
    ConnectFailed,
    SubscribeFailed,
    PublishFailed,
    /// Bestehende Session abgebrochen
    Lost,
    /// Topic passt nicht in den Topic-Puffer
    TopicTooLong,
}

/// Baut MQTT-Sessions auf
///
/// Die Session darf Puffer des Connectors ausleihen, daher der
/// Lifetime-Parameter an `Session`.
#[allow(async_fn_in_trait)]
pub trait MqttConnector {
    type Session<'s>: MqttSession
    where
        Self: 's;

    /// Ist das Netzwerk (Link + IP) bereit?
    fn network_up(&self) -> bool;

    /// Verbindet mit dem Broker unter der angegebenen Client-ID
    async fn connect(&mut self, client_id: &str) -> Result<Self::Session<'_>, LinkError>;
}

/// Eine aufgebaute MQTT-Session
#[allow(async_fn_in_trait)]
pub trait MqttSession {
    fn is_connected(&self) -> bool;

    async fn subscribe(&mut self, topic: &str) -> Result<(), LinkError>;

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError>;

    /// Bedient die Session einmal
    ///
    /// Liefert höchstens eine eingehende Nachricht. `Ok(None)` heißt: nichts
    /// angekommen (z.B. nur Keep-Alive bedient).
    async fn poll(&mut self) -> Result<Option<InboundMessage<'_>>, LinkError>;
}

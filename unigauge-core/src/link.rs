//! MQTT-Link: Verbindungsaufbau, Reconnect und Nachrichten-Dispatch
//!
//! Zustandsmaschine `Disconnected → Connecting → Connected`. Fehlgeschlagene
//! Versuche werden endlos mit fester Wartezeit wiederholt, es gibt kein
//! exponentielles Backoff und keinen Abbruch.

use core::fmt::Write;

use embedded_hal_async::delay::DelayNs;
use heapless::String;

use crate::gauge::Gauge;
use crate::traits::{LinkError, MqttConnector, MqttSession, PixelDriver};
use crate::types::{Health, LinkState};

/// Maximale Topic-Länge (Prefix + Device-ID)
pub const MAX_TOPIC_LEN: usize = 64;

/// Maximale Länge einer Device-ID
pub const MAX_DEVICE_ID_LEN: usize = 32;

pub type Topic = String<MAX_TOPIC_LEN>;
pub type DeviceId = String<MAX_DEVICE_ID_LEN>;

/// Konfiguration des MQTT-Links
#[derive(Debug, Clone, Copy)]
pub struct LinkConfig<'a> {
    /// Client-ID und Topic-Suffix
    pub device_id: &'a str,
    /// z.B. "/unigauge/down/"
    pub inbound_prefix: &'a str,
    /// z.B. "/unigauge/up/"
    pub outbound_prefix: &'a str,
    /// Wartezeit zwischen zwei Verbindungsversuchen
    pub retry_delay_ms: u32,
}

/// Leitet eine Device-ID aus einem Hardware-Seed ab, z.B. "uniGauge-1A2B"
pub fn device_id_from_seed(seed: u16) -> DeviceId {
    let mut id = DeviceId::new();
    let _ = write!(id, "uniGauge-{:04X}", seed);
    id
}

/// Capability-Meldung nach jedem Verbindungsaufbau: `{"leds":NN}`
///
/// # Beispiele
///
/// ```
/// # use unigauge_core::announcement;
/// assert_eq!(announcement::<36>().as_str(), r#"{"leds":36}"#);
/// assert_eq!(announcement::<8>().as_str(), r#"{"leds":08}"#);
/// ```
pub fn announcement<const N: usize>() -> String<32> {
    let mut msg = String::new();
    let _ = write!(msg, "{{\"leds\":{:02}}}", N);
    msg
}

fn build_topic(prefix: &str, device_id: &str) -> Result<Topic, LinkError> {
    let mut topic = Topic::new();
    topic
        .push_str(prefix)
        .and_then(|_| topic.push_str(device_id))
        .map_err(|_| LinkError::TopicTooLong)?;
    Ok(topic)
}

/// Connection Manager für den MQTT-Link
pub struct LinkManager<'a> {
    config: LinkConfig<'a>,
    inbound_topic: Topic,
    outbound_topic: Topic,
    state: LinkState,
    failed_attempts: u32,
}

impl<'a> LinkManager<'a> {
    /// Baut die Topics `<inbound-prefix><id>` und `<outbound-prefix><id>`
    pub fn new(config: LinkConfig<'a>) -> Result<Self, LinkError> {
        Ok(Self {
            inbound_topic: build_topic(config.inbound_prefix, config.device_id)?,
            outbound_topic: build_topic(config.outbound_prefix, config.device_id)?,
            config,
            state: LinkState::Disconnected,
            failed_attempts: 0,
        })
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn inbound_topic(&self) -> &str {
        &self.inbound_topic
    }

    pub fn outbound_topic(&self) -> &str {
        &self.outbound_topic
    }

    /// Fehlgeschlagene Versuche seit der letzten erfolgreichen Verbindung
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Ein einzelner Verbindungsversuch
    ///
    /// Bei Erfolg: Subscribe auf das Inbound-Topic, Capability-Meldung auf
    /// das Outbound-Topic, MQTT-Status grün. Bei Fehler: MQTT-Status rot.
    /// Vorher wird der Netzwerk-Status aktualisiert.
    pub async fn attempt<'c, C, P, const N: usize>(
        &mut self,
        connector: &'c mut C,
        gauge: &mut Gauge<P, N>,
    ) -> Result<C::Session<'c>, LinkError>
    where
        C: MqttConnector,
        P: PixelDriver,
    {
        self.state = LinkState::Connecting;

        let network_up = connector.network_up();
        gauge.update_network(network_up);

        let result = if network_up {
            info!(
                "MQTT: Attempting connection as {}...",
                self.config.device_id
            );
            self.open_session::<C, N>(connector).await
        } else {
            Err(LinkError::NetworkDown)
        };

        match result {
            Ok(session) => {
                info!("MQTT: Connected");
                self.state = LinkState::Connected;
                self.failed_attempts = 0;
                gauge.set_link(Health::Ok);
                Ok(session)
            }
            Err(e) => {
                self.failed_attempts = self.failed_attempts.saturating_add(1);
                warn!(
                    "MQTT: Connection failed: {} (attempt {}), try again in {} ms",
                    e, self.failed_attempts, self.config.retry_delay_ms
                );
                self.state = LinkState::Disconnected;
                gauge.set_link(Health::Fail);
                Err(e)
            }
        }
    }

    async fn open_session<'c, C: MqttConnector, const N: usize>(
        &self,
        connector: &'c mut C,
    ) -> Result<C::Session<'c>, LinkError> {
        let mut session = connector.connect(self.config.device_id).await?;

        info!("MQTT: Subscribe to {}", self.inbound_topic.as_str());
        session.subscribe(&self.inbound_topic).await?;

        let capability = announcement::<N>();
        info!(
            "MQTT: Publish {} to {}",
            capability.as_str(),
            self.outbound_topic.as_str()
        );
        session
            .publish(&self.outbound_topic, capability.as_bytes())
            .await?;

        Ok(session)
    }

    /// Bedient eine verbundene Session einmal
    ///
    /// Eine eingehende Nachricht wird synchron an die Gauge weitergereicht.
    /// Parser-Fehler beenden die Session nicht. Ist die Session weg, wird
    /// der MQTT-Status rot und `Err` zurückgegeben.
    pub async fn service<S, P, const N: usize>(
        &mut self,
        session: &mut S,
        gauge: &mut Gauge<P, N>,
    ) -> Result<(), LinkError>
    where
        S: MqttSession,
        P: PixelDriver,
    {
        if !session.is_connected() {
            self.link_lost(gauge);
            return Err(LinkError::Lost);
        }

        match session.poll().await {
            Ok(Some(message)) => {
                // Fehler sind bereits im Parser-Status sichtbar
                let _ = gauge.handle_message(&message);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                warn!("MQTT: Session error: {}", e);
                self.link_lost(gauge);
                Err(e)
            }
        }
    }

    fn link_lost<P: PixelDriver, const N: usize>(&mut self, gauge: &mut Gauge<P, N>) {
        warn!("MQTT: Connection lost");
        self.state = LinkState::Disconnected;
        gauge.set_link(Health::Fail);
    }

    /// Hauptschleife: verbinden, bedienen, bei Verlust erneut verbinden
    ///
    /// Während der Wartezeit zwischen zwei Versuchen werden keine
    /// Nachrichten bedient. Kehrt nie zurück.
    pub async fn run<C, D, P, const N: usize>(
        &mut self,
        connector: &mut C,
        delay: &mut D,
        gauge: &mut Gauge<P, N>,
    ) -> !
    where
        C: MqttConnector,
        D: DelayNs,
        P: PixelDriver,
    {
        loop {
            match self.attempt(connector, gauge).await {
                Ok(mut session) => {
                    while self.service(&mut session, gauge).await.is_ok() {}
                }
                Err(_) => delay.delay_ms(self.config.retry_delay_ms).await,
            }
        }
    }
}

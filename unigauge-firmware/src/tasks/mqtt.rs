// MQTT Connector - Broker-Verbindung über embassy-net und rust-mqtt
//
// Implementiert `MqttConnector`/`MqttSession` aus unigauge-core. Die
// Reconnect-Logik selbst liegt im `LinkManager`.
use defmt::{Debug2Format, info, warn};
use embassy_net::{IpAddress, Ipv4Address, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, with_timeout};
use heapless::{String, Vec};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use unigauge_core::{DeviceId, InboundMessage, LinkError, MqttConnector, MqttSession};

use crate::config::*;
use crate::tasks::wifi::network_ready;

/// Maximale Anzahl MQTT v5 Properties pro Paket
const MQTT_MAX_PROPERTIES: usize = 5;

/// Verbindet mit dem konfigurierten Broker
///
/// Besitzt alle Socket- und MQTT-Puffer. Eine `BrokerSession` leiht sie
/// für ihre Lebensdauer aus, daher ist immer nur eine Session aktiv.
pub struct BrokerConnector {
    stack: Stack<'static>,
    client_id: DeviceId,
    rx_buffer: [u8; TCP_RX_BUFFER_SIZE],
    tx_buffer: [u8; TCP_TX_BUFFER_SIZE],
    send_buffer: [u8; MQTT_BUFFER_SIZE],
    recv_buffer: [u8; MQTT_BUFFER_SIZE],
}

impl BrokerConnector {
    pub fn new(stack: Stack<'static>) -> Self {
        Self {
            stack,
            client_id: DeviceId::new(),
            rx_buffer: [0; TCP_RX_BUFFER_SIZE],
            tx_buffer: [0; TCP_TX_BUFFER_SIZE],
            send_buffer: [0; MQTT_BUFFER_SIZE],
            recv_buffer: [0; MQTT_BUFFER_SIZE],
        }
    }
}

impl MqttConnector for BrokerConnector {
    type Session<'s>
        = BrokerSession<'s>
    where
        Self: 's;

    fn network_up(&self) -> bool {
        network_ready(self.stack)
    }

    /// DNS-Auflösung, TCP-Verbindung und MQTT CONNECT
    async fn connect(&mut self, client_id: &str) -> Result<BrokerSession<'_>, LinkError> {
        let Self {
            stack,
            client_id: id_buffer,
            rx_buffer,
            tx_buffer,
            send_buffer,
            recv_buffer,
        } = self;

        let broker_ip = resolve_broker(*stack, MQTT_BROKER).await?;
        info!(
            "MQTT: Broker {} -> {}:{}",
            MQTT_BROKER,
            Debug2Format(&broker_ip),
            MQTT_PORT
        );

        let mut socket = TcpSocket::new(*stack, rx_buffer, tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(TCP_TIMEOUT_SECS)));
        socket.connect((broker_ip, MQTT_PORT)).await.map_err(|e| {
            warn!("MQTT: TCP connect failed: {}", Debug2Format(&e));
            LinkError::ConnectFailed
        })?;
        info!("MQTT: TCP connected");

        // Client-ID muss so lange leben wie die Session
        id_buffer.clear();
        id_buffer
            .push_str(client_id)
            .map_err(|_| LinkError::ConnectFailed)?;
        let client_id: &str = id_buffer;

        let rng = CountingRng(20000);
        let mut config = ClientConfig::<MQTT_MAX_PROPERTIES, _>::new(MqttVersion::MQTTv5, rng);
        config.client_id = EncodedString {
            string: client_id,
            len: client_id.len() as u16,
        };
        config.keep_alive = MQTT_KEEP_ALIVE_SECS;
        config.max_packet_size = MQTT_BUFFER_SIZE as u32;
        if let Some(username) = MQTT_USERNAME {
            config.add_username(username);
        }
        if let Some(password) = MQTT_PASSWORD {
            config.add_password(password);
        }

        let mut client = MqttClient::<_, MQTT_MAX_PROPERTIES, _>::new(
            socket,
            send_buffer,
            MQTT_BUFFER_SIZE,
            recv_buffer,
            MQTT_BUFFER_SIZE,
            config,
        );

        client.connect_to_broker().await.map_err(|code| {
            warn!("MQTT: CONNECT rejected: {}", Debug2Format(&code));
            LinkError::ConnectFailed
        })?;

        Ok(BrokerSession {
            client,
            connected: true,
            topic: String::new(),
            payload: Vec::new(),
        })
    }
}

/// Aktive MQTT-Session
///
/// Die zuletzt empfangene Nachricht wird in eigene Puffer kopiert, damit
/// sie unabhängig vom Empfangspuffer des Clients dispatcht werden kann.
pub struct BrokerSession<'s> {
    client: MqttClient<'s, TcpSocket<'s>, MQTT_MAX_PROPERTIES, CountingRng>,
    connected: bool,
    topic: String<MQTT_MAX_TOPIC_LEN>,
    payload: Vec<u8, MQTT_BUFFER_SIZE>,
}

impl MqttSession for BrokerSession<'_> {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), LinkError> {
        self.client.subscribe_to_topic(topic).await.map_err(|code| {
            warn!("MQTT: SUBSCRIBE {} failed: {}", topic, Debug2Format(&code));
            self.connected = false;
            LinkError::SubscribeFailed
        })
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        self.client
            .send_message(topic, payload, QualityOfService::QoS0, false)
            .await
            .map_err(|code| {
                warn!("MQTT: PUBLISH to {} failed: {}", topic, Debug2Format(&code));
                self.connected = false;
                LinkError::PublishFailed
            })
    }

    /// Wartet höchstens die halbe Keep-Alive-Zeit auf eine Nachricht,
    /// danach wird ein PINGREQ gesendet
    async fn poll(&mut self) -> Result<Option<InboundMessage<'_>>, LinkError> {
        let wait = Duration::from_secs(u64::from(MQTT_KEEP_ALIVE_SECS / 2));

        // Ein Timeout mitten in einem Paket bringt den Stream aus dem Takt.
        // Der folgende Receive oder PINGREQ schlägt dann fehl und die Session
        // wird über den Reconnect neu aufgebaut. Das wird in Kauf genommen.
        match with_timeout(wait, self.client.receive_message()).await {
            Ok(Ok((topic, payload))) => {
                self.topic.clear();
                self.payload.clear();
                if self.topic.push_str(topic).is_err() {
                    warn!("MQTT: Dropping message, topic too long");
                    return Ok(None);
                }
                if self.payload.extend_from_slice(payload).is_err() {
                    warn!("MQTT: Dropping message, payload too large");
                    return Ok(None);
                }
            }
            Ok(Err(code)) => {
                warn!("MQTT: Receive failed: {}", Debug2Format(&code));
                self.connected = false;
                return Err(LinkError::Lost);
            }
            Err(_) => {
                self.client.send_ping().await.map_err(|code| {
                    warn!("MQTT: PINGREQ failed: {}", Debug2Format(&code));
                    self.connected = false;
                    LinkError::Lost
                })?;
                return Ok(None);
            }
        }

        Ok(Some(InboundMessage {
            topic: &self.topic,
            payload: &self.payload,
        }))
    }
}

/// Löst den Broker zu einer IPv4-Adresse auf
///
/// IPv4-Literale werden direkt übernommen, Hostnamen über den
/// embassy-net DNS-Stack mit Timeout aufgelöst.
async fn resolve_broker(stack: Stack<'_>, host: &str) -> Result<Ipv4Address, LinkError> {
    if let Ok(ip) = host.parse::<Ipv4Address>() {
        return Ok(ip);
    }

    info!("MQTT: Resolving '{}'...", host);
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(host, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(LinkError::ConnectFailed),
        Ok(Err(e)) => {
            warn!("MQTT: DNS lookup failed: {}", Debug2Format(&e));
            Err(LinkError::ConnectFailed)
        }
        Err(_) => {
            warn!("MQTT: DNS lookup timed out");
            Err(LinkError::ConnectFailed)
        }
    }
}

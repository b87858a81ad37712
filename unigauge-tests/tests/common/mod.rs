//! Gemeinsame Mocks für die Integration Tests
//!
//! Alle Mocks zeichnen ihre Aufrufe auf, damit Tests Reihenfolge und
//! Anzahl prüfen können.

#![allow(dead_code)]

use std::collections::VecDeque;

use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use rgb::RGB8;
use unigauge_core::{
    InboundMessage, LedError, LinkError, MqttConnector, MqttSession, PixelDriver, StatusLayout,
};

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const RED: RGB8 = RGB8 { r: 32, g: 0, b: 0 };
pub const GREEN: RGB8 = RGB8 { r: 0, g: 32, b: 0 };

pub const LAYOUT: StatusLayout = StatusLayout::DEFAULT;

pub const DEVICE_ID: &str = "004";
pub const INBOUND_TOPIC: &str = "/unigauge/down/004";
pub const OUTBOUND_TOPIC: &str = "/unigauge/up/004";

/// Baut eine Nachricht `{"LEDS":[[r,g,b],...]}`
pub fn leds_json(colors: &[[i32; 3]]) -> String {
    let entries: Vec<String> = colors
        .iter()
        .map(|[r, g, b]| format!("[{},{},{}]", r, g, b))
        .collect();
    format!("{{\"LEDS\":[{}]}}", entries.join(","))
}

pub fn message(payload: &str) -> InboundMessage<'_> {
    InboundMessage {
        topic: INBOUND_TOPIC,
        payload: payload.as_bytes(),
    }
}

// ============================================================================
// Mock Pixel Driver
// ============================================================================

pub struct MockPixelDriver {
    /// Aktueller Puffer (vor `show`)
    pub pixels: Vec<RGB8>,
    /// Alle `set_pixel` Aufrufe in Reihenfolge
    pub set_calls: Vec<(usize, RGB8)>,
    pub clear_count: usize,
    pub show_count: usize,
    /// Puffer-Kopie bei jedem erfolgreichen `show`
    pub shown: Vec<Vec<RGB8>>,
    /// Simuliere Fehler beim nächsten show()
    pub fail_next_show: bool,
}

impl MockPixelDriver {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![OFF; len],
            set_calls: Vec::new(),
            clear_count: 0,
            show_count: 0,
            shown: Vec::new(),
            fail_next_show: false,
        }
    }

    /// Zuletzt auf den Strip geschriebener Zustand
    pub fn last_shown(&self) -> Option<&[RGB8]> {
        self.shown.last().map(Vec::as_slice)
    }

    pub fn reset_counters(&mut self) {
        self.set_calls.clear();
        self.clear_count = 0;
        self.show_count = 0;
        self.shown.clear();
    }
}

impl PixelDriver for MockPixelDriver {
    fn set_pixel(&mut self, index: usize, color: RGB8) {
        self.set_calls.push((index, color));
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn clear(&mut self) {
        self.clear_count += 1;
        self.pixels.fill(OFF);
    }

    fn show(&mut self) -> Result<(), LedError> {
        if self.fail_next_show {
            self.fail_next_show = false;
            return Err(LedError::WriteFailed);
        }
        self.show_count += 1;
        self.shown.push(self.pixels.clone());
        Ok(())
    }
}

// ============================================================================
// Mock Broker (Connector + Session)
// ============================================================================

#[derive(Default)]
pub struct MockBroker {
    pub network_up: bool,
    /// Ergebnisse für die nächsten `connect` Aufrufe, danach immer Ok
    pub connect_script: VecDeque<Result<(), LinkError>>,
    /// Client-IDs aller `connect` Aufrufe
    pub connects: Vec<String>,
    pub subscriptions: Vec<String>,
    pub publications: Vec<(String, Vec<u8>)>,
    /// Eingehende Nachrichten (Topic, Payload)
    pub inbox: VecDeque<(String, Vec<u8>)>,
    pub fail_subscribe: bool,
    pub fail_publish: bool,
    /// Die nächste Session bricht nach so vielen `poll` Aufrufen ab
    pub disconnect_after: Option<usize>,
}

impl MockBroker {
    pub fn online() -> Self {
        Self {
            network_up: true,
            ..Self::default()
        }
    }

    pub fn push_message(&mut self, topic: &str, payload: &str) {
        self.inbox
            .push_back((topic.to_string(), payload.as_bytes().to_vec()));
    }
}

pub struct MockSession<'s> {
    broker: &'s mut MockBroker,
    connected: bool,
    polls_left: Option<usize>,
    current: Option<(String, Vec<u8>)>,
}

impl MockSession<'_> {
    /// Simuliert einen Verbindungsabbruch durch den Broker
    pub fn drop_connection(&mut self) {
        self.connected = false;
    }
}

impl MqttConnector for MockBroker {
    type Session<'s>
        = MockSession<'s>
    where
        Self: 's;

    fn network_up(&self) -> bool {
        self.network_up
    }

    async fn connect(&mut self, client_id: &str) -> Result<MockSession<'_>, LinkError> {
        self.connects.push(client_id.to_string());
        yield_now().await;

        self.connect_script.pop_front().unwrap_or(Ok(()))?;
        let polls_left = self.disconnect_after.take();
        Ok(MockSession {
            broker: self,
            connected: true,
            polls_left,
            current: None,
        })
    }
}

impl MqttSession for MockSession<'_> {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), LinkError> {
        if self.broker.fail_subscribe {
            self.connected = false;
            return Err(LinkError::SubscribeFailed);
        }
        self.broker.subscriptions.push(topic.to_string());
        Ok(())
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        if self.broker.fail_publish {
            self.connected = false;
            return Err(LinkError::PublishFailed);
        }
        self.broker
            .publications
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    async fn poll(&mut self) -> Result<Option<InboundMessage<'_>>, LinkError> {
        if let Some(left) = self.polls_left.as_mut() {
            if *left == 0 {
                self.connected = false;
                return Err(LinkError::Lost);
            }
            *left -= 1;
        }

        yield_now().await;

        match self.broker.inbox.pop_front() {
            Some(next) => {
                let (topic, payload) = &*self.current.insert(next);
                Ok(Some(InboundMessage { topic, payload }))
            }
            None => Ok(None),
        }
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Zeichnet jede Wartezeit in Millisekunden auf, wartet aber nicht
#[derive(Default)]
pub struct MockDelay {
    pub delays_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        yield_now().await;
    }
}

/// Endet nach `polls` Executor-Durchläufen; zum Abbrechen von `run`
pub async fn stop_after(polls: usize) {
    for _ in 0..polls {
        yield_now().await;
    }
}

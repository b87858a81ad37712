//! uniGauge Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Parser, Status-Modell und MQTT-Link laufen gegen Traits und sind
//! damit auf dem Host testbar.

#![no_std]

// Muss als erstes Modul kommen, damit die Log-Makros überall sichtbar sind
mod fmt;

pub mod gauge;
pub mod link;
pub mod parser;
pub mod status;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use gauge::Gauge;
pub use link::{
    DeviceId, LinkConfig, LinkManager, MAX_TOPIC_LEN, announcement, device_id_from_seed,
};
pub use parser::{ParseError, parse};
pub use status::{indicator_color, render_status};
pub use traits::{LedError, LinkError, MqttConnector, MqttSession, PixelDriver};
pub use types::{
    ColorBuffer, Health, InboundMessage, LinkState, MAX_PAYLOAD_LEN, Status, StatusLayout,
};

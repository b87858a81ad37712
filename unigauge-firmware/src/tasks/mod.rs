// Task-Modul: Enthält alle Embassy Tasks
//
// WiFi und Netzwerk-Stack laufen in eigenen Tasks. Der Gauge-Task besitzt
// LED-Strip und MQTT-Session, daher gibt es keine Channels zwischen Tasks.

pub mod gauge;
pub mod mqtt;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use gauge::gauge_task;
pub use wifi::{connection_task, dhcp_task, net_task};

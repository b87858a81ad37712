// Library-Root: Firmware-Module für die uniGauge
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von unigauge-core
pub use unigauge_core::{Gauge, LinkManager, PixelDriver};

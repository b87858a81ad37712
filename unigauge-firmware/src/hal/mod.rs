// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus unigauge-core für die echte Hardware.

pub mod pixel_driver;

pub use pixel_driver::{LED_BUFFER_SIZE, RmtPixelDriver};

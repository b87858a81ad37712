// RMT Pixel-Treiber für den WS2812/Neopixel Strip
//
// Hält einen Farbpuffer für alle LEDs. `set_pixel` und `clear` ändern nur
// den Puffer, `show` schreibt den kompletten Strip über das RMT Peripheral.

use esp_hal::Blocking;
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;
use unigauge_core::{LedError, PixelDriver};

use crate::config::LED_COUNT;

/// Buffer-Größe für den Strip (3 Farben * 8 Bits pro LED + 1 Reset)
pub const LED_BUFFER_SIZE: usize = LED_COUNT * 24 + 1;

const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Real Hardware Pixel-Treiber
///
/// Hinweis: Der RMT-Buffer muss 'static sein, daher wird er im Task erstellt
/// und als Parameter übergeben statt im Constructor allokiert.
pub struct RmtPixelDriver<'a> {
    led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
    pixels: [RGB8; LED_COUNT],
}

impl<'a> RmtPixelDriver<'a> {
    /// Erstellt einen neuen RmtPixelDriver
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für die LED-Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!(LED_COUNT) Macro)
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [PulseCode; LED_BUFFER_SIZE],
    ) -> Result<Self, LedError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::WriteFailed)?;

        let led = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Ok(Self {
            led,
            pixels: [OFF; LED_COUNT],
        })
    }
}

impl PixelDriver for RmtPixelDriver<'_> {
    fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn clear(&mut self) {
        self.pixels = [OFF; LED_COUNT];
    }

    fn show(&mut self) -> Result<(), LedError> {
        self.led
            .write(self.pixels.iter().copied())
            .map_err(|_| LedError::WriteFailed)
    }
}

//! Status-LEDs: WiFi, MQTT und Parser
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::traits::{LedError, PixelDriver};
use crate::types::{Health, Status, StatusLayout};

/// Farbe einer Status-LED: gedimmtes Grün für OK, gedimmtes Rot für Fehler
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use unigauge_core::{Health, indicator_color};
/// assert_eq!(indicator_color(Health::Ok, 32), RGB8 { r: 0, g: 32, b: 0 });
/// assert_eq!(indicator_color(Health::Fail, 32), RGB8 { r: 32, g: 0, b: 0 });
/// ```
pub fn indicator_color(health: Health, brightness: u8) -> RGB8 {
    match health {
        Health::Ok => RGB8 {
            r: 0,
            g: brightness,
            b: 0,
        },
        Health::Fail => RGB8 {
            r: brightness,
            g: 0,
            b: 0,
        },
    }
}

/// Zeichnet die drei Status-LEDs neu
///
/// Löscht den Strip, setzt MQTT-, WiFi- und Parser-LED aus dem aktuellen
/// Status und ruft `show()` auf. Der gleiche Status ergibt immer die
/// gleiche Ausgabe.
pub fn render_status<P: PixelDriver>(
    driver: &mut P,
    status: &Status,
    layout: &StatusLayout,
) -> Result<(), LedError> {
    driver.clear();
    driver.set_pixel(layout.link, indicator_color(status.link, layout.brightness));
    driver.set_pixel(
        layout.network,
        indicator_color(status.network, layout.brightness),
    );
    driver.set_pixel(
        layout.parser,
        indicator_color(status.parser, layout.brightness),
    );
    driver.show()
}

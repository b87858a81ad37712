//! JSON-Parser für LED-Frames
//!
//! Erwartetes Format:
//!
//! ```text
//! { "LEDS": [ [R,G,B], [R,G,B], ... genau N Einträge ] }
//! ```
//!
//! Dekodiert wird mit serde-json-core in einen `heapless::Vec`, es gibt also
//! keine Heap-Allokation und keine Payload die über die Kapazität hinaus
//! akzeptiert wird.

use heapless::Vec;
use rgb::RGB8;
use serde::Deserialize;

use crate::types::{ColorBuffer, MAX_PAYLOAD_LEN};

/// Fehler beim Dekodieren eines LED-Frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Kein gültiges JSON, falsche Struktur, fehlender Schlüssel,
    /// falsche Anzahl Einträge oder Payload zu groß
    Malformed,
    /// Ganzzahliger Kanalwert außerhalb von 0-255
    OutOfRange { pixel: usize, value: i64 },
}

#[derive(Deserialize)]
struct LedFrame<const N: usize> {
    #[serde(rename = "LEDS")]
    leds: Vec<[i64; 3], N>,
}

/// Dekodiert eine Payload in einen kompletten Farbpuffer
///
/// Entweder werden alle `N` Einträge geliefert oder ein Fehler - nie ein
/// teilweise gefüllter Puffer.
///
/// # Beispiele
///
/// ```
/// # use unigauge_core::parse;
/// let frame = parse::<2>(br#"{"LEDS":[[0,0,0],[255,0,0]]}"#).unwrap();
/// assert_eq!(frame[1].r, 255);
/// ```
pub fn parse<const N: usize>(payload: &[u8]) -> Result<ColorBuffer<N>, ParseError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        warn!(
            "Parser: Payload too large ({} > {} bytes)",
            payload.len(),
            MAX_PAYLOAD_LEN
        );
        return Err(ParseError::Malformed);
    }

    let (frame, _) =
        serde_json_core::from_slice::<LedFrame<N>>(payload).map_err(|_| ParseError::Malformed)?;

    if frame.leds.len() != N {
        warn!(
            "Parser: Expected {} LEDs, got {}",
            N,
            frame.leds.len()
        );
        return Err(ParseError::Malformed);
    }

    let mut pixels = [RGB8::default(); N];
    for (pixel, ([r, g, b], slot)) in frame.leds.iter().zip(pixels.iter_mut()).enumerate() {
        *slot = RGB8 {
            r: channel(pixel, *r)?,
            g: channel(pixel, *g)?,
            b: channel(pixel, *b)?,
        };
    }

    Ok(ColorBuffer::from_pixels(pixels))
}

fn channel(pixel: usize, value: i64) -> Result<u8, ParseError> {
    u8::try_from(value).map_err(|_| ParseError::OutOfRange { pixel, value })
}

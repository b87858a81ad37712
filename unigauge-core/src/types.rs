//! Core Types für die Gauge
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::ops::Index;

use rgb::RGB8;

/// Maximale Payload-Größe einer eingehenden Nachricht in Bytes
pub const MAX_PAYLOAD_LEN: usize = 2048;

/// Farbpuffer für den kompletten LED-Strip
///
/// Länge `N` ist zur Compile-Zeit fest, Index `i` entspricht LED `i` auf dem Strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBuffer<const N: usize> {
    pixels: [RGB8; N],
}

impl<const N: usize> ColorBuffer<N> {
    /// Alle LEDs aus (0, 0, 0)
    pub const fn new() -> Self {
        Self {
            pixels: [RGB8 { r: 0, g: 0, b: 0 }; N],
        }
    }

    pub const fn from_pixels(pixels: [RGB8; N]) -> Self {
        Self { pixels }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn get(&self, index: usize) -> Option<RGB8> {
        self.pixels.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.pixels.iter().copied()
    }
}

impl<const N: usize> Default for ColorBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Index<usize> for ColorBuffer<N> {
    type Output = RGB8;

    fn index(&self, index: usize) -> &RGB8 {
        &self.pixels[index]
    }
}

/// Zustand eines einzelnen Status-Felds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Health {
    Ok,
    Fail,
}

impl Health {
    pub fn from_bool(ok: bool) -> Self {
        if ok { Health::Ok } else { Health::Fail }
    }
}

/// Status für die drei Anzeige-LEDs
///
/// Startwerte: WiFi und MQTT getrennt, Parser optimistisch OK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub network: Health,
    pub link: Health,
    pub parser: Health,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            network: Health::Fail,
            link: Health::Fail,
            parser: Health::Ok,
        }
    }
}

/// Zuordnung der Status-Felder zu LED-Indizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLayout {
    pub network: usize,
    pub link: usize,
    pub parser: usize,
    /// Helligkeit der Status-LEDs (0-255)
    pub brightness: u8,
}

impl StatusLayout {
    pub const DEFAULT: Self = Self {
        network: 3,
        link: 9,
        parser: 6,
        brightness: 32,
    };

    /// Prüft ob alle drei Indizes auf einen Strip der Länge `len` passen
    pub const fn fits(&self, len: usize) -> bool {
        self.network < len && self.link < len && self.parser < len
    }
}

impl Default for StatusLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Eingehende MQTT-Nachricht
///
/// Lebt nur für die Dauer eines Dispatch-Aufrufs.
#[derive(Debug, Clone, Copy)]
pub struct InboundMessage<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
}

/// Zustände des MQTT-Links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

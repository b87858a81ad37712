//! Gauge - Anwendungszustand
//!
//! Besitzt LED-Treiber, Farbpuffer und Status. Wird vom Gauge-Task
//! exklusiv gehalten, daher keine Locks und keine globalen Variablen.

use crate::parser::{ParseError, parse};
use crate::status::render_status;
use crate::traits::PixelDriver;
use crate::types::{ColorBuffer, Health, InboundMessage, Status, StatusLayout};

pub struct Gauge<P: PixelDriver, const N: usize> {
    driver: P,
    layout: StatusLayout,
    frame: ColorBuffer<N>,
    status: Status,
}

impl<P: PixelDriver, const N: usize> Gauge<P, N> {
    pub fn new(driver: P, layout: StatusLayout) -> Self {
        Self {
            driver,
            layout,
            frame: ColorBuffer::new(),
            status: Status::default(),
        }
    }

    /// Zeigt den Start-Status (WiFi rot, MQTT rot, Parser grün)
    pub fn start(&mut self) {
        info!("Gauge: Starting with {} LEDs", N);
        self.render_status();
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Zuletzt gültig empfangener Frame
    pub fn frame(&self) -> &ColorBuffer<N> {
        &self.frame
    }

    pub fn driver(&self) -> &P {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut P {
        &mut self.driver
    }

    pub fn render_status(&mut self) {
        if render_status(&mut self.driver, &self.status, &self.layout).is_err() {
            error!("Gauge: Failed to write status LEDs");
        }
    }

    /// Aktualisiert den Netzwerk-Status
    ///
    /// Zeichnet nur bei einer Änderung neu. Gibt zurück ob sich etwas geändert hat.
    pub fn update_network(&mut self, up: bool) -> bool {
        let health = Health::from_bool(up);
        if self.status.network == health {
            return false;
        }
        info!("Gauge: Network {}", if up { "up" } else { "down" });
        self.status.network = health;
        self.render_status();
        true
    }

    pub fn set_link(&mut self, health: Health) {
        self.status.link = health;
        self.render_status();
    }

    /// Verarbeitet eine eingehende Nachricht
    ///
    /// Bei Erfolg wird der komplette Farbpuffer ersetzt und auf den Strip
    /// geschrieben. Bei einem Fehler bleibt der Puffer unverändert und nur
    /// die Status-LEDs werden neu gezeichnet.
    pub fn handle_message(&mut self, message: &InboundMessage<'_>) -> Result<(), ParseError> {
        info!(
            "Gauge: Message received on '{}' ({} bytes)",
            message.topic,
            message.payload.len()
        );

        match parse::<N>(message.payload) {
            Ok(frame) => {
                self.status.parser = Health::Ok;
                self.frame = frame;
                self.show_frame();
                Ok(())
            }
            Err(e) => {
                warn!("Gauge: Rejected message: {}", e);
                self.status.parser = Health::Fail;
                self.render_status();
                Err(e)
            }
        }
    }

    fn show_frame(&mut self) {
        for (index, color) in self.frame.iter().enumerate() {
            debug!(
                "Gauge: LED {}: ({}, {}, {})",
                index, color.r, color.g, color.b
            );
            self.driver.set_pixel(index, color);
        }
        if self.driver.show().is_err() {
            error!("Gauge: Failed to write LED frame");
        }
    }
}

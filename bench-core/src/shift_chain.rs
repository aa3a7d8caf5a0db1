//! Treiber für die 48-Bit Schieberegister-Kette am 50-Pin-Stecker
//!
//! Ablauf pro Aufruf:
//! 1. OE low (Ausgänge aktiv)
//! 2. 48 Bits über SER/SRCLK hineinschieben
//! 3. RCLK-Puls: Schieberegister ins Ausgangsregister übernehmen
//! 4. 48 weitere SRCLK-Pulse, dabei OUT lesen
//!
//! Das Protokoll hat keine Prüfsumme: ein abgezogener Stecker liefert
//! dieselben Nullen wie ein echter Null-Frame.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::BenchError;
use crate::traits::{drive, sample};
use crate::types::{FRAME_BITS, Frame};

/// Leitungen der Kette
pub struct ShiftChainPins<O, I> {
    /// Serielle Daten (SER)
    pub ser: O,
    /// Output Enable (active low)
    pub oe: O,
    /// Schiebe-Takt (SRCLK)
    pub srclk: O,
    /// Latch-Takt (RCLK)
    pub rclk: O,
    /// Rücklese-Leitung vom Ende der Kette
    pub out: I,
}

pub struct ShiftChain<O, I> {
    pins: ShiftChainPins<O, I>,
    pulse_ns: u32,
}

impl<O, I> ShiftChain<O, I>
where
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
{
    /// Erstellt den Treiber und bringt alle Takte in den Ruhezustand (low)
    pub fn new(mut pins: ShiftChainPins<O, I>, pulse_ns: u32) -> Self {
        drive(&mut pins.srclk, false);
        drive(&mut pins.rclk, false);
        Self { pins, pulse_ns }
    }

    /// Schiebt eine beliebige Bitfolge hinaus und liest 48 Bits zurück
    ///
    /// # Fehlerbehandlung
    /// Gibt `BenchError::InvalidFrameLength` zurück wenn `bits.len() != 48`.
    /// In dem Fall wird keine einzige Leitung angefasst.
    pub fn exchange<D: DelayNs>(&mut self, bits: &[bool], delay: &mut D) -> Result<Frame, BenchError> {
        let frame = Frame::try_from(bits)?;
        Ok(self.exchange_frame(&frame, delay))
    }

    /// Wie `exchange()`, aber mit bereits geprüftem Frame
    pub fn exchange_frame<D: DelayNs>(&mut self, frame: &Frame, delay: &mut D) -> Frame {
        drive(&mut self.pins.oe, false);

        for &bit in frame.bits() {
            drive(&mut self.pins.ser, bit);
            delay.delay_ns(self.pulse_ns);
            drive(&mut self.pins.srclk, true);
            delay.delay_ns(self.pulse_ns);
            drive(&mut self.pins.srclk, false);
        }

        drive(&mut self.pins.rclk, true);
        delay.delay_ns(self.pulse_ns);
        drive(&mut self.pins.rclk, false);

        let mut readback = [false; FRAME_BITS];
        for slot in readback.iter_mut() {
            drive(&mut self.pins.srclk, true);
            delay.delay_ns(self.pulse_ns);
            *slot = sample(&mut self.pins.out);
            drive(&mut self.pins.srclk, false);
            delay.delay_ns(self.pulse_ns);
        }

        Frame::new(readback)
    }
}

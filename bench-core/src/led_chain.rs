//! Treiber für die LED-Schieberegister-Kette (4 × RGB = 12 Bits)
//!
//! Nur schreibend, kein Rücklesen. OE bleibt dauerhaft aktiv und
//! SRCLR dauerhaft high (kein Löschen).

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::traits::drive;
use crate::types::LedState;

/// Leitungen der LED-Kette
pub struct LedChainPins<O> {
    pub ser: O,
    /// Schiebe-Takt (SRCK)
    pub srck: O,
    /// Latch (RCK)
    pub rck: O,
    /// Output Enable (active low)
    pub oe: O,
    /// Shift Register Clear (active low)
    pub srclr: O,
}

pub struct LedChain<O> {
    pins: LedChainPins<O>,
    pulse_ns: u32,
}

impl<O: OutputPin<Error = Infallible>> LedChain<O> {
    pub fn new(mut pins: LedChainPins<O>, pulse_ns: u32) -> Self {
        drive(&mut pins.oe, false);
        drive(&mut pins.srclr, true);
        drive(&mut pins.rck, false);
        drive(&mut pins.srck, false);
        Self { pins, pulse_ns }
    }

    /// Schiebt den LED-Zustand in die Kette und latcht ihn auf die Ausgänge
    pub fn update<D: DelayNs>(&mut self, state: &LedState, delay: &mut D) {
        drive(&mut self.pins.oe, false);
        drive(&mut self.pins.rck, false);

        for bit in state.bits() {
            drive(&mut self.pins.ser, bit);
            drive(&mut self.pins.srck, true);
            delay.delay_ns(self.pulse_ns);
            drive(&mut self.pins.srck, false);
            delay.delay_ns(self.pulse_ns);
        }

        drive(&mut self.pins.rck, true);
        delay.delay_ns(self.pulse_ns);
        drive(&mut self.pins.rck, false);
    }
}

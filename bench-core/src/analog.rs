//! Messwerte: Schienenspannungen, Antennen-Sense und Mode-Pins

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::config::Calibration;
use crate::logic::adc_to_volts;
use crate::traits::{AnalogChannel, AnalogInputs, sample};
use crate::types::{ModeBits, Rail};

pub struct Sensors<A, I> {
    adc: A,
    /// Mode-Pins, MSB zuerst
    mode: [I; 4],
}

impl<A, I> Sensors<A, I>
where
    A: AnalogInputs,
    I: InputPin<Error = Infallible>,
{
    pub fn new(adc: A, mode: [I; 4]) -> Self {
        Self { adc, mode }
    }

    /// Liest eine Schiene und rechnet in Volt um
    pub fn read_voltage(&mut self, rail: Rail, calibration: &Calibration) -> f32 {
        let channel = match rail {
            Rail::Fixed => AnalogChannel::FixedRail,
            Rail::Adjustable => AnalogChannel::AdjustableRail,
        };
        adc_to_volts(self.adc.read_u16(channel), calibration)
    }

    /// Rohwert des Antennen-Sense-Kanals, ohne Umrechnung
    pub fn read_sense(&mut self) -> u16 {
        self.adc.read_u16(AnalogChannel::AntennaSense)
    }

    /// Liest die 4 Mode-Pins in fester Reihenfolge
    pub fn read_mode(&mut self) -> ModeBits {
        let mut bits = [false; 4];
        for (bit, pin) in bits.iter_mut().zip(self.mode.iter_mut()) {
            *bit = sample(pin);
        }
        ModeBits(bits)
    }
}

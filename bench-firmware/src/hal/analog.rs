// ADC-Bank: die drei analogen Eingänge des Boards auf ADC1
//
// Implementiert bench_core::AnalogInputs, damit die Core-Logik
// 16-Bit-Samples (0..=65535) bekommt.

use bench_core::{AnalogChannel, AnalogInputs};
use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcPin};
use esp_hal::peripherals::{ADC1, GPIO0, GPIO1, GPIO2};

/// ADC1 mit den Pins für feste Schiene, Antenne und einstellbare Schiene
pub struct AnalogBank {
    pub adc: Adc<'static, ADC1<'static>, Blocking>,
    pub fixed: AdcPin<GPIO0<'static>, ADC1<'static>>,
    pub antenna: AdcPin<GPIO1<'static>, ADC1<'static>>,
    pub adjustable: AdcPin<GPIO2<'static>, ADC1<'static>>,
}

impl AnalogInputs for AnalogBank {
    fn read_u16(&mut self, channel: AnalogChannel) -> u16 {
        let sample = match channel {
            AnalogChannel::FixedRail => nb::block!(self.adc.read_oneshot(&mut self.fixed)),
            AnalogChannel::AntennaSense => nb::block!(self.adc.read_oneshot(&mut self.antenna)),
            AnalogChannel::AdjustableRail => {
                nb::block!(self.adc.read_oneshot(&mut self.adjustable))
            }
        };

        match sample {
            Ok(raw) => widen_to_u16(raw),
            Err(()) => {
                defmt::warn!("ADC: read failed on {}", channel);
                0
            }
        }
    }
}

/// Skaliert ein 12-Bit-Sample auf den vollen 16-Bit-Bereich
///
/// 0 bleibt 0, 4095 wird 65535.
fn widen_to_u16(raw: u16) -> u16 {
    let raw = raw & 0x0FFF;
    (raw << 4) | (raw >> 8)
}

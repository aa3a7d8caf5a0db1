//! Hardware Abstraction Traits
//!
//! Digitale Pins, SPI, PWM und Delay kommen aus embedded-hal 1.0.
//! Für den ADC gibt es dort keinen Trait, daher `AnalogInputs`.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiBus;

/// ADC-Kanäle des Boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    FixedRail,
    AdjustableRail,
    AntennaSense,
}

/// Trait für ADC-Zugriff
///
/// # Implementierungen
/// - **Production:** `AnalogBank` (ESP32-C6 ADC1, auf 16 Bit skaliert)
/// - **Testing:** `MockAnalog` (feste Werte pro Kanal)
pub trait AnalogInputs {
    /// Liest ein 16-Bit Sample (0..=65535)
    ///
    /// Hardware-Fehler sind nicht von echten Messwerten unterscheidbar.
    fn read_u16(&mut self, channel: AnalogChannel) -> u16;
}

/// Bündelt die konkreten Hardware-Typen eines Boards
///
/// Digitale Pins sind infallible (wie bei esp-hal), Bus und PWM dürfen fehlschlagen.
pub trait BoardIo {
    type Output: OutputPin<Error = Infallible>;
    type Input: InputPin<Error = Infallible>;
    type Spi: SpiBus<u8>;
    type Pwm: SetDutyCycle;
    type Analog: AnalogInputs;
    type Delay: DelayNs;
}

/// Setzt einen infallible Output-Pin
#[inline]
pub(crate) fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    let Ok(()) = if high { pin.set_high() } else { pin.set_low() };
}

/// Liest einen infallible Input-Pin
#[inline]
pub(crate) fn sample<P: InputPin<Error = Infallible>>(pin: &mut P) -> bool {
    let Ok(level) = pin.is_high();
    level
}

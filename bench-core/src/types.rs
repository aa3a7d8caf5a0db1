//! Core Types für die Bench-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use rgb::RGB;

use crate::config;
use crate::error::BenchError;

/// Anzahl Bits der Schieberegister-Kette am 50-Pin-Stecker
pub const FRAME_BITS: usize = 48;

/// Anzahl RGB-LEDs in der Status-Kette
pub const LED_COUNT: usize = 4;

/// Farbe einer Status-LED: jeder Kanal ist entweder an oder aus
pub type LedColor = RGB<bool>;

pub const OFF: LedColor = RGB { r: false, g: false, b: false };
pub const RED: LedColor = RGB { r: true, g: false, b: false };
pub const GREEN: LedColor = RGB { r: false, g: true, b: false };
pub const BLUE: LedColor = RGB { r: false, g: false, b: true };
pub const WHITE: LedColor = RGB { r: true, g: true, b: true };

// ============================================================================
// LED State
// ============================================================================

/// Zustand der 4 Status-LEDs
///
/// Änderungen landen erst mit einem expliziten `LedChain::update()` auf der Hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedState([LedColor; LED_COUNT]);

impl LedState {
    /// Alle LEDs aus
    pub const fn new() -> Self {
        Self([OFF; LED_COUNT])
    }

    /// Setzt alle LEDs auf dieselbe Farbe
    pub fn fill(&mut self, color: LedColor) {
        self.0 = [color; LED_COUNT];
    }

    /// Setzt eine einzelne LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `BenchError::OutOfRange` zurück wenn `index >= 4`
    pub fn set(&mut self, index: usize, color: LedColor) -> Result<(), BenchError> {
        let slot = self.0.get_mut(index).ok_or(BenchError::OutOfRange)?;
        *slot = color;
        Ok(())
    }

    /// Setzt LED 0, die Schienen-Anzeige
    pub fn set_first(&mut self, color: LedColor) {
        let [first, ..] = &mut self.0;
        *first = color;
    }

    pub fn get(&self, index: usize) -> Option<LedColor> {
        self.0.get(index).copied()
    }

    pub fn colors(&self) -> &[LedColor; LED_COUNT] {
        &self.0
    }

    /// Die 12 Bits in Schiebe-Reihenfolge: LED 0 (R, G, B), LED 1 (R, G, B), ...
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().flat_map(|c| [c.r, c.g, c.b])
    }
}

impl Default for LedState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}{}{}", c.r as u8, c.g as u8, c.b as u8)?;
        }
        Ok(())
    }
}

// ============================================================================
// Shift-Register Frame
// ============================================================================

/// Genau 48 Bits für die Kette am 50-Pin-Stecker
///
/// Bit 0 wird zuerst geschoben und liegt nach dem Latch am tiefsten in der Kette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([bool; FRAME_BITS]);

impl Frame {
    pub const fn new(bits: [bool; FRAME_BITS]) -> Self {
        Self(bits)
    }

    /// Testmuster 0, 1, 0, 1, ... (wird nach dem Start einmal geschoben)
    pub fn alternating() -> Self {
        let mut bits = [false; FRAME_BITS];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = i % 2 == 1;
        }
        Self(bits)
    }

    pub fn bits(&self) -> &[bool; FRAME_BITS] {
        &self.0
    }

    pub fn bit(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    /// Pegel eines physikalischen Stecker-Pins laut Pin-Mapping
    ///
    /// `None` für Pins die nicht an der Kette hängen (8, 19, 36) oder ungültige Pins.
    pub fn connector_pin(&self, pin: u8) -> Option<bool> {
        config::bit_for_pin(pin).map(|bit| self.0[bit])
    }
}

impl TryFrom<&[bool]> for Frame {
    type Error = BenchError;

    fn try_from(bits: &[bool]) -> Result<Self, Self::Error> {
        let bits: [bool; FRAME_BITS] = bits
            .try_into()
            .map_err(|_| BenchError::InvalidFrameLength { len: bits.len() })?;
        Ok(Self(bits))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

// ============================================================================
// Selektoren
// ============================================================================

/// Überwachte Versorgungsschiene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rail {
    /// Feste 3.3V Schiene
    Fixed,
    /// Einstellbare Schiene (über Potentiometer 0)
    Adjustable,
}

impl Rail {
    /// Potentiometer das diese Schiene einstellt
    pub fn pot_channel(self) -> PotChannel {
        match self {
            Rail::Adjustable => PotChannel::Pot0,
            Rail::Fixed => PotChannel::Pot1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rail::Fixed => "Fixed",
            Rail::Adjustable => "Adjustable",
        }
    }
}

/// Unbekannter Name gibt `BenchError::InvalidChannel`
impl TryFrom<&str> for Rail {
    type Error = BenchError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        if name.eq_ignore_ascii_case("fixed") {
            Ok(Rail::Fixed)
        } else if name.eq_ignore_ascii_case("adjustable") {
            Ok(Rail::Adjustable)
        } else {
            Err(BenchError::InvalidChannel)
        }
    }
}

/// Kanal des Doppel-Potentiometers (MCP42010)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PotChannel {
    Pot0,
    Pot1,
}

impl PotChannel {
    /// Kommando-Byte "Write Data" für diesen Kanal
    pub fn command_byte(self) -> u8 {
        match self {
            PotChannel::Pot0 => 0x11,
            PotChannel::Pot1 => 0x12,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PotChannel::Pot0 => 0,
            PotChannel::Pot1 => 1,
        }
    }
}

impl TryFrom<u8> for PotChannel {
    type Error = BenchError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(PotChannel::Pot0),
            1 => Ok(PotChannel::Pot1),
            _ => Err(BenchError::InvalidChannel),
        }
    }
}

/// Stellung der 4 Mode-Pins, MSB zuerst
///
/// Nur zur Anzeige: es gibt keine numerische Bedeutung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeBits(pub [bool; 4]);

impl fmt::Display for ModeBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

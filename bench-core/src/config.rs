//! Kalibrierung und feste Board-Konfiguration
//!
//! Alle board-spezifischen Konstanten liegen hier, nicht in der Logik.

use crate::types::{BLUE, FRAME_BITS, GREEN, LedColor, RED, WHITE};

// ============================================================================
// ADC Konfiguration
// ============================================================================

/// ADC-Referenzspannung in Volt
pub const ADC_REFERENCE_VOLTS: f32 = 3.3;

/// Spannungsteiler-Kalibrierung des Boards (gemessen, nicht berechnet)
pub const DIVIDER_RATIO: f32 = 3.7;

/// Vollausschlag eines 16-Bit ADC-Samples
pub const ADC_FULL_SCALE: u16 = 65535;

// ============================================================================
// Lüfter Konfiguration
// ============================================================================

/// Unterhalb dieses Prozentwerts bleibt der Lüfter aus
pub const FAN_CUTOFF_PERCENT: u8 = 20;

// ============================================================================
// Timing
// ============================================================================

/// Pulsbreite der 48-Bit-Kette in ns (Settle, Clock-High, Clock-Low)
///
/// Kleinster auf dem Board beobachteter Wert, die echte Grenze hängt vom Baustein ab.
pub const CHAIN_PULSE_NS: u32 = 1_000;

/// Pulsbreite der LED-Kette in ns
pub const LED_PULSE_NS: u32 = 100_000;

/// Beim Start leuchten alle LEDs so lange weiß
pub const STARTUP_WHITE_HOLD_MS: u32 = 1000;

/// Danach sind alle LEDs so lange aus
pub const STARTUP_DARK_HOLD_MS: u32 = 500;

/// Wartezeit zwischen Lüfter-Stopp und Power-Kill
pub const SHUTDOWN_DELAY_MS: u32 = 1000;

// ============================================================================
// Pin-Mapping 50-Pin-Stecker
// ============================================================================

/// Logische Bit-Position -> physikalischer Stecker-Pin
///
/// 47 Einträge für 48 Bits: Bit 47 hat keinen Pin.
pub const PIN_MAP: [u8; 47] = [
    3, 34, 35, 18, 1, 2, 37, 20, 38, 21, 4, 39, 22, 5, 23, 6, 40, 24, 7, 41, 25, 42, 9, 26, 43, 10,
    27, 11, 44, 28, 12, 45, 29, 13, 46, 30, 14, 47, 15, 31, 48, 16, 32, 49, 17, 33, 50,
];

/// Stecker-Pins die nicht an der Schieberegister-Kette hängen
pub const UNMAPPED_PINS: [u8; 3] = [8, 19, 36];

/// Stecker-Pin einer Bit-Position
pub fn pin_for_bit(bit: usize) -> Option<u8> {
    PIN_MAP.get(bit).copied()
}

/// Bit-Position eines Stecker-Pins
pub fn bit_for_pin(pin: u8) -> Option<usize> {
    PIN_MAP.iter().position(|&p| p == pin)
}

const _: () = assert!(PIN_MAP.len() < FRAME_BITS);

// ============================================================================
// Kalibrierung
// ============================================================================

/// Referenzpunkt für die Farb-Klassifizierung der einstellbaren Schiene
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RailColor {
    pub volts: f32,
    pub color: LedColor,
}

/// Kalibrierwerte mit denen ein `Bench` gebaut wird
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    pub adc_reference_volts: f32,
    pub divider_ratio: f32,
    pub fan_cutoff_percent: u8,
    /// Reihenfolge ist relevant: bei Gleichstand gewinnt der erste Eintrag
    pub rail_colors: [RailColor; 4],
    pub chain_pulse_ns: u32,
    pub led_pulse_ns: u32,
}

impl Calibration {
    pub const DEFAULT: Self = Self {
        adc_reference_volts: ADC_REFERENCE_VOLTS,
        divider_ratio: DIVIDER_RATIO,
        fan_cutoff_percent: FAN_CUTOFF_PERCENT,
        rail_colors: [
            RailColor { volts: 3.3, color: RED },
            RailColor { volts: 5.0, color: GREEN },
            RailColor { volts: 8.0, color: BLUE },
            RailColor { volts: 9.0, color: WHITE },
        ],
        chain_pulse_ns: CHAIN_PULSE_NS,
        led_pulse_ns: LED_PULSE_NS,
    };
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_map_has_no_unmapped_pins() {
        for pin in UNMAPPED_PINS {
            assert_eq!(bit_for_pin(pin), None);
        }
    }

    #[test]
    fn test_pin_map_covers_remaining_pins() {
        for pin in 1..=50u8 {
            if UNMAPPED_PINS.contains(&pin) {
                continue;
            }
            let bit = bit_for_pin(pin).expect("pin missing from map");
            assert_eq!(pin_for_bit(bit), Some(pin));
        }
    }

    #[test]
    fn test_last_bit_has_no_pin() {
        assert_eq!(pin_for_bit(47), None);
        assert_eq!(pin_for_bit(0), Some(3));
    }
}

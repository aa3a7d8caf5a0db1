//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::config::{ADC_FULL_SCALE, Calibration, RailColor};
use crate::error::BenchError;
use crate::types::LedColor;

/// Rechnet ein 16-Bit ADC-Sample in die Schienenspannung um
///
/// `volts = raw / 65535 * 3.3 * 3.7` mit den Werten aus der Kalibrierung.
///
/// ```
/// # use bench_core::{Calibration, logic::adc_to_volts};
/// let volts = adc_to_volts(65535, &Calibration::DEFAULT);
/// assert!((volts - 12.21).abs() < 0.001);
/// ```
pub fn adc_to_volts(raw: u16, calibration: &Calibration) -> f32 {
    (raw as f32 / ADC_FULL_SCALE as f32)
        * calibration.adc_reference_volts
        * calibration.divider_ratio
}

/// Rechnet einen Lüfter-Prozentwert in einen PWM-Duty um
///
/// Unter `cutoff` wird der Lüfter nicht angesteuert (Duty 0), darüber
/// `round(percent / 100 * max_duty)`.
///
/// # Fehlerbehandlung
/// Gibt `BenchError::OutOfRange` zurück wenn `percent > 100`
pub fn fan_duty(percent: u8, max_duty: u16, cutoff: u8) -> Result<u16, BenchError> {
    if percent > 100 {
        return Err(BenchError::OutOfRange);
    }
    if percent < cutoff {
        return Ok(0);
    }
    let duty = (percent as u32 * max_duty as u32 + 50) / 100;
    Ok(duty as u16)
}

/// Wählt die Farbe deren Referenzspannung am nächsten liegt
///
/// Bei gleichem Abstand gewinnt der erste Eintrag der Tabelle.
pub fn classify_rail(volts: f32, table: &[RailColor]) -> Option<LedColor> {
    let mut best: Option<(f32, LedColor)> = None;
    for entry in table {
        let distance = abs_diff(volts, entry.volts);
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, entry.color)),
        }
    }
    best.map(|(_, color)| color)
}

fn abs_diff(a: f32, b: f32) -> f32 {
    if a > b { a - b } else { b - a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLUE, GREEN, RED, WHITE};

    const TABLE: [RailColor; 4] = Calibration::DEFAULT.rail_colors;

    #[test]
    fn test_adc_zero_is_zero_volts() {
        assert_eq!(adc_to_volts(0, &Calibration::DEFAULT), 0.0);
    }

    #[test]
    fn test_adc_half_scale() {
        let volts = adc_to_volts(32768, &Calibration::DEFAULT);
        assert!((volts - 6.105).abs() < 0.01);
    }

    #[test]
    fn test_fan_below_cutoff_is_off() {
        for p in 0..20 {
            assert_eq!(fan_duty(p, 65535, 20), Ok(0));
        }
    }

    #[test]
    fn test_fan_full_speed() {
        assert_eq!(fan_duty(100, 65535, 20), Ok(65535));
        assert_eq!(fan_duty(20, 65535, 20), Ok(13107));
        assert_eq!(fan_duty(50, 1023, 20), Ok(512));
    }

    #[test]
    fn test_fan_out_of_range() {
        assert_eq!(fan_duty(101, 65535, 20), Err(BenchError::OutOfRange));
    }

    #[test]
    fn test_fan_duty_monotonic() {
        let mut last = 0;
        for p in 0..=100 {
            let duty = fan_duty(p, 65535, 20).unwrap();
            assert!(duty >= last);
            last = duty;
        }
    }

    #[test]
    fn test_classify_exact_references() {
        assert_eq!(classify_rail(3.3, &TABLE), Some(RED));
        assert_eq!(classify_rail(5.0, &TABLE), Some(GREEN));
        assert_eq!(classify_rail(8.0, &TABLE), Some(BLUE));
        assert_eq!(classify_rail(9.0, &TABLE), Some(WHITE));
    }

    #[test]
    fn test_classify_nearest() {
        // |4.0 - 3.3| = 0.7 < |4.0 - 5.0| = 1.0
        assert_eq!(classify_rail(4.0, &TABLE), Some(RED));
        assert_eq!(classify_rail(4.5, &TABLE), Some(GREEN));
        assert_eq!(classify_rail(12.0, &TABLE), Some(WHITE));
        assert_eq!(classify_rail(0.0, &TABLE), Some(RED));
    }

    #[test]
    fn test_classify_tie_first_entry_wins() {
        // 6.5 liegt genau zwischen 5.0 und 8.0
        assert_eq!(classify_rail(6.5, &TABLE), Some(GREEN));
        // 8.5 liegt genau zwischen 8.0 und 9.0
        assert_eq!(classify_rail(8.5, &TABLE), Some(BLUE));
    }

    #[test]
    fn test_classify_empty_table() {
        assert_eq!(classify_rail(5.0, &[]), None);
    }
}

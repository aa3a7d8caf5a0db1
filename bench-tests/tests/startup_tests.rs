//! Integration Tests für die Start-Choreografie und die Schienen-Farbe

use bench_core::config::RailColor;
use bench_core::logic::classify_rail;
use bench_core::types::{BLUE, GREEN, OFF, RED, WHITE};
use bench_core::{AnalogChannel, Calibration, LedColor};
use bench_tests::{Event, Harness, Line};

fn boot_with(adjustable_volts: f32) -> Harness {
    let mut h = Harness::new();
    h.analog.set(AnalogChannel::FixedRail, Harness::raw_for_volts(3.3));
    h.analog.set(
        AnalogChannel::AdjustableRail,
        Harness::raw_for_volts(adjustable_volts),
    );
    h.bench.startup();
    h
}

fn led0_after_startup(adjustable_volts: f32) -> LedColor {
    boot_with(adjustable_volts).bench.led_state().get(0).unwrap()
}

// ============================================================================
// Choreografie
// ============================================================================

#[test]
fn test_startup_step_order() {
    let h = boot_with(5.0);

    let at = |event: Event| h.trace.position(&event).expect("missing startup step");
    let white_hold = at(Event::DelayNs(1_000_000_000));
    let fixed = at(Event::Adc(AnalogChannel::FixedRail));
    let adjustable = at(Event::Adc(AnalogChannel::AdjustableRail));
    let cs_idle = at(Event::Set(Line::PotCs, true));
    let dark_hold = at(Event::DelayNs(500_000_000));

    assert!(white_hold < fixed);
    assert!(fixed < adjustable);
    assert!(adjustable < cs_idle);
    assert!(cs_idle < dark_hold);
}

#[test]
fn test_startup_led_frames() {
    let h = boot_with(5.0);

    // Drei komplette Updates: weiß, dunkel, LED 0 in Schienen-Farbe
    assert_eq!(h.trace.rising_edges(Line::LedRck), 3);
    let shifted = h.trace.shifted_bits(Line::LedSer, Line::LedSrck);
    assert_eq!(shifted.len(), 36);
    assert!(shifted[..12].iter().all(|&b| b));
    assert!(shifted[12..24].iter().all(|&b| !b));
    assert_eq!(&shifted[24..27], &[false, true, false]);
    assert!(shifted[27..].iter().all(|&b| !b));
}

#[test]
fn test_startup_holds() {
    let h = boot_with(5.0);

    let dark_hold = h.trace.position(&Event::DelayNs(500_000_000)).unwrap();
    let last_latch = h
        .trace
        .events()
        .iter()
        .rposition(|e| *e == Event::Set(Line::LedRck, true))
        .unwrap();
    assert!(dark_hold < last_latch);
}

#[test]
fn test_startup_report() {
    let mut h = Harness::new();
    h.analog.set(AnalogChannel::FixedRail, 65535);
    h.analog.set(AnalogChannel::AdjustableRail, 0);

    let report = h.bench.startup();

    assert!((report.fixed_volts - 12.21).abs() < 0.001);
    assert_eq!(report.adjustable_volts, 0.0);
    assert_eq!(report.rail_color, RED);
}

#[test]
fn test_startup_does_not_touch_fan_or_chain() {
    let h = boot_with(5.0);

    assert!(h.trace.duties().is_empty());
    assert!(h.trace.spi_frames().is_empty());
    assert_eq!(h.trace.rising_edges(Line::Srclk), 0);
    assert_eq!(h.bench.last_read(), None);
}

// ============================================================================
// Farb-Klassifizierung
// ============================================================================

#[test]
fn test_rail_colors_near_reference_points() {
    assert_eq!(led0_after_startup(3.3), RED);
    assert_eq!(led0_after_startup(5.1), GREEN);
    assert_eq!(led0_after_startup(7.8), BLUE);
    assert_eq!(led0_after_startup(9.6), WHITE);
}

#[test]
fn test_four_volts_is_closer_to_red() {
    // |4.0 - 3.3| = 0.7 < |4.0 - 5.0| = 1.0
    assert_eq!(led0_after_startup(4.0), RED);
}

#[test]
fn test_tie_prefers_earlier_entry() {
    let table = Calibration::DEFAULT.rail_colors;

    assert_eq!(classify_rail(6.5, &table), Some(GREEN));
    assert_eq!(classify_rail(8.5, &table), Some(BLUE));
}

#[test]
fn test_other_leds_stay_off() {
    let h = boot_with(8.0);
    let colors = h.bench.led_state().colors();

    assert_eq!(colors[0], BLUE);
    assert_eq!(&colors[1..], &[OFF; 3]);
}

#[test]
fn test_custom_calibration_table() {
    let mut calibration = Calibration::DEFAULT;
    calibration.rail_colors = [
        RailColor { volts: 1.0, color: BLUE },
        RailColor { volts: 2.0, color: BLUE },
        RailColor { volts: 3.0, color: WHITE },
        RailColor { volts: 12.0, color: GREEN },
    ];
    let mut h = Harness::with_calibration(calibration);
    h.analog.set(AnalogChannel::AdjustableRail, 65535);

    let report = h.bench.startup();

    assert_eq!(report.rail_color, GREEN);
}

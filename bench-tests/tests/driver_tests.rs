//! Integration Tests für LED-Kette, Potentiometer und Lüfter
//!
//! Diese Tests laufen auf dem Host (x86_64) gegen die Mocks aus `bench_tests`

use bench_core::fan::{Fan, FanSetting};
use bench_core::led_chain::{LedChain, LedChainPins};
use bench_core::potentiometer::Potentiometer;
use bench_core::types::{BLUE, GREEN, RED, WHITE};
use bench_core::{BenchError, LedState, PotChannel};
use bench_tests::{Event, Line, MockDelay, MockOutput, MockPwm, MockSpi, Trace};
use embedded_hal::spi::ErrorKind;
use rgb::RGB;

// ============================================================================
// LED-Kette
// ============================================================================

fn led_chain(trace: &Trace) -> LedChain<MockOutput> {
    LedChain::new(
        LedChainPins {
            ser: MockOutput::new(Line::LedSer, trace),
            srck: MockOutput::new(Line::LedSrck, trace),
            rck: MockOutput::new(Line::LedRck, trace),
            oe: MockOutput::new(Line::LedOe, trace),
            srclr: MockOutput::new(Line::LedSrclr, trace),
        },
        100_000,
    )
}

#[test]
fn test_led_chain_idle_levels() {
    let trace = Trace::new();
    let _chain = led_chain(&trace);

    assert_eq!(trace.level(Line::LedOe), Some(false));
    assert_eq!(trace.level(Line::LedSrclr), Some(true));
    assert_eq!(trace.level(Line::LedRck), Some(false));
    assert_eq!(trace.level(Line::LedSrck), Some(false));
}

#[test]
fn test_led_chain_shifts_twelve_bits_in_order() {
    let trace = Trace::new();
    let mut chain = led_chain(&trace);
    let mut delay = MockDelay::new(&trace);
    trace.clear();

    let mut state = LedState::new();
    state.set(0, RED).unwrap();
    state.set(1, GREEN).unwrap();
    state.set(2, BLUE).unwrap();
    state.set(3, RGB { r: true, g: true, b: false }).unwrap();

    chain.update(&state, &mut delay);

    let shifted = trace.shifted_bits(Line::LedSer, Line::LedSrck);
    assert_eq!(
        shifted,
        vec![
            true, false, false, // LED 0
            false, true, false, // LED 1
            false, false, true, // LED 2
            true, true, false, // LED 3
        ]
    );
}

#[test]
fn test_led_chain_latches_after_shift() {
    let trace = Trace::new();
    let mut chain = led_chain(&trace);
    let mut delay = MockDelay::new(&trace);
    trace.clear();

    let mut state = LedState::new();
    state.fill(WHITE);
    chain.update(&state, &mut delay);

    let events = trace.events();
    let latch = trace.position(&Event::Set(Line::LedRck, true)).unwrap();
    let clocks_before = events[..latch]
        .iter()
        .filter(|e| **e == Event::Set(Line::LedSrck, true))
        .count();
    assert_eq!(clocks_before, 12);
    assert_eq!(trace.rising_edges(Line::LedRck), 1);
    assert_eq!(trace.level(Line::LedRck), Some(false));
    assert!(trace.total_delay_ns() > 0);
}

// ============================================================================
// Potentiometer
// ============================================================================

fn potentiometer(trace: &Trace) -> Potentiometer<MockSpi, MockOutput> {
    Potentiometer::new(MockSpi::new(trace), MockOutput::new(Line::PotCs, trace))
}

#[test]
fn test_pot_cs_starts_inactive() {
    let trace = Trace::new();
    let _pot = potentiometer(&trace);

    assert_eq!(trace.events(), vec![Event::Set(Line::PotCs, true)]);
}

#[test]
fn test_pot_write_frame_inside_chip_select() {
    let trace = Trace::new();
    let mut pot = potentiometer(&trace);
    trace.clear();

    pot.set_wiper(PotChannel::Pot0, 128).unwrap();

    assert_eq!(
        trace.events(),
        vec![
            Event::Set(Line::PotCs, false),
            Event::SpiWrite(vec![0x11, 128]),
            Event::SpiFlush,
            Event::Set(Line::PotCs, true),
        ]
    );
}

#[test]
fn test_pot_second_channel_command_byte() {
    let trace = Trace::new();
    let mut pot = potentiometer(&trace);

    pot.set_wiper_index(1, 7).unwrap();

    assert_eq!(trace.spi_frames(), vec![vec![0x12, 7]]);
}

#[test]
fn test_pot_invalid_index_no_bus_traffic() {
    let trace = Trace::new();
    let mut pot = potentiometer(&trace);
    trace.clear();

    assert_eq!(pot.set_wiper_index(2, 50), Err(BenchError::InvalidChannel));
    assert_eq!(pot.set_wiper_index(255, 50), Err(BenchError::InvalidChannel));

    assert!(trace.events().is_empty());
}

#[test]
fn test_pot_releases_cs_on_bus_error() {
    let trace = Trace::new();
    let spi = MockSpi::new(&trace);
    let fail = spi.fail_next_write.clone();
    let mut pot = Potentiometer::new(spi, MockOutput::new(Line::PotCs, &trace));
    trace.clear();

    *fail.borrow_mut() = true;
    let result = pot.set_wiper(PotChannel::Pot1, 10);

    assert_eq!(result, Err(BenchError::Bus(ErrorKind::ModeFault)));
    assert_eq!(
        trace.events(),
        vec![Event::Set(Line::PotCs, false), Event::Set(Line::PotCs, true)]
    );

    // Nächster Zugriff funktioniert wieder
    pot.set_wiper(PotChannel::Pot1, 10).unwrap();
    assert_eq!(trace.spi_frames(), vec![vec![0x12, 10]]);
}

// ============================================================================
// Lüfter
// ============================================================================

const MAX_DUTY: u16 = 65535;

fn fan(trace: &Trace) -> Fan<MockPwm> {
    Fan::new(MockPwm::new(MAX_DUTY, trace), 20).unwrap()
}

#[test]
fn test_fan_starts_off() {
    let trace = Trace::new();
    let fan = fan(&trace);

    assert_eq!(trace.duties(), vec![0]);
    assert_eq!(fan.percent(), 0);
}

#[test]
fn test_fan_below_cutoff_writes_zero() {
    let trace = Trace::new();
    let mut fan = fan(&trace);
    trace.clear();

    for percent in [0, 1, 10, 19] {
        assert_eq!(fan.set_speed(percent), Ok(FanSetting::Off));
    }

    assert_eq!(trace.duties(), vec![0, 0, 0, 0]);
}

#[test]
fn test_fan_rounds_to_nearest_duty() {
    let trace = Trace::new();
    let mut fan = fan(&trace);
    trace.clear();

    assert_eq!(fan.set_speed(20), Ok(FanSetting::Running(20)));
    assert_eq!(fan.set_speed(55), Ok(FanSetting::Running(55)));
    assert_eq!(fan.set_speed(100), Ok(FanSetting::Running(100)));

    // 20% von 65535 = 13107, 55% = 36044.25, 100% = 65535
    assert_eq!(trace.duties(), vec![13107, 36044, 65535]);
    assert_eq!(fan.percent(), 100);
}

#[test]
fn test_fan_out_of_range_keeps_duty() {
    let trace = Trace::new();
    let mut fan = fan(&trace);
    fan.set_speed(50).unwrap();
    trace.clear();

    assert_eq!(fan.set_speed(101), Err(BenchError::OutOfRange));
    assert_eq!(fan.set_speed(255), Err(BenchError::OutOfRange));

    assert!(trace.duties().is_empty());
    assert_eq!(fan.percent(), 50);
}

#[test]
fn test_fan_duty_monotonic_above_cutoff() {
    let trace = Trace::new();
    let mut fan = fan(&trace);
    trace.clear();

    for percent in 20..=100 {
        fan.set_speed(percent).unwrap();
    }

    let duties = trace.duties();
    assert!(duties.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_fan_stop() {
    let trace = Trace::new();
    let mut fan = fan(&trace);
    fan.set_speed(80).unwrap();
    trace.clear();

    fan.stop().unwrap();

    assert_eq!(trace.duties(), vec![0]);
    assert_eq!(fan.percent(), 0);
}

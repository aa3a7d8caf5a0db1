//! Mock-Hardware für Host-Tests
//!
//! Alle Mocks schreiben in einen gemeinsamen `Trace`, damit Tests die
//! Reihenfolge über verschiedene Leitungen hinweg prüfen können.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use bench_core::bench::BoardParts;
use bench_core::led_chain::LedChainPins;
use bench_core::shift_chain::ShiftChainPins;
use bench_core::{AnalogChannel, AnalogInputs, Bench, BoardIo, Calibration};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use embedded_hal::spi::{self, SpiBus};

// ============================================================================
// Trace
// ============================================================================

/// Physikalische Leitungen des Boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Ser,
    Oe,
    Srclk,
    Rclk,
    Out,
    LedSer,
    LedSrck,
    LedRck,
    LedOe,
    LedSrclr,
    PotCs,
    Kill,
    Mode(u8),
}

/// Ein beobachtetes Hardware-Ereignis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Set(Line, bool),
    Sample(Line, bool),
    SpiWrite(Vec<u8>),
    SpiFlush,
    Duty(u16),
    Adc(AnalogChannel),
    DelayNs(u32),
}

#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Event>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Alle Ereignisse außer Delays
    pub fn signals(&self) -> Vec<Event> {
        self.0
            .borrow()
            .iter()
            .filter(|e| !matches!(e, Event::DelayNs(_)))
            .cloned()
            .collect()
    }

    /// Alle SPI-Frames in Reihenfolge
    pub fn spi_frames(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::SpiWrite(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Alle PWM-Duty-Werte in Reihenfolge
    pub fn duties(&self) -> Vec<u16> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Duty(duty) => Some(*duty),
                _ => None,
            })
            .collect()
    }

    /// Pegel von `data` bei jeder steigenden Flanke von `clock`
    ///
    /// So sieht ein echtes Schieberegister die Daten.
    pub fn shifted_bits(&self, data: Line, clock: Line) -> Vec<bool> {
        let mut level = false;
        let mut clock_high = false;
        let mut bits = Vec::new();
        for event in self.0.borrow().iter() {
            if let Event::Set(line, high) = *event {
                if line == data {
                    level = high;
                } else if line == clock {
                    if high && !clock_high {
                        bits.push(level);
                    }
                    clock_high = high;
                }
            }
        }
        bits
    }

    /// Anzahl steigender Flanken einer Leitung
    pub fn rising_edges(&self, line: Line) -> usize {
        let mut high = false;
        let mut count = 0;
        for event in self.0.borrow().iter() {
            if let Event::Set(l, level) = *event {
                if l == line {
                    if level && !high {
                        count += 1;
                    }
                    high = level;
                }
            }
        }
        count
    }

    /// Letzter gesetzter Pegel einer Leitung
    pub fn level(&self, line: Line) -> Option<bool> {
        self.0.borrow().iter().rev().find_map(|e| match *e {
            Event::Set(l, level) if l == line => Some(level),
            _ => None,
        })
    }

    /// Summe aller Delays in ns
    pub fn total_delay_ns(&self) -> u64 {
        self.0
            .borrow()
            .iter()
            .map(|e| match e {
                Event::DelayNs(ns) => *ns as u64,
                _ => 0,
            })
            .sum()
    }

    pub fn position(&self, wanted: &Event) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == wanted)
    }
}

// ============================================================================
// Mock Pins
// ============================================================================

pub struct MockOutput {
    line: Line,
    trace: Trace,
}

impl MockOutput {
    pub fn new(line: Line, trace: &Trace) -> Self {
        Self {
            line,
            trace: trace.clone(),
        }
    }
}

impl digital::ErrorType for MockOutput {
    type Error = Infallible;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.trace.push(Event::Set(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.trace.push(Event::Set(self.line, true));
        Ok(())
    }
}

/// Input-Pin mit vorgegebenen Pegeln
///
/// Ist die Queue leer, liefert der Pin `idle`.
pub struct MockInput {
    line: Line,
    trace: Trace,
    levels: Rc<RefCell<VecDeque<bool>>>,
    idle: bool,
}

impl MockInput {
    pub fn new(line: Line, trace: &Trace) -> Self {
        Self {
            line,
            trace: trace.clone(),
            levels: Rc::default(),
            idle: false,
        }
    }

    pub fn with_idle(mut self, idle: bool) -> Self {
        self.idle = idle;
        self
    }

    /// Handle um später Pegel nachzuschieben
    pub fn script(&self) -> Rc<RefCell<VecDeque<bool>>> {
        self.levels.clone()
    }
}

impl digital::ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let level = self.levels.borrow_mut().pop_front().unwrap_or(self.idle);
        self.trace.push(Event::Sample(self.line, level));
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

// ============================================================================
// Mock SPI / PWM / ADC / Delay
// ============================================================================

pub struct MockSpi {
    trace: Trace,
    /// Simuliere Fehler beim nächsten write()
    pub fail_next_write: Rc<RefCell<bool>>,
}

impl MockSpi {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            fail_next_write: Rc::default(),
        }
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if self.fail_next_write.replace(false) {
            return Err(spi::ErrorKind::ModeFault);
        }
        self.trace.push(Event::SpiWrite(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write)?;
        read.fill(0);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(&words.to_vec())?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.trace.push(Event::SpiFlush);
        Ok(())
    }
}

pub struct MockPwm {
    trace: Trace,
    max_duty: u16,
}

impl MockPwm {
    pub fn new(max_duty: u16, trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            max_duty,
        }
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.trace.push(Event::Duty(duty));
        Ok(())
    }
}

/// ADC mit festen Rohwerten pro Kanal
#[derive(Clone)]
pub struct MockAnalog {
    trace: Trace,
    pub values: Rc<RefCell<[u16; 3]>>,
}

impl MockAnalog {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            values: Rc::default(),
        }
    }

    pub fn set(&self, channel: AnalogChannel, raw: u16) {
        self.values.borrow_mut()[slot(channel)] = raw;
    }
}

fn slot(channel: AnalogChannel) -> usize {
    match channel {
        AnalogChannel::FixedRail => 0,
        AnalogChannel::AdjustableRail => 1,
        AnalogChannel::AntennaSense => 2,
    }
}

impl AnalogInputs for MockAnalog {
    fn read_u16(&mut self, channel: AnalogChannel) -> u16 {
        self.trace.push(Event::Adc(channel));
        self.values.borrow()[slot(channel)]
    }
}

/// Delay ohne Wartezeit, protokolliert nur
pub struct MockDelay {
    trace: Trace,
}

impl MockDelay {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.trace.push(Event::DelayNs(ns));
    }
}

// ============================================================================
// Mock Board
// ============================================================================

pub struct MockBoard;

impl BoardIo for MockBoard {
    type Output = MockOutput;
    type Input = MockInput;
    type Spi = MockSpi;
    type Pwm = MockPwm;
    type Analog = MockAnalog;
    type Delay = MockDelay;
}

/// Max-Duty des Mock-Lüfters (16-Bit-Auflösung)
pub const MOCK_MAX_DUTY: u16 = 65535;

/// Ein fertig verdrahteter Bench mit Zugriff auf Trace und Mock-Handles
pub struct Harness {
    pub bench: Bench<MockBoard>,
    pub trace: Trace,
    pub analog: MockAnalog,
    /// Pegel für die Rücklese-Leitung der 48-Bit-Kette
    pub chain_out: Rc<RefCell<VecDeque<bool>>>,
    /// Pegel der Mode-Pins (MSB zuerst)
    pub mode: [Rc<RefCell<VecDeque<bool>>>; 4],
    pub fail_next_spi_write: Rc<RefCell<bool>>,
    /// Ereignisse aus `Bench::new()`, vor dem Leeren des Traces
    pub boot: Vec<Event>,
}

impl Harness {
    /// Baut den Bench und leert danach den Trace
    pub fn new() -> Self {
        Self::with_calibration(Calibration::DEFAULT)
    }

    pub fn with_calibration(calibration: Calibration) -> Self {
        let trace = Trace::new();
        let out = MockInput::new(Line::Out, &trace);
        let chain_out = out.script();
        let mode_pins = [0u8, 1, 2, 3].map(|i| MockInput::new(Line::Mode(i), &trace));
        let mode = [0usize, 1, 2, 3].map(|i| mode_pins[i].script());
        let analog = MockAnalog::new(&trace);
        let spi = MockSpi::new(&trace);
        let fail_next_spi_write = spi.fail_next_write.clone();

        let parts = BoardParts::<MockBoard> {
            chain: ShiftChainPins {
                ser: MockOutput::new(Line::Ser, &trace),
                oe: MockOutput::new(Line::Oe, &trace),
                srclk: MockOutput::new(Line::Srclk, &trace),
                rclk: MockOutput::new(Line::Rclk, &trace),
                out,
            },
            leds: LedChainPins {
                ser: MockOutput::new(Line::LedSer, &trace),
                srck: MockOutput::new(Line::LedSrck, &trace),
                rck: MockOutput::new(Line::LedRck, &trace),
                oe: MockOutput::new(Line::LedOe, &trace),
                srclr: MockOutput::new(Line::LedSrclr, &trace),
            },
            pot_spi: spi,
            pot_cs: MockOutput::new(Line::PotCs, &trace),
            fan: MockPwm::new(MOCK_MAX_DUTY, &trace),
            analog: analog.clone(),
            mode: mode_pins,
            kill: MockOutput::new(Line::Kill, &trace),
            delay: MockDelay::new(&trace),
        };

        let bench = Bench::new(parts, calibration).expect("mock board never fails");
        let boot = trace.events();
        trace.clear();

        Self {
            bench,
            trace,
            analog,
            chain_out,
            mode,
            fail_next_spi_write,
            boot,
        }
    }

    /// Rohwert für eine gewünschte Spannung mit der Standard-Kalibrierung
    pub fn raw_for_volts(volts: f32) -> u16 {
        let scale = bench_core::config::ADC_REFERENCE_VOLTS * bench_core::config::DIVIDER_RATIO;
        ((volts / scale) * 65535.0).round() as u16
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

//! Bench-Kontext: besitzt alle Hardware-Handles und den Session-Zustand
//!
//! Jede Operation braucht `&mut self`. Damit kann keine Bus-Operation
//! parallel zu einer anderen laufen, ohne dass ein Lock nötig ist.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::analog::Sensors;
use crate::command::{Command, HELP};
use crate::config::{
    Calibration, SHUTDOWN_DELAY_MS, STARTUP_DARK_HOLD_MS, STARTUP_WHITE_HOLD_MS,
};
use crate::error::BenchError;
use crate::fan::{Fan, FanSetting};
use crate::led_chain::{LedChain, LedChainPins};
use crate::logic::classify_rail;
use crate::potentiometer::Potentiometer;
use crate::shift_chain::{ShiftChain, ShiftChainPins};
use crate::traits::{BoardIo, drive};
use crate::types::{Frame, LedColor, LedState, ModeBits, OFF, Rail, WHITE};

/// Alle Hardware-Teile aus denen ein `Bench` gebaut wird
pub struct BoardParts<B: BoardIo> {
    pub chain: ShiftChainPins<B::Output, B::Input>,
    pub leds: LedChainPins<B::Output>,
    pub pot_spi: B::Spi,
    pub pot_cs: B::Output,
    pub fan: B::Pwm,
    pub analog: B::Analog,
    /// Mode-Pins, MSB zuerst
    pub mode: [B::Input; 4],
    /// Power-Latch (high = Board aus)
    pub kill: B::Output,
    pub delay: B::Delay,
}

/// Ergebnis der Start-Choreografie
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartupReport {
    pub fixed_volts: f32,
    pub adjustable_volts: f32,
    /// Farbe die LED 0 für die einstellbare Schiene bekommen hat
    pub rail_color: LedColor,
}

/// Ergebnis eines Stecker-Pin-Abfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinReading {
    Level(bool),
    /// Pin hängt nicht an der Kette (8, 19, 36)
    Unmapped,
    /// Noch kein Frame zurückgelesen
    NoReadback,
}

/// Antwort auf ein ausgeführtes Kommando
///
/// `Display` liefert die Zeile die auf der Konsole erscheint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    PoweredOff,
    WiperSet { rail: Rail, position: u8 },
    Voltage { rail: Rail, volts: f32 },
    Mode(ModeBits),
    Antenna(u16),
    FanOff { cutoff: u8 },
    FanSpeed(u8),
    Exchanged(Frame),
    LastRead(Option<Frame>),
    Pin { pin: u8, reading: PinReading },
    Led { index: usize, color: LedColor },
    Status {
        fan_percent: u8,
        wipers: [Option<u8>; 2],
        leds: LedState,
        has_readback: bool,
    },
    Help,
}

impl Reply {
    /// Nach dieser Antwort nimmt die Schleife keine Kommandos mehr an
    pub fn is_terminal(&self) -> bool {
        matches!(self, Reply::PoweredOff)
    }
}

pub struct Bench<B: BoardIo> {
    chain: ShiftChain<B::Output, B::Input>,
    leds: LedChain<B::Output>,
    pot: Potentiometer<B::Spi, B::Output>,
    fan: Fan<B::Pwm>,
    sensors: Sensors<B::Analog, B::Input>,
    kill: B::Output,
    delay: B::Delay,
    calibration: Calibration,

    // Session-Zustand
    led_state: LedState,
    last_read: Option<Frame>,
    wipers: [Option<u8>; 2],
    powered_off: bool,
}

impl<B: BoardIo> Bench<B> {
    /// Baut den Kontext und bringt alle Leitungen in den Ruhezustand
    ///
    /// Power-Kill geht low (Board bleibt an), der Lüfter startet aus.
    pub fn new(parts: BoardParts<B>, calibration: Calibration) -> Result<Self, BenchError> {
        let BoardParts {
            chain,
            leds,
            pot_spi,
            pot_cs,
            fan,
            analog,
            mode,
            mut kill,
            delay,
        } = parts;

        drive(&mut kill, false);

        Ok(Self {
            chain: ShiftChain::new(chain, calibration.chain_pulse_ns),
            leds: LedChain::new(leds, calibration.led_pulse_ns),
            pot: Potentiometer::new(pot_spi, pot_cs),
            fan: Fan::new(fan, calibration.fan_cutoff_percent)?,
            sensors: Sensors::new(analog, mode),
            kill,
            delay,
            calibration,
            led_state: LedState::new(),
            last_read: None,
            wipers: [None; 2],
            powered_off: false,
        })
    }

    // ========================================================================
    // Start / Shutdown
    // ========================================================================

    /// Start-Choreografie, läuft genau einmal vor der Kommando-Schleife
    ///
    /// 1. Alle LEDs weiß, 1 s halten
    /// 2. Beide Schienen messen
    /// 3. Potentiometer-CS in Ruhe
    /// 4. Alle LEDs aus, 0.5 s halten
    /// 5. LED 0 bekommt die Farbe der einstellbaren Schiene
    pub fn startup(&mut self) -> StartupReport {
        self.led_state.fill(WHITE);
        self.update_leds();
        self.delay.delay_ms(STARTUP_WHITE_HOLD_MS);

        let fixed_volts = self.read_voltage(Rail::Fixed);
        let adjustable_volts = self.read_voltage(Rail::Adjustable);

        self.pot.release();

        self.led_state.fill(OFF);
        self.update_leds();
        self.delay.delay_ms(STARTUP_DARK_HOLD_MS);

        let rail_color =
            classify_rail(adjustable_volts, &self.calibration.rail_colors).unwrap_or(OFF);
        self.led_state.set_first(rail_color);
        self.update_leds();

        StartupReport {
            fixed_volts,
            adjustable_volts,
            rail_color,
        }
    }

    /// Lüfter aus, warten, Power-Latch lösen
    ///
    /// Der Power-Kill kommt auch dann, wenn das Stoppen des Lüfters fehlschlägt.
    pub fn shutdown(&mut self) -> Result<(), BenchError> {
        let fan_stopped = self.fan.stop();
        self.delay.delay_ms(SHUTDOWN_DELAY_MS);
        drive(&mut self.kill, true);
        self.powered_off = true;
        fan_stopped
    }

    // ========================================================================
    // Dispatcher
    // ========================================================================

    /// Führt ein geparstes Kommando aus
    pub fn execute(&mut self, command: Command) -> Result<Reply, BenchError> {
        match command {
            Command::Shutdown => {
                self.shutdown()?;
                Ok(Reply::PoweredOff)
            }
            Command::SetResistance { rail, position } => {
                self.set_wiper(rail, position)?;
                Ok(Reply::WiperSet { rail, position })
            }
            Command::ReadVoltage(rail) => Ok(Reply::Voltage {
                rail,
                volts: self.read_voltage(rail),
            }),
            Command::ReadMode => Ok(Reply::Mode(self.read_mode())),
            Command::Antenna => Ok(Reply::Antenna(self.read_sense())),
            Command::SetFan(percent) => match self.set_fan(percent)? {
                FanSetting::Off => Ok(Reply::FanOff {
                    cutoff: self.calibration.fan_cutoff_percent,
                }),
                FanSetting::Running(percent) => Ok(Reply::FanSpeed(percent)),
            },
            Command::Write(frame) => Ok(Reply::Exchanged(self.exchange_frame(&frame))),
            Command::Read => Ok(Reply::LastRead(self.last_read)),
            Command::ReadPin(pin) => Ok(Reply::Pin {
                pin,
                reading: self.read_pin(pin),
            }),
            Command::SetLed { index, color } => {
                self.set_led(index, color)?;
                self.update_leds();
                Ok(Reply::Led { index, color })
            }
            Command::Status => Ok(Reply::Status {
                fan_percent: self.fan.percent(),
                wipers: self.wipers,
                leds: self.led_state,
                has_readback: self.last_read.is_some(),
            }),
            Command::Help => Ok(Reply::Help),
        }
    }

    /// Parst eine Zeile und führt sie aus
    pub fn handle_line(&mut self, line: &str) -> Result<Reply, BenchError> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    // ========================================================================
    // Einzel-Operationen
    // ========================================================================

    /// Schiebt 48 Bits und merkt sich den Rücklese-Frame
    ///
    /// # Fehlerbehandlung
    /// `InvalidFrameLength` ohne jeden Hardware-Zugriff wenn `bits.len() != 48`
    pub fn exchange(&mut self, bits: &[bool]) -> Result<Frame, BenchError> {
        let frame = Frame::try_from(bits)?;
        Ok(self.exchange_frame(&frame))
    }

    pub fn exchange_frame(&mut self, frame: &Frame) -> Frame {
        let readback = self.chain.exchange_frame(frame, &mut self.delay);
        self.last_read = Some(readback);
        readback
    }

    pub fn set_wiper(&mut self, rail: Rail, position: u8) -> Result<(), BenchError> {
        let channel = rail.pot_channel();
        self.pot.set_wiper(channel, position)?;
        self.wipers[channel.index()] = Some(position);
        Ok(())
    }

    pub fn read_voltage(&mut self, rail: Rail) -> f32 {
        self.sensors.read_voltage(rail, &self.calibration)
    }

    pub fn read_sense(&mut self) -> u16 {
        self.sensors.read_sense()
    }

    pub fn read_mode(&mut self) -> ModeBits {
        self.sensors.read_mode()
    }

    pub fn set_fan(&mut self, percent: u8) -> Result<FanSetting, BenchError> {
        self.fan.set_speed(percent)
    }

    /// Ändert nur den Zustand, die Hardware folgt mit `update_leds()`
    pub fn set_led(&mut self, index: usize, color: LedColor) -> Result<(), BenchError> {
        self.led_state.set(index, color)
    }

    pub fn update_leds(&mut self) {
        self.leds.update(&self.led_state, &mut self.delay);
    }

    pub fn read_pin(&self, pin: u8) -> PinReading {
        match self.last_read {
            None => PinReading::NoReadback,
            Some(frame) => match frame.connector_pin(pin) {
                Some(level) => PinReading::Level(level),
                None => PinReading::Unmapped,
            },
        }
    }

    // ========================================================================
    // Zustand
    // ========================================================================

    pub fn led_state(&self) -> &LedState {
        &self.led_state
    }

    pub fn last_read(&self) -> Option<&Frame> {
        self.last_read.as_ref()
    }

    pub fn fan_percent(&self) -> u8 {
        self.fan.percent()
    }

    /// Zuletzt gesetzte Wiper-Positionen, Index = Potentiometer-Kanal
    pub fn wipers(&self) -> [Option<u8>; 2] {
        self.wipers
    }

    pub fn is_powered_off(&self) -> bool {
        self.powered_off
    }
}

// ============================================================================
// Konsolen-Ausgabe
// ============================================================================

struct Wiper(Option<u8>);

impl fmt::Display for Wiper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(position) => write!(f, "{}", position),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::PoweredOff => f.write_str("Power latch released, goodbye"),
            Reply::WiperSet { rail, position } => {
                write!(f, "{} potentiometer set to {}", rail.name(), position)
            }
            Reply::Voltage { rail, volts } => write!(f, "{} voltage: {:.2} V", rail.name(), volts),
            Reply::Mode(mode) => write!(f, "Current Mode: {}", mode),
            Reply::Antenna(raw) => write!(f, "Antenna Sense: {}", raw),
            Reply::FanOff { cutoff } => write!(f, "Below {}% threshold. Fan is off.", cutoff),
            Reply::FanSpeed(percent) => write!(f, "Fan speed set to {}%", percent),
            Reply::Exchanged(frame) => write!(f, "Shift register read back: {}", frame),
            Reply::LastRead(Some(frame)) => write!(f, "Previous shift register: {}", frame),
            Reply::LastRead(None) => f.write_str("Previous shift register: none"),
            Reply::Pin { pin, reading } => match reading {
                PinReading::Level(level) => write!(f, "Connector pin {}: {}", pin, *level as u8),
                PinReading::Unmapped => {
                    write!(f, "Connector pin {} is not on the shift register", pin)
                }
                PinReading::NoReadback => write!(f, "Connector pin {}: no readback yet", pin),
            },
            Reply::Led { index, color } => write!(
                f,
                "LED {} set to {}{}{}",
                index, color.r as u8, color.g as u8, color.b as u8
            ),
            Reply::Status {
                fan_percent,
                wipers,
                leds,
                has_readback,
            } => write!(
                f,
                "Fan {}%, pots adjustable={} fixed={}, LEDs {}, readback {}",
                fan_percent,
                Wiper(wipers[0]),
                Wiper(wipers[1]),
                leds,
                if *has_readback { "yes" } else { "no" }
            ),
            Reply::Help => f.write_str(HELP),
        }
    }
}

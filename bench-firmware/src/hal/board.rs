// Board-Verdrahtung: ESP32-C6 Peripherals → bench_core::BoardParts
//
// GPIO-Zuordnung:
//
// | Funktion                    | GPIO            |
// |-----------------------------|-----------------|
// | ADC feste Schiene           | 0               |
// | ADC Antennen-Sense          | 1               |
// | ADC einstellbare Schiene    | 2               |
// | Mode-Pins (MSB zuerst)      | 3, 4, 5, 6      |
// | Potentiometer SCK/MOSI/CS   | 7, 10, 11       |
// | Lüfter PWM                  | 9               |
// | LED-Kette SER/OE/RCK        | 8, 14, 15       |
// | LED-Kette SRCLR/SRCK        | 16, 17          |
// | 48-Bit-Kette SER/OE         | 18, 19          |
// | 48-Bit-Kette SRCLK/RCLK/OUT | 20, 21, 22      |
// | Power-Kill                  | 23              |
//
// GPIO16/17 (UART0) sind frei, weil Konsole und Logs über USB-Serial-JTAG laufen.

use bench_core::{BoardIo, BoardParts};
use bench_core::led_chain::LedChainPins;
use bench_core::shift_chain::ShiftChainPins;
use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::delay::Delay;
use esp_hal::gpio::{DriveMode, Input, InputConfig, Level, Output, OutputConfig};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::{Peripherals, SW_INTERRUPT, TIMG0, USB_DEVICE};
use esp_hal::spi;
use esp_hal::spi::master::Spi;
use esp_hal::time::Rate;
use static_cell::StaticCell;

use super::analog::AnalogBank;
use crate::config::{FAN_PWM_FREQUENCY_KHZ, POT_SPI_FREQUENCY_MHZ};

/// Konkrete Hardware-Typen des ESP32-C6 Boards
pub struct EspBoard;

impl BoardIo for EspBoard {
    type Output = Output<'static>;
    type Input = Input<'static>;
    type Spi = Spi<'static, Blocking>;
    type Pwm = channel::Channel<'static, LowSpeed>;
    type Analog = AnalogBank;
    type Delay = Delay;
}

/// Fehler beim Konfigurieren der Peripherals
#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub enum BoardError {
    Spi(spi::master::ConfigError),
    PwmTimer(timer::Error),
    PwmChannel(channel::Error),
}

/// Verdrahtetes Board plus die Peripherals die main() noch braucht
pub struct Board {
    pub parts: BoardParts<EspBoard>,
    pub usb: USB_DEVICE<'static>,
    pub timg0: TIMG0<'static>,
    pub sw_interrupt: SW_INTERRUPT<'static>,
}

/// LEDC-Timer muss so lange leben wie der Kanal der ihn referenziert
static FAN_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

impl Board {
    /// Konfiguriert alle Peripherals
    ///
    /// Ausgänge starten in ihrem Ruhepegel, `Bench::new()` setzt sie danach
    /// noch einmal explizit.
    pub fn init(p: Peripherals) -> Result<Self, BoardError> {
        // ADC1: 11 dB Dämpfung für den vollen 0-3.3V Bereich
        let mut adc_cfg = AdcConfig::new();
        let fixed = adc_cfg.enable_pin(p.GPIO0, Attenuation::_11dB);
        let antenna = adc_cfg.enable_pin(p.GPIO1, Attenuation::_11dB);
        let adjustable = adc_cfg.enable_pin(p.GPIO2, Attenuation::_11dB);
        let analog = AnalogBank {
            adc: Adc::new(p.ADC1, adc_cfg),
            fixed,
            antenna,
            adjustable,
        };

        let mode = [
            Input::new(p.GPIO3, InputConfig::default()),
            Input::new(p.GPIO4, InputConfig::default()),
            Input::new(p.GPIO5, InputConfig::default()),
            Input::new(p.GPIO6, InputConfig::default()),
        ];

        // Potentiometer: SPI Mode 0, CS als normaler GPIO
        let spi_cfg = spi::master::Config::default()
            .with_frequency(Rate::from_mhz(POT_SPI_FREQUENCY_MHZ))
            .with_mode(spi::Mode::_0);
        let pot_spi = Spi::new(p.SPI2, spi_cfg)
            .map_err(BoardError::Spi)?
            .with_sck(p.GPIO7)
            .with_mosi(p.GPIO10);
        let pot_cs = Output::new(p.GPIO11, Level::High, OutputConfig::default());

        // Lüfter: LEDC Low-Speed Timer 0, 10 Bit
        let mut ledc = Ledc::new(p.LEDC);
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);
        let fan_timer = FAN_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
        fan_timer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty10Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_khz(FAN_PWM_FREQUENCY_KHZ),
            })
            .map_err(BoardError::PwmTimer)?;
        let fan_timer: &'static timer::Timer<'static, LowSpeed> = fan_timer;
        let mut fan = ledc.channel(channel::Number::Channel0, p.GPIO9);
        fan.configure(channel::config::Config {
            timer: fan_timer,
            duty_pct: 0,
            drive_mode: DriveMode::PushPull,
        })
        .map_err(BoardError::PwmChannel)?;

        let leds = LedChainPins {
            ser: Output::new(p.GPIO8, Level::Low, OutputConfig::default()),
            oe: Output::new(p.GPIO14, Level::Low, OutputConfig::default()),
            rck: Output::new(p.GPIO15, Level::Low, OutputConfig::default()),
            srclr: Output::new(p.GPIO16, Level::High, OutputConfig::default()),
            srck: Output::new(p.GPIO17, Level::Low, OutputConfig::default()),
        };

        let chain = ShiftChainPins {
            ser: Output::new(p.GPIO18, Level::Low, OutputConfig::default()),
            oe: Output::new(p.GPIO19, Level::Low, OutputConfig::default()),
            srclk: Output::new(p.GPIO20, Level::Low, OutputConfig::default()),
            rclk: Output::new(p.GPIO21, Level::Low, OutputConfig::default()),
            out: Input::new(p.GPIO22, InputConfig::default()),
        };

        // Power-Kill: low = Board bleibt an
        let kill = Output::new(p.GPIO23, Level::Low, OutputConfig::default());

        Ok(Self {
            parts: BoardParts {
                chain,
                leds,
                pot_spi,
                pot_cs,
                fan,
                analog,
                mode,
                kill,
                delay: Delay::new(),
            },
            usb: p.USB_DEVICE,
            timg0: p.TIMG0,
            sw_interrupt: p.SW_INTERRUPT,
        })
    }
}

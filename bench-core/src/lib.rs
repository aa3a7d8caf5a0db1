//! Bench Core - Plattform-unabhängige Treiber und Steuerlogik
//!
//! Diese Crate enthält KEINE Target-Dependencies.
//! Alle Treiber sind generisch über embedded-hal Traits und
//! laufen in Tests gegen Mock-Hardware auf dem Host.

#![cfg_attr(not(test), no_std)]

pub mod analog;
pub mod bench;
pub mod command;
pub mod config;
pub mod error;
pub mod fan;
pub mod led_chain;
pub mod logic;
pub mod potentiometer;
pub mod shift_chain;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use bench::{Bench, BoardParts, PinReading, Reply, StartupReport};
pub use command::Command;
pub use config::Calibration;
pub use error::{BenchError, ParseError};
pub use traits::{AnalogChannel, AnalogInputs, BoardIo};
pub use types::{Frame, LedColor, LedState, ModeBits, PotChannel, Rail};

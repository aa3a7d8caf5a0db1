//! Fehler-Typen der Bench-Steuerung
//!
//! Alle Fehler sind am Dispatcher behebbar: sie werden ausgegeben,
//! danach läuft die Kommando-Schleife weiter.

use core::fmt;

use embedded_hal::{pwm, spi};

/// Fehler beim Zerlegen einer Kommandozeile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Leere Zeile (nur Whitespace)
    Empty,
    /// Unbekanntes Verb
    UnknownCommand,
    /// Falsche Anzahl Argumente, enthält die Usage-Zeile des Verbs
    Usage(&'static str),
    /// Argument ist keine Ganzzahl
    InvalidNumber,
    /// Token ist weder `0` noch `1`
    InvalidBit,
}

/// Fehler-Typ für alle Bench-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BenchError {
    /// Bitfolge für die 48-Bit-Kette hat die falsche Länge
    InvalidFrameLength { len: usize },
    /// Unbekannter Potentiometer- oder Rail-Selektor
    InvalidChannel,
    /// Wert außerhalb des erlaubten Bereichs (Lüfter-Prozent, LED-Index, Wiper)
    OutOfRange,
    /// Kommandozeile konnte nicht geparst werden
    Parse(ParseError),
    /// SPI-Transaktion fehlgeschlagen
    Bus(spi::ErrorKind),
    /// PWM-Duty konnte nicht gesetzt werden
    Pwm(pwm::ErrorKind),
}

impl From<ParseError> for BenchError {
    fn from(err: ParseError) -> Self {
        BenchError::Parse(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("empty command"),
            ParseError::UnknownCommand => f.write_str("unknown command, try 'help'"),
            ParseError::Usage(usage) => write!(f, "Usage: {}", usage),
            ParseError::InvalidNumber => f.write_str("argument is not an integer"),
            ParseError::InvalidBit => f.write_str("bits must be 0 or 1"),
        }
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::InvalidFrameLength { len } => {
                write!(f, "data must be exactly 48 bits, got {}", len)
            }
            BenchError::InvalidChannel => f.write_str("invalid channel"),
            BenchError::OutOfRange => f.write_str("value out of range"),
            BenchError::Parse(err) => write!(f, "parse error: {}", err),
            BenchError::Bus(kind) => write!(f, "bus error: {:?}", kind),
            BenchError::Pwm(kind) => write!(f, "pwm error: {:?}", kind),
        }
    }
}

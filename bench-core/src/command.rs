//! Textkommandos der Bench-Konsole
//!
//! Zeilenbasiert, Groß-/Kleinschreibung egal, Tokens durch Whitespace getrennt.
//! Das erste Token ist das Verb.

use core::str::SplitWhitespace;

use crate::error::{BenchError, ParseError};
use crate::types::{FRAME_BITS, Frame, LedColor, Rail};

const USAGE_SETRES: &str = "setres <fixed|adjustable> <0-255>";
const USAGE_READVOLT: &str = "readvolt <fixed|adjustable>";
const USAGE_SETFAN: &str = "setfan <0-100>";
const USAGE_SETLED: &str = "setled <0-3> <r> <g> <b>";
const USAGE_READPIN: &str = "readpin <1-50>";

/// Hilfetext für `help` und unbekannte Kommandos
pub const HELP: &str = "Commands: shutdown, setres <fixed|adjustable> <0-255>, \
readvolt <fixed|adjustable>, readmode, antenna, setfan <0-100>, write <48 bits>, \
read, readpin <1-50>, setled <0-3> <r> <g> <b>, status, help";

/// Ein geparstes Kommando
///
/// Wird von der Konsole an den Control-Task geschickt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Lüfter aus, Power-Kill, Ende der Schleife
    Shutdown,
    /// Wiper des Potentiometers einer Schiene setzen
    SetResistance { rail: Rail, position: u8 },
    ReadVoltage(Rail),
    ReadMode,
    Antenna,
    SetFan(u8),
    /// 48 Bits schieben und zurücklesen
    Write(Frame),
    /// Letzten Rücklese-Frame anzeigen
    Read,
    /// Pegel eines Stecker-Pins aus dem letzten Rücklese-Frame
    ReadPin(u8),
    SetLed { index: usize, color: LedColor },
    Status,
    Help,
}

#[derive(Clone, Copy)]
enum Verb {
    Shutdown,
    SetRes,
    ReadVolt,
    ReadMode,
    Antenna,
    SetFan,
    Write,
    Read,
    ReadPin,
    SetLed,
    Status,
    Help,
}

const VERBS: [(&str, Verb); 12] = [
    ("shutdown", Verb::Shutdown),
    ("setres", Verb::SetRes),
    ("readvolt", Verb::ReadVolt),
    ("readmode", Verb::ReadMode),
    ("antenna", Verb::Antenna),
    ("setfan", Verb::SetFan),
    ("write", Verb::Write),
    ("read", Verb::Read),
    ("readpin", Verb::ReadPin),
    ("setled", Verb::SetLed),
    ("status", Verb::Status),
    ("help", Verb::Help),
];

impl Command {
    /// Parst eine Kommandozeile
    ///
    /// # Fehlerbehandlung
    /// - `Parse(..)` bei unbekanntem Verb, falscher Argumentzahl oder kaputten Zahlen
    /// - `InvalidFrameLength` wenn `write` nicht genau 48 Daten-Tokens hat
    /// - `OutOfRange` für Zahlen außerhalb des erlaubten Bereichs
    pub fn parse(line: &str) -> Result<Self, BenchError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(ParseError::Empty)?;
        let verb = VERBS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(verb))
            .map(|&(_, verb)| verb)
            .ok_or(ParseError::UnknownCommand)?;

        match verb {
            Verb::Shutdown => Ok(Command::Shutdown),
            Verb::SetRes => {
                let [rail, position] = take_args(tokens, USAGE_SETRES)?;
                let rail = Rail::try_from(rail)?;
                let position = parse_ranged(position, 0, 255)? as u8;
                Ok(Command::SetResistance { rail, position })
            }
            Verb::ReadVolt => {
                let [rail] = take_args(tokens, USAGE_READVOLT)?;
                Ok(Command::ReadVoltage(Rail::try_from(rail)?))
            }
            Verb::ReadMode => Ok(Command::ReadMode),
            Verb::Antenna => Ok(Command::Antenna),
            Verb::SetFan => {
                let [percent] = take_args(tokens, USAGE_SETFAN)?;
                Ok(Command::SetFan(parse_ranged(percent, 0, 100)? as u8))
            }
            Verb::Write => parse_frame(tokens).map(Command::Write),
            Verb::Read => Ok(Command::Read),
            Verb::ReadPin => {
                let [pin] = take_args(tokens, USAGE_READPIN)?;
                Ok(Command::ReadPin(parse_ranged(pin, 1, 50)? as u8))
            }
            Verb::SetLed => {
                let [index, r, g, b] = take_args(tokens, USAGE_SETLED)?;
                let index = parse_ranged(index, 0, 3)? as usize;
                let color = LedColor {
                    r: parse_bit(r)?,
                    g: parse_bit(g)?,
                    b: parse_bit(b)?,
                };
                Ok(Command::SetLed { index, color })
            }
            Verb::Status => Ok(Command::Status),
            Verb::Help => Ok(Command::Help),
        }
    }
}

impl TryFrom<&str> for Command {
    type Error = BenchError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        Command::parse(line)
    }
}

/// Holt genau `N` Argumente, sonst Usage-Fehler
fn take_args<'a, const N: usize>(
    mut args: SplitWhitespace<'a>,
    usage: &'static str,
) -> Result<[&'a str; N], ParseError> {
    let mut out = [""; N];
    for slot in out.iter_mut() {
        *slot = args.next().ok_or(ParseError::Usage(usage))?;
    }
    if args.next().is_some() {
        return Err(ParseError::Usage(usage));
    }
    Ok(out)
}

fn parse_ranged(token: &str, min: i32, max: i32) -> Result<i32, BenchError> {
    let value: i32 = token.parse().map_err(|_| ParseError::InvalidNumber)?;
    if value < min || value > max {
        return Err(BenchError::OutOfRange);
    }
    Ok(value)
}

fn parse_bit(token: &str) -> Result<bool, ParseError> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ParseError::InvalidBit),
    }
}

/// Die Länge wird vor den Bits geprüft: ein falsch langer Frame
/// wird immer als `InvalidFrameLength` gemeldet.
fn parse_frame(tokens: SplitWhitespace<'_>) -> Result<Frame, BenchError> {
    let len = tokens.clone().count();
    if len != FRAME_BITS {
        return Err(BenchError::InvalidFrameLength { len });
    }
    let mut bits = [false; FRAME_BITS];
    for (bit, token) in bits.iter_mut().zip(tokens) {
        *bit = parse_bit(token)?;
    }
    Ok(Frame::new(bits))
}

// ============================================================================
// defmt::Format Implementation (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::Shutdown => defmt::write!(fmt, "Shutdown"),
            Command::SetResistance { rail, position } => {
                defmt::write!(fmt, "SetResistance {{ rail: {}, position: {} }}", rail, position)
            }
            Command::ReadVoltage(rail) => defmt::write!(fmt, "ReadVoltage({})", rail),
            Command::ReadMode => defmt::write!(fmt, "ReadMode"),
            Command::Antenna => defmt::write!(fmt, "Antenna"),
            Command::SetFan(percent) => defmt::write!(fmt, "SetFan({})", percent),
            Command::Write(_) => defmt::write!(fmt, "Write(48 bits)"),
            Command::Read => defmt::write!(fmt, "Read"),
            Command::ReadPin(pin) => defmt::write!(fmt, "ReadPin({})", pin),
            Command::SetLed { index, color } => defmt::write!(
                fmt,
                "SetLed {{ index: {}, rgb: ({}, {}, {}) }}",
                index,
                color.r,
                color.g,
                color.b
            ),
            Command::Status => defmt::write!(fmt, "Status"),
            Command::Help => defmt::write!(fmt, "Help"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_line(count: usize) -> String {
        let mut line = String::from("write");
        for i in 0..count {
            line.push_str(if i % 3 == 0 { " 1" } else { " 0" });
        }
        line
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            Command::parse("  READVOLT Adjustable "),
            Ok(Command::ReadVoltage(Rail::Adjustable))
        );
        assert_eq!(Command::parse("ShutDown"), Ok(Command::Shutdown));
    }

    #[test]
    fn test_parse_setres() {
        assert_eq!(
            Command::parse("setres adjustable 128"),
            Ok(Command::SetResistance {
                rail: Rail::Adjustable,
                position: 128
            })
        );
        assert_eq!(
            Command::parse("setres fixed 256"),
            Err(BenchError::OutOfRange)
        );
        assert_eq!(
            Command::parse("setres fixed abc"),
            Err(BenchError::Parse(ParseError::InvalidNumber))
        );
        assert_eq!(
            Command::parse("setres middle 10"),
            Err(BenchError::InvalidChannel)
        );
        assert_eq!(
            Command::parse("readvolt middle"),
            Err(BenchError::InvalidChannel)
        );
        assert_eq!(
            Command::parse("setres fixed"),
            Err(BenchError::Parse(ParseError::Usage(USAGE_SETRES)))
        );
    }

    #[test]
    fn test_parse_setfan_range() {
        assert_eq!(Command::parse("setfan 55"), Ok(Command::SetFan(55)));
        assert_eq!(Command::parse("setfan 101"), Err(BenchError::OutOfRange));
        assert_eq!(Command::parse("setfan -1"), Err(BenchError::OutOfRange));
    }

    #[test]
    fn test_parse_write_exact_length() {
        let cmd = Command::parse(&write_line(48)).unwrap();
        match cmd {
            Command::Write(frame) => {
                assert_eq!(frame.bit(0), Some(true));
                assert_eq!(frame.bit(1), Some(false));
                assert_eq!(frame.bit(3), Some(true));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_write_wrong_length() {
        assert_eq!(
            Command::parse(&write_line(47)),
            Err(BenchError::InvalidFrameLength { len: 47 })
        );
        assert_eq!(
            Command::parse(&write_line(49)),
            Err(BenchError::InvalidFrameLength { len: 49 })
        );
        assert_eq!(
            Command::parse("write"),
            Err(BenchError::InvalidFrameLength { len: 0 })
        );
    }

    #[test]
    fn test_parse_write_invalid_bit() {
        let line = write_line(47) + " 2";
        assert_eq!(
            Command::parse(&line),
            Err(BenchError::Parse(ParseError::InvalidBit))
        );
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert_eq!(
            Command::parse("launch"),
            Err(BenchError::Parse(ParseError::UnknownCommand))
        );
        assert_eq!(
            Command::parse("   "),
            Err(BenchError::Parse(ParseError::Empty))
        );
        // Nur exakte Verben, kein Präfix-Match
        assert_eq!(
            Command::parse("readx"),
            Err(BenchError::Parse(ParseError::UnknownCommand))
        );
    }

    #[test]
    fn test_parse_setled() {
        assert_eq!(
            Command::parse("setled 2 1 0 1"),
            Ok(Command::SetLed {
                index: 2,
                color: LedColor {
                    r: true,
                    g: false,
                    b: true
                }
            })
        );
        assert_eq!(Command::parse("setled 4 1 1 1"), Err(BenchError::OutOfRange));
    }

    #[test]
    fn test_parse_readpin() {
        assert_eq!(Command::parse("readpin 34"), Ok(Command::ReadPin(34)));
        assert_eq!(Command::parse("readpin 0"), Err(BenchError::OutOfRange));
    }
}

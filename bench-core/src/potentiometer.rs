//! Treiber für das digitale Doppel-Potentiometer (MCP42010)
//!
//! Ein Schreibzugriff ist ein 2-Byte-Frame `[Kommando, Wert]`,
//! eingerahmt von Chip-Select low/high.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Error as _, SpiBus};

use crate::error::BenchError;
use crate::traits::drive;
use crate::types::PotChannel;

/// Hält Chip-Select aktiv solange er lebt
///
/// Drop gibt CS auf jedem Pfad wieder frei, auch nach einem Bus-Fehler.
struct Selected<'a, CS: OutputPin<Error = Infallible>>(&'a mut CS);

impl<'a, CS: OutputPin<Error = Infallible>> Selected<'a, CS> {
    fn new(cs: &'a mut CS) -> Self {
        drive(&mut *cs, false);
        Self(cs)
    }
}

impl<CS: OutputPin<Error = Infallible>> Drop for Selected<'_, CS> {
    fn drop(&mut self) {
        drive(&mut *self.0, true);
    }
}

pub struct Potentiometer<S, CS> {
    spi: S,
    cs: CS,
}

impl<S, CS> Potentiometer<S, CS>
where
    S: SpiBus<u8>,
    CS: OutputPin<Error = Infallible>,
{
    /// Erstellt den Treiber, CS startet inaktiv (high)
    pub fn new(spi: S, mut cs: CS) -> Self {
        drive(&mut cs, true);
        Self { spi, cs }
    }

    /// Bringt Chip-Select in den Ruhezustand
    pub fn release(&mut self) {
        drive(&mut self.cs, true);
    }

    /// Setzt die Wiper-Position eines Kanals
    pub fn set_wiper(&mut self, channel: PotChannel, value: u8) -> Result<(), BenchError> {
        let frame = [channel.command_byte(), value];
        let _selected = Selected::new(&mut self.cs);
        self.spi
            .write(&frame)
            .map_err(|e| BenchError::Bus(e.kind()))?;
        self.spi.flush().map_err(|e| BenchError::Bus(e.kind()))
    }

    /// Wie `set_wiper()`, aber mit numerischem Kanal
    ///
    /// # Fehlerbehandlung
    /// Gibt `BenchError::InvalidChannel` zurück wenn `index` weder 0 noch 1 ist.
    /// Dann findet keine Bus-Transaktion statt.
    pub fn set_wiper_index(&mut self, index: u8, value: u8) -> Result<(), BenchError> {
        let channel = PotChannel::try_from(index)?;
        self.set_wiper(channel, value)
    }
}

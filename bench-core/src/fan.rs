//! PWM-Lüftersteuerung mit harter Abschaltung unter dem Cutoff

use embedded_hal::pwm::{Error as _, SetDutyCycle};

use crate::error::BenchError;
use crate::logic::fan_duty;

/// Ergebnis von `Fan::set_speed()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FanSetting {
    /// Unter dem Cutoff, Lüfter aus
    Off,
    /// Lüfter läuft mit diesem Prozentwert
    Running(u8),
}

pub struct Fan<P> {
    pwm: P,
    cutoff: u8,
    percent: u8,
}

impl<P: SetDutyCycle> Fan<P> {
    /// Erstellt die Steuerung, der Lüfter startet aus
    pub fn new(pwm: P, cutoff: u8) -> Result<Self, BenchError> {
        let mut fan = Self {
            pwm,
            cutoff,
            percent: 0,
        };
        fan.stop()?;
        Ok(fan)
    }

    /// Setzt die Drehzahl in Prozent (0-100)
    ///
    /// # Fehlerbehandlung
    /// Gibt `BenchError::OutOfRange` zurück wenn `percent > 100`, der Duty bleibt dann unverändert
    pub fn set_speed(&mut self, percent: u8) -> Result<FanSetting, BenchError> {
        let duty = fan_duty(percent, self.pwm.max_duty_cycle(), self.cutoff)?;
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|e| BenchError::Pwm(e.kind()))?;
        self.percent = percent;
        if duty == 0 {
            Ok(FanSetting::Off)
        } else {
            Ok(FanSetting::Running(percent))
        }
    }

    pub fn stop(&mut self) -> Result<(), BenchError> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|e| BenchError::Pwm(e.kind()))?;
        self.percent = 0;
        Ok(())
    }

    /// Zuletzt gesetzter Prozentwert
    pub fn percent(&self) -> u8 {
        self.percent
    }
}

// Firmware-Konfiguration: Takte, Puffer und Intervalle
//
// Kalibrierung und Pin-Mapping des Steckers liegen in bench_core::config.
// Die GPIO-Zuordnung steht in hal/board.rs.

// ============================================================================
// Lüfter (LEDC PWM)
// ============================================================================

/// PWM-Frequenz des Lüfters in kHz
pub const FAN_PWM_FREQUENCY_KHZ: u32 = 1;

// Duty-Auflösung: 10 Bit (siehe hal/board.rs), max_duty_cycle() = 1024

// ============================================================================
// Potentiometer (SPI)
// ============================================================================

/// SPI-Takt für den MCP42010 in MHz (Mode 0)
pub const POT_SPI_FREQUENCY_MHZ: u32 = 1;

// ============================================================================
// Konsole
// ============================================================================

/// Maximale Länge einer Kommandozeile in Bytes
/// `write` mit 48 Bits braucht 5 + 48 * 2 = 101 Bytes
pub const LINE_BUFFER_SIZE: usize = 160;

/// Bytes pro read()-Aufruf am USB-Serial-JTAG
pub const READ_CHUNK_SIZE: usize = 32;

/// Pause nach einem Lesefehler am USB-Serial-JTAG
pub const READ_ERROR_BACKOFF_MS: u64 = 100;

/// Kapazität des Kommando-Channels (Konsole → Control-Task)
pub const COMMAND_QUEUE_DEPTH: usize = 4;

// ============================================================================
// Schienen-Monitor
// ============================================================================

/// Intervall der periodischen Schienen-Messung in Sekunden
pub const RAIL_MONITOR_INTERVAL_SECS: u64 = 5;

/// Nach dem Power-Kill schläft der Control-Task in diesem Takt
pub const PARK_INTERVAL_SECS: u64 = 3600;

// Library-Root: Board-Verdrahtung und Embassy Tasks
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von bench-core
pub use bench_core::{Bench, BenchError, Calibration, Command, Reply};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::COMMAND_QUEUE_DEPTH;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Sender<'static, NoopRawMutex, Command, COMMAND_QUEUE_DEPTH>
// Nutze:  CommandSender

/// Channel für geparste Kommandos (Konsole → Control-Task)
///
/// Nur der Control-Task besitzt die Hardware, die Konsole schickt nur Nachrichten.
pub type CommandChannel = Channel<NoopRawMutex, Command, COMMAND_QUEUE_DEPTH>;

/// Sender für Kommandos (Konsole)
pub type CommandSender = Sender<'static, NoopRawMutex, Command, COMMAND_QUEUE_DEPTH>;

/// Receiver für Kommandos (Control-Task)
pub type CommandReceiver = Receiver<'static, NoopRawMutex, Command, COMMAND_QUEUE_DEPTH>;

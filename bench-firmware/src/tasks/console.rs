// Console Task - liest Kommandozeilen vom USB-Serial-JTAG
use bench_core::{BenchError, Command};
use defmt::{Debug2Format, info, warn};
use embassy_time::Timer;
use embedded_io_async::Read;
use esp_hal::Async;
use esp_hal::usb_serial_jtag::UsbSerialJtagRx;
use esp_println::println;
use heapless::Vec;

use crate::CommandSender;
use crate::config::{LINE_BUFFER_SIZE, READ_CHUNK_SIZE, READ_ERROR_BACKOFF_MS};

/// Was mit einer fertigen Zeile passiert ist
enum LineOutcome {
    Forwarded,
    Ignored,
    Shutdown,
}

/// Console Logic - generisch über den Byte-Stream
///
/// Sammelt Bytes bis `\r` oder `\n`, parst die Zeile und schickt das
/// Kommando an den Control-Task. Parse-Fehler werden direkt ausgegeben,
/// die Hardware bekommt sie nie zu sehen.
///
/// Kehrt zurück nachdem `shutdown` weitergeleitet wurde.
pub async fn console_logic<R: Read>(mut rx: R, commands: CommandSender) {
    let mut line: Vec<u8, LINE_BUFFER_SIZE> = Vec::new();
    let mut overflow = false;
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    info!("Console: ready");
    println!("Bench ready, type 'help' for commands");

    loop {
        let count = match rx.read(&mut chunk).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Console: read error {}", Debug2Format(&e));
                Timer::after_millis(READ_ERROR_BACKOFF_MS).await;
                continue;
            }
        };

        for &byte in &chunk[..count] {
            if byte != b'\r' && byte != b'\n' {
                if line.push(byte).is_err() {
                    overflow = true;
                }
                continue;
            }

            let outcome = if overflow {
                println!("Error: line longer than {} bytes", LINE_BUFFER_SIZE);
                LineOutcome::Ignored
            } else {
                handle_line(&line, commands).await
            };
            line.clear();
            overflow = false;

            if let LineOutcome::Shutdown = outcome {
                info!("Console: shutdown forwarded, listener stopped");
                return;
            }
        }
    }
}

async fn handle_line(bytes: &[u8], commands: CommandSender) -> LineOutcome {
    let Ok(text) = core::str::from_utf8(bytes) else {
        println!("Error: command is not valid UTF-8");
        return LineOutcome::Ignored;
    };
    if text.trim().is_empty() {
        return LineOutcome::Ignored;
    }

    match Command::parse(text) {
        Ok(command) => {
            commands.send(command).await;
            if command == Command::Shutdown {
                LineOutcome::Shutdown
            } else {
                LineOutcome::Forwarded
            }
        }
        Err(e) => {
            report_parse_error(&e);
            LineOutcome::Ignored
        }
    }
}

fn report_parse_error(e: &BenchError) {
    warn!("Console: rejected line: {}", e);
    println!("Error: {}", e);
}

/// Console Task - Embassy Task für den USB-Serial-JTAG
#[embassy_executor::task]
pub async fn console_task(rx: UsbSerialJtagRx<'static, Async>, commands: CommandSender) {
    console_logic(rx, commands).await;
}

// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::info;

// Projekt-Module
use bench_controller::hal::Board;
use bench_controller::tasks::control_task;
use bench_controller::{Bench, Calibration, CommandChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let board = match Board::init(peripherals) {
        Ok(board) => board,
        Err(e) => defmt::panic!("Board init failed: {}", e),
    };

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(board.timg0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(board.sw_interrupt);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Bench-Kontext: Power-Kill low, Lüfter aus
    let bench = match Bench::new(board.parts, Calibration::DEFAULT) {
        Ok(bench) => bench,
        Err(e) => defmt::panic!("Bench init failed: {}", e),
    };
    info!("Bench initialized");

    // Kommando-Channel erstellen (Konsole → Control-Task)
    static COMMAND_CHANNEL: static_cell::StaticCell<CommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(CommandChannel::new());

    // Spawn Control Task (besitzt ab hier die gesamte Hardware)
    spawner
        .spawn(control_task(bench, command_channel.receiver()))
        .expect("Failed to spawn control task");

    // Spawn Console Task (USB-Serial-JTAG, nur lesen - Ausgabe über esp-println)
    #[cfg(feature = "console")]
    {
        let (rx, _tx) = esp_hal::usb_serial_jtag::UsbSerialJtag::new(board.usb)
            .into_async()
            .split();
        spawner
            .spawn(bench_controller::tasks::console_task(
                rx,
                command_channel.sender(),
            ))
            .expect("Failed to spawn console task");
    }
    #[cfg(not(feature = "console"))]
    let _ = board.usb;

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

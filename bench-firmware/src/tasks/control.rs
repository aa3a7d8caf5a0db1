// Control Task - besitzt den Bench und führt alle Kommandos aus
use bench_core::{Bench, BoardIo, Frame, Rail};
use defmt::{debug, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Ticker, Timer};
use esp_println::println;

use crate::CommandReceiver;
use crate::config::{PARK_INTERVAL_SECS, RAIL_MONITOR_INTERVAL_SECS};
use crate::hal::EspBoard;

/// Control Logic - generisch über die Board-Typen
///
/// Ablauf:
/// 1. Start-Choreografie (LEDs, Schienen messen, LED 0 einfärben)
/// 2. Boot-Testmuster einmal durch die 48-Bit-Kette schieben
/// 3. Kommandos ausführen, dazwischen periodisch die Schienen messen
///
/// Kehrt nach dem Power-Kill zurück.
///
/// # Parameter
/// - `bench`: Bench-Kontext, einziger Besitzer der Hardware
/// - `commands`: Channel Receiver für Kommandos von der Konsole
pub async fn control_logic<B: BoardIo>(bench: &mut Bench<B>, commands: CommandReceiver) {
    let report = bench.startup();
    info!(
        "Startup: fixed {} V, adjustable {} V",
        report.fixed_volts, report.adjustable_volts
    );
    println!(
        "Fixed voltage: {:.2} V, adjustable voltage: {:.2} V",
        report.fixed_volts, report.adjustable_volts
    );

    let boot = bench.exchange_frame(&Frame::alternating());
    println!("Boot pattern read back: {}", boot);

    let mut monitor = Ticker::every(Duration::from_secs(RAIL_MONITOR_INTERVAL_SECS));

    loop {
        match select(commands.receive(), monitor.next()).await {
            Either::First(command) => {
                debug!("Control: executing {}", command);
                match bench.execute(command) {
                    Ok(reply) => println!("{}", reply),
                    Err(e) => {
                        warn!("Control: command failed: {}", e);
                        println!("Error: {}", e);
                    }
                }

                // Auch ein fehlgeschlagener Lüfter-Stopp endet mit Power-Kill
                if bench.is_powered_off() {
                    break;
                }
            }
            Either::Second(()) => {
                let fixed = bench.read_voltage(Rail::Fixed);
                let adjustable = bench.read_voltage(Rail::Adjustable);
                debug!("Monitor: fixed {} V, adjustable {} V", fixed, adjustable);
            }
        }
    }

    info!("Control: power latch released");
}

/// Control Task - Embassy Task für den Bench
///
/// Embassy Tasks dürfen nicht generisch sein, daher dieser dünne Wrapper
/// um `control_logic()`.
#[embassy_executor::task]
pub async fn control_task(mut bench: Bench<EspBoard>, commands: CommandReceiver) {
    control_logic(&mut bench, commands).await;

    // Kontext bleibt bestehen, alle Pins halten ihren letzten Pegel
    loop {
        Timer::after(Duration::from_secs(PARK_INTERVAL_SECS)).await;
        error!("Control: still running after power kill");
    }
}

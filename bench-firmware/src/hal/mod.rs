// Hardware Abstraction Layer (HAL) Module
//
// Verbindet die esp-hal Peripherals mit den Traits aus bench_core.
// Die Treiber selbst liegen im Core und sind auf dem Host getestet.

pub mod analog;
pub mod board;

pub use analog::AnalogBank;
pub use board::{Board, BoardError, EspBoard};

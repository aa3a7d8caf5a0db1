// Task-Modul: Enthält alle Embassy Tasks
//
// Der Control-Task besitzt die Hardware. Die Konsole schickt ihm
// geparste Kommandos über einen Embassy Channel.

pub mod console;
pub mod control;

// Re-export Tasks für einfachen Import
pub use console::console_task;
pub use control::control_task;

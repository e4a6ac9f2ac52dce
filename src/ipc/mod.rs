//! Operator input over stdin/stdout.
//!
//! Architecture:
//! - Input thread: reads one command per line and runs it synchronously
//! - Button commands go through the same dispatcher as the GPIO buttons
//!
//! Protocol:
//! - Console mode: bare words (`start`, `stop`, `copy`, `info`, `status`, `quit`)
//! - JSON mode: commands `{"cmd": "..."}`, events `{"event": "...", ...}`

mod protocol;
mod router;
mod session;

#[cfg(test)]
mod tests;

pub use protocol::{IpcCommand, IpcEvent};
pub use session::{run_input_loop, spawn_stdin_input, EventFormat};

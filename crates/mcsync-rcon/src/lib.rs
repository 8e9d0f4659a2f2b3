//! Resilient remote-console connection for mcsync.
//!
//! [`ConsoleManager`] owns one session obtained from any
//! [`mcsync_core::console::Dialer`], checks it with a canary command before
//! every use and redials with bounded retries when the check fails.
//! [`RconDialer`] binds the contract to the Source RCON protocol.

mod manager;
mod transport;

pub mod error;

pub use error::{Error, Result};
pub use manager::{Canary, ConsoleManager, RetryPolicy};
pub use transport::{RconDialer, RconSession};

//! Core types and trait definitions for mcsync.
//!
//! This crate is free of database and network dependencies. The SQLite
//! backend, the console connection manager and the reconciliation engine all
//! depend on it.

// Native `async fn` in traits; the returned futures are bounded explicitly.
#![allow(async_fn_in_trait)]

pub mod console;
pub mod error;
pub mod player;
pub mod property;
pub mod store;

pub use error::{Error, Result};

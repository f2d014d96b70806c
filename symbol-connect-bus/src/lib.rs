//! # Symbol Connect Bus
//!
//! An explicit, in-process publish/subscribe channel standing in for the
//! page-global event target that dapps and wallet extensions share.
//!
//! ```text
//! ┌──────────────┐   dispatch(Request)   ┌──────────────┐
//! │     Dapp     │ ────────┐             │    Wallet    │
//! │              │         ▼             │              │
//! └──────────────┘   ┌──────────────┐    └──────────────┘
//!         ↑          │  Signal Bus  │ ←─────────┘
//!         └───────── │              │  dispatch(Announce)
//!                    └──────────────┘
//! ```
//!
//! Each bus instance is isolated, so tests create their own instead of
//! sharing global state.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use symbol_connect_bus::InMemorySignalBus;
//! use symbol_connect_core::{Result, Signal, SignalBus, SignalKind};
//!
//! let bus = InMemorySignalBus::new();
//! bus.add_listener(SignalKind::Request, Arc::new(|_: &Signal| -> Result<()> { Ok(()) }));
//!
//! assert_eq!(bus.dispatch(Signal::Request).unwrap(), 1);
//! assert_eq!(bus.dispatch_count(SignalKind::Request), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;

pub use memory::{BusStats, InMemorySignalBus};

// Re-export the trait from core
pub use symbol_connect_core::traits::SignalBus;

//! # Symbol Connect Core
//!
//! Core types, errors, and traits for discovering and binding a Symbol wallet
//! provider from a dapp.
//!
//! This crate provides the foundational building blocks used by all other
//! Symbol Connect crates:
//!
//! - **Types**: Identity records, announce/request signals, RPC vocabulary
//! - **Validation**: The identity validator applied to every announcement
//! - **Errors**: One error enum shared by discovery and the binding facade
//! - **Constants**: Wire event names and identity format limits
//! - **Traits**: The wallet capability interface and the signal bus interface
//!
//! ## Example
//!
//! ```rust
//! use symbol_connect_core::{validation, ProviderInfo};
//!
//! let info = ProviderInfo::new(
//!     "350670db-19fa-4704-a166-e52e178b59d2",
//!     "Example Wallet",
//!     "data:image/svg+xml,<svg/>",
//!     "com.example.wallet",
//! )
//! .unwrap();
//!
//! assert!(validation::is_valid_rdns(&info.rdns));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{ConnectError, Result, RpcError};
pub use traits::*;
pub use types::*;
pub use validation::is_valid_provider_detail;

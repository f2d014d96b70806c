//! # Symbol Connect Extension
//!
//! The dapp-facing facade. A [`SymbolExtension`] binds to exactly one wallet
//! provider, either injected at construction or found through discovery, and
//! turns domain operations into RPC calls on it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use symbol_connect_extension::SymbolExtension;
//!
//! let mut extension = SymbolExtension::new(bus);
//! extension.register_provider().await?;
//!
//! if let Some(account) = extension.get_account_info().await? {
//!     println!("account {}", account.public_key);
//! } else {
//!     extension.request_account_permission().await?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod binding;
mod extension;

pub use binding::Binding;
pub use extension::SymbolExtension;

//! # Symbol Connect Discovery
//!
//! The announce/request rendezvous by which a dapp locates wallet providers
//! without knowing whether the wallet initialized before or after the page.
//!
//! ## The Protocol
//!
//! 1. The dapp registers an announce listener on the bus
//! 2. The dapp dispatches one request signal
//! 3. Each wallet announces once when it becomes ready, and again on every
//!    request it observes
//! 4. Every announcement is checked (kind, frozen, identity) before the dapp's
//!    callback sees it
//!
//! Because the listener exists before the request is sent, a wallet that
//! announced early and re-announces on request, and a wallet that starts
//! later and announces on its own, are both observed.
//!
//! ## Example
//!
//! ```rust,ignore
//! use symbol_connect_discovery::{first_provider, request_provider};
//!
//! // Every wallet, as it answers
//! let discovery = request_provider(&bus, |detail| {
//!     println!("found {}", detail.info().name);
//! })?;
//!
//! // Or just the first one
//! let detail = first_provider(&bus).await?;
//! ```
//!
//! No timeout is applied: "no wallet installed" and "wallet still starting"
//! look the same. Callers race [`first_provider`] against their own timer.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod announcer;
pub mod oneshot;
pub mod request;

#[cfg(test)]
mod test_support;

pub use announcer::{announce_provider, ProviderAnnouncer};
pub use oneshot::first_provider;
pub use request::{check_announcement, request_provider, Discovery};

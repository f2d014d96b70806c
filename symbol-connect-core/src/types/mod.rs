//! Domain types for Symbol Connect.
//!
//! - [`ProviderInfo`]: Self-describing identity a wallet presents
//! - [`ProviderDetail`]: Validated identity paired with a provider handle
//! - [`Signal`]: The request/announce rendezvous signals
//! - [`RpcRequest`], [`AccountInfo`], [`ChainInfo`]: The RPC vocabulary

mod detail;
mod info;
mod rpc;
mod signal;

pub use detail::*;
pub use info::*;
pub use rpc::*;
pub use signal::*;

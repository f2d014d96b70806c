//! Common traits for Symbol Connect.
//!
//! These traits define the seams between the dapp, the broadcast channel,
//! and wallet providers, so each side can be swapped or mocked in tests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, RpcError};
use crate::types::{ProviderEvent, RpcRequest, Signal, SignalKind};

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET PROVIDER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Callback subscribed to a provider event.
///
/// Listener identity is the identity of the `Arc`; removing a listener
/// requires the same `Arc` that was subscribed.
pub type EventListener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Returns true if both listeners are the same subscription.
pub fn same_listener(a: &EventListener, b: &EventListener) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Capability interface a wallet provider must implement.
///
/// Implementations are supplied by the wallet side; this crate never inspects
/// a provider beyond this interface.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether the provider can currently make RPC requests to the wallet.
    fn is_connected(&self) -> bool;

    /// Performs one RPC call.
    async fn request(&self, request: RpcRequest) -> std::result::Result<Value, RpcError>;

    /// Subscribes a listener to an event.
    fn on(&self, event: ProviderEvent, listener: EventListener);

    /// Unsubscribes a listener previously passed to [`WalletProvider::on`].
    fn remove_listener(&self, event: ProviderEvent, listener: &EventListener);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIGNAL BUS TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Callback registered for one signal kind.
///
/// An error returned by a listener is reported to whoever dispatched the
/// signal.
pub type SignalListener = Arc<dyn Fn(&Signal) -> Result<()> + Send + Sync>;

/// Identifies one listener registration on a bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Broadcast channel shared by a page and its wallets.
///
/// Dispatch is synchronous: every listener for the signal's kind runs before
/// `dispatch` returns, in registration order.
pub trait SignalBus: Send + Sync {
    /// Registers a listener for one signal kind.
    fn add_listener(&self, kind: SignalKind, listener: SignalListener) -> ListenerId;

    /// Removes a listener. Returns false if it was not registered.
    fn remove_listener(&self, kind: SignalKind, id: ListenerId) -> bool;

    /// Delivers a signal to every listener of its kind.
    ///
    /// Returns the number of listeners invoked, or the first listener error.
    fn dispatch(&self, signal: Signal) -> Result<usize>;
}

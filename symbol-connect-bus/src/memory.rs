//! In-memory signal bus.
//!
//! Synchronous, ordered delivery suitable for a single page and the wallets
//! injected into it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use symbol_connect_core::error::Result;
use symbol_connect_core::traits::{ListenerId, SignalBus, SignalListener};
use symbol_connect_core::types::{Signal, SignalKind};

/// Counters describing bus activity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusStats {
    /// Request signals dispatched
    pub requests_dispatched: u64,
    /// Announce signals dispatched
    pub announcements_dispatched: u64,
    /// Listeners currently registered, across all kinds
    pub listeners: usize,
}

/// In-memory signal bus.
///
/// # Delivery
///
/// - Listeners of a kind run synchronously, in registration order.
/// - The listener list is snapshotted first, so listeners may add listeners
///   or dispatch further signals without deadlocking.
/// - A failing listener does not stop delivery to the rest.
///
/// # Thread Safety
///
/// All operations take `&self` and can be called from any thread.
pub struct InMemorySignalBus {
    /// kind → listeners in registration order
    listeners: RwLock<HashMap<SignalKind, Vec<(ListenerId, SignalListener)>>>,
    /// kind → number of dispatches
    dispatched: DashMap<SignalKind, u64>,
    /// Next listener ID
    next_id: AtomicU64,
}

impl InMemorySignalBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            dispatched: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of listeners registered for a kind.
    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.listeners.read().get(&kind).map_or(0, Vec::len)
    }

    /// Number of signals of a kind dispatched so far.
    pub fn dispatch_count(&self, kind: SignalKind) -> u64 {
        self.dispatched.get(&kind).map_or(0, |count| *count)
    }

    /// Returns the current statistics.
    pub fn stats(&self) -> BusStats {
        BusStats {
            requests_dispatched: self.dispatch_count(SignalKind::Request),
            announcements_dispatched: self.dispatch_count(SignalKind::Announce),
            listeners: self.listeners.read().values().map(Vec::len).sum(),
        }
    }

    /// Drops every listener and resets the counters.
    pub fn clear(&self) {
        self.listeners.write().clear();
        self.dispatched.clear();
    }
}

impl Default for InMemorySignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemorySignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySignalBus")
            .field("stats", &self.stats())
            .finish()
    }
}

impl SignalBus for InMemorySignalBus {
    fn add_listener(&self, kind: SignalKind, listener: SignalListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .write()
            .entry(kind)
            .or_default()
            .push((id, listener));

        debug!(%id, event = %kind, "Listener added");
        id
    }

    fn remove_listener(&self, kind: SignalKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let Some(registered) = listeners.get_mut(&kind) else {
            return false;
        };

        let before = registered.len();
        registered.retain(|(existing, _)| *existing != id);
        let removed = registered.len() != before;

        if registered.is_empty() {
            listeners.remove(&kind);
        }
        if removed {
            debug!(%id, event = %kind, "Listener removed");
        }
        removed
    }

    #[instrument(skip(self, signal), fields(event = %signal.kind()))]
    fn dispatch(&self, signal: Signal) -> Result<usize> {
        let kind = signal.kind();
        *self.dispatched.entry(kind).or_insert(0) += 1;

        let snapshot: Vec<(ListenerId, SignalListener)> = self
            .listeners
            .read()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        debug!(listeners = snapshot.len(), "Dispatching signal");

        let mut first_error = None;
        for (id, listener) in &snapshot {
            if let Err(err) = listener(&signal) {
                warn!(%id, error = %err, "Signal listener failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(snapshot.len()),
        }
    }
}

//! One-shot discovery: resolve with the first valid announced provider.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use symbol_connect_core::error::{ConnectError, Result};
use symbol_connect_core::traits::{ListenerId, SignalBus, SignalListener};
use symbol_connect_core::types::{ProviderDetail, Signal, SignalKind};

use crate::request::check_announcement;

/// Detaches a listener when dropped, including on cancellation.
struct ListenerGuard {
    bus: Arc<dyn SignalBus>,
    id: ListenerId,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.bus.remove_listener(SignalKind::Announce, self.id);
    }
}

/// Waits for the first valid announcement and returns its provider detail.
///
/// Malformed announcements are reported to whoever dispatched them and do not
/// settle the wait; later announcements after the first valid one are
/// ignored. Resolves with [`ConnectError::DiscoveryClosed`] if the bus drops
/// the listener before a valid provider answers.
///
/// Never times out on its own. Dropping the future (for example when a
/// caller-side `tokio::time::timeout` fires) detaches the listener.
pub async fn first_provider(bus: &Arc<dyn SignalBus>) -> Result<ProviderDetail> {
    let (tx, rx) = oneshot::channel::<ProviderDetail>();
    let slot = Mutex::new(Some(tx));

    let listener: SignalListener = Arc::new(move |signal: &Signal| -> Result<()> {
        let detail = check_announcement(signal)?;

        if let Some(tx) = slot.lock().take() {
            // The receiver is gone only if the caller stopped waiting.
            let _ = tx.send(detail);
        }
        Ok(())
    });

    let guard = ListenerGuard {
        bus: Arc::clone(bus),
        id: bus.add_listener(SignalKind::Announce, listener),
    };

    if let Err(err) = bus.dispatch(Signal::Request) {
        warn!(id = %guard.id, error = %err, "Ignoring malformed answer to provider request");
    }

    let detail = rx.await.map_err(|_| ConnectError::DiscoveryClosed)?;
    debug!(id = %guard.id, wallet = %detail.info().name, "First provider settled");
    Ok(detail)
}

//! Dapp side of the rendezvous: listen for announcements, then request.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use symbol_connect_core::constants::ANNOUNCE_PROVIDER_EVENT;
use symbol_connect_core::error::{ConnectError, Result};
use symbol_connect_core::traits::{ListenerId, SignalBus, SignalListener};
use symbol_connect_core::types::{ProviderDetail, Signal, SignalKind};
use symbol_connect_core::validation;

/// Checks an announce signal and returns the detail it carries.
///
/// The signal must be an announcement, its detail must be frozen, and the
/// detail must pass identity validation. Any failure is reported as
/// [`ConnectError::MalformedAnnouncement`]: a non-conforming wallet is an
/// integration bug, not a runtime condition to skip over.
pub fn check_announcement(signal: &Signal) -> Result<ProviderDetail> {
    let malformed = || ConnectError::MalformedAnnouncement {
        event: ANNOUNCE_PROVIDER_EVENT,
    };

    let Signal::Announce(announcement) = signal else {
        warn!(event = %signal.kind(), "Announce listener received a foreign signal");
        return Err(malformed());
    };

    if !announcement.is_frozen() {
        warn!("Rejected announcement with an unfrozen detail");
        return Err(malformed());
    }

    validation::check_provider_detail(announcement.detail()).map_err(|err| {
        warn!(reason = %err, "Rejected announcement with an invalid detail");
        malformed()
    })
}

/// An active announce listener created by [`request_provider`].
///
/// Dropping the handle keeps the listener registered; call
/// [`Discovery::stop`] to detach it.
pub struct Discovery {
    bus: Arc<dyn SignalBus>,
    id: ListenerId,
    request_error: Option<ConnectError>,
}

impl Discovery {
    /// Bus registration backing this discovery.
    pub fn listener_id(&self) -> ListenerId {
        self.id
    }

    /// Error raised while wallets answered the request, if any.
    ///
    /// Set when a malformed announcement arrived alongside at least one valid
    /// one; the listener stays registered in that case.
    pub fn request_error(&self) -> Option<&ConnectError> {
        self.request_error.as_ref()
    }

    /// Stops listening for announcements.
    ///
    /// Returns false if the bus had already dropped the listener.
    pub fn stop(self) -> bool {
        self.bus.remove_listener(SignalKind::Announce, self.id)
    }
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("id", &self.id)
            .field("request_error", &self.request_error)
            .finish()
    }
}

/// Forwards every valid announced provider to `on_provider`.
///
/// Registers the announce listener first, then dispatches exactly one request
/// signal, and returns without waiting. `on_provider` runs synchronously once
/// per valid announcement, so it fires once per answering wallet (and again
/// whenever a wallet re-announces).
///
/// If wallets answer the request synchronously and one of them is malformed:
/// - when no valid wallet was delivered, the listener is detached and the
///   error returned;
/// - otherwise the listener stays registered and the error is kept on the
///   returned handle, see [`Discovery::request_error`].
pub fn request_provider<F>(bus: &Arc<dyn SignalBus>, on_provider: F) -> Result<Discovery>
where
    F: Fn(ProviderDetail) + Send + Sync + 'static,
{
    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&delivered);

    let listener: SignalListener = Arc::new(move |signal: &Signal| -> Result<()> {
        let detail = check_announcement(signal)?;
        debug!(wallet = %detail.info().name, rdns = %detail.info().rdns, "Provider announced");
        counter.fetch_add(1, Ordering::SeqCst);
        on_provider(detail);
        Ok(())
    });

    let mut discovery = Discovery {
        bus: Arc::clone(bus),
        id: bus.add_listener(SignalKind::Announce, listener),
        request_error: None,
    };

    if let Err(err) = bus.dispatch(Signal::Request) {
        if delivered.load(Ordering::SeqCst) == 0 {
            discovery.stop();
            return Err(err);
        }
        warn!(id = %discovery.id, error = %err, "Malformed answer next to a valid provider");
        discovery.request_error = Some(err);
    }

    debug!(id = %discovery.id, "Provider requested");
    Ok(discovery)
}

//! Wallet side of the rendezvous.
//!
//! A conforming wallet announces once when it becomes ready, then keeps
//! listening for request signals and re-announces a freshly frozen detail on
//! each one, for as long as the page lives. This module implements that
//! contract for in-process wallets, simulators, and tests.

use std::sync::{Arc, Weak};

use tracing::{debug, info};

use symbol_connect_core::error::Result;
use symbol_connect_core::traits::{ListenerId, SignalBus, SignalListener};
use symbol_connect_core::types::{Announcement, ProviderDetail, Signal, SignalKind};

/// A provider announcing itself on a bus.
pub struct ProviderAnnouncer {
    bus: Arc<dyn SignalBus>,
    detail: ProviderDetail,
    request_listener: ListenerId,
}

impl ProviderAnnouncer {
    /// The detail being announced.
    pub fn detail(&self) -> &ProviderDetail {
        &self.detail
    }

    /// Dispatches the announcement again.
    pub fn announce(&self) -> Result<usize> {
        dispatch_announcement(self.bus.as_ref(), &self.detail)
    }

    /// Stops answering request signals.
    pub fn withdraw(self) -> bool {
        info!(wallet = %self.detail.info().name, "Provider withdrawn");
        self.bus
            .remove_listener(SignalKind::Request, self.request_listener)
    }
}

impl std::fmt::Debug for ProviderAnnouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAnnouncer")
            .field("detail", &self.detail)
            .field("request_listener", &self.request_listener)
            .finish()
    }
}

fn dispatch_announcement(bus: &dyn SignalBus, detail: &ProviderDetail) -> Result<usize> {
    bus.dispatch(Signal::Announce(Announcement::frozen(detail.to_raw())))
}

/// Announces `detail` now and on every future request signal.
///
/// The identity record is validated first so a misconfigured wallet fails
/// here rather than in every dapp. Errors raised by dapp listeners while the
/// initial announcement is delivered are returned to the caller.
pub fn announce_provider(bus: &Arc<dyn SignalBus>, detail: ProviderDetail) -> Result<ProviderAnnouncer> {
    detail.info().validate()?;

    let receivers = dispatch_announcement(bus.as_ref(), &detail)?;
    debug!(wallet = %detail.info().name, receivers, "Provider announced");

    // Weak, so the bus does not keep itself alive through its own listener.
    let weak: Weak<dyn SignalBus> = Arc::downgrade(bus);
    let answer = detail.clone();
    let listener: SignalListener = Arc::new(move |_: &Signal| -> Result<()> {
        let Some(bus) = weak.upgrade() else {
            return Ok(());
        };
        dispatch_announcement(bus.as_ref(), &answer).map(|_| ())
    });

    let request_listener = bus.add_listener(SignalKind::Request, listener);
    info!(wallet = %detail.info().name, rdns = %detail.info().rdns, "Provider ready");

    Ok(ProviderAnnouncer {
        bus: Arc::clone(bus),
        detail,
        request_listener,
    })
}

//! Discovery signals.
//!
//! Signals are transient and fire-and-forget. A dapp dispatches
//! [`Signal::Request`]; wallets answer with [`Signal::Announce`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ANNOUNCE_PROVIDER_EVENT, INITIALIZED_EVENT, REQUEST_PROVIDER_EVENT};
use crate::types::{DetailValue, RawProviderDetail};

/// Named kinds of discovery signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    /// Wallet → dapp, carries a provider detail.
    Announce,
    /// Dapp → wallets, no payload.
    Request,
    /// Reserved. No signal of this kind is ever constructed.
    Initialized,
}

impl SignalKind {
    /// Wire event name of this kind.
    pub fn event_name(&self) -> &'static str {
        match self {
            SignalKind::Announce => ANNOUNCE_PROVIDER_EVENT,
            SignalKind::Request => REQUEST_PROVIDER_EVENT,
            SignalKind::Initialized => INITIALIZED_EVENT,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Payload of an announce signal.
///
/// Conforming producers freeze the detail before dispatch. Rust already keeps
/// the record immutable once it is on the bus, so `frozen` records the
/// producer's declared compliance, which consumers check.
#[derive(Clone, Debug)]
pub struct Announcement {
    detail: DetailValue,
    frozen: bool,
}

impl Announcement {
    /// Announcement with a frozen detail, as conforming wallets emit.
    pub fn frozen(detail: impl Into<DetailValue>) -> Self {
        Self {
            detail: detail.into(),
            frozen: true,
        }
    }

    /// Announcement whose producer did not freeze the detail.
    pub fn unfrozen(detail: impl Into<DetailValue>) -> Self {
        Self {
            detail: detail.into(),
            frozen: false,
        }
    }

    /// The announced detail.
    pub fn detail(&self) -> &DetailValue {
        &self.detail
    }

    /// Whether the producer froze the detail.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl From<RawProviderDetail> for Announcement {
    fn from(raw: RawProviderDetail) -> Self {
        Announcement::frozen(raw)
    }
}

/// A discovery signal travelling over the bus.
#[derive(Clone, Debug)]
pub enum Signal {
    /// Ask every listening wallet to announce.
    Request,
    /// A wallet announcing its provider.
    Announce(Announcement),
}

impl Signal {
    /// Kind of this signal, used for listener routing.
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Request => SignalKind::Request,
            Signal::Announce(_) => SignalKind::Announce,
        }
    }
}

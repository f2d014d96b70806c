//! Provider detail records.
//!
//! An announce signal carries an untrusted [`DetailValue`]. Only after the
//! identity validator accepts it does it become a [`ProviderDetail`], the
//! form delivered to application code.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::traits::WalletProvider;
use crate::types::ProviderInfo;

/// Opaque capability handle for a wallet provider.
pub type ProviderHandle = Arc<dyn WalletProvider>;

/// Returns true if both handles point at the same provider instance.
pub fn same_provider(a: &ProviderHandle, b: &ProviderHandle) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Whatever a producer placed in the `provider` position of a detail.
#[derive(Clone)]
pub enum ProviderSlot {
    /// A handle implementing the capability interface.
    Handle(ProviderHandle),
    /// A plain value. Never satisfies the capability interface.
    Value(Value),
}

impl fmt::Debug for ProviderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSlot::Handle(_) => f.write_str("Handle(..)"),
            ProviderSlot::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// Detail record exactly as a producer built it.
#[derive(Clone, Debug)]
pub struct RawProviderDetail {
    /// Identity record, not yet validated
    pub info: Value,
    /// Provider position
    pub provider: ProviderSlot,
}

/// Arbitrary payload of an announce signal.
#[derive(Clone, Debug)]
pub enum DetailValue {
    /// A record with `info` and `provider` positions.
    Record(RawProviderDetail),
    /// Any other value (null, array, primitive, or bare JSON object).
    Json(Value),
}

impl From<RawProviderDetail> for DetailValue {
    fn from(raw: RawProviderDetail) -> Self {
        DetailValue::Record(raw)
    }
}

impl From<Value> for DetailValue {
    fn from(value: Value) -> Self {
        DetailValue::Json(value)
    }
}

/// A provider and the information relevant for the dapp.
///
/// Instances handed out by discovery have passed identity validation.
#[derive(Clone)]
pub struct ProviderDetail {
    info: ProviderInfo,
    provider: ProviderHandle,
}

impl ProviderDetail {
    /// Pairs an identity record with a provider handle.
    pub fn new(info: ProviderInfo, provider: ProviderHandle) -> Self {
        Self { info, provider }
    }

    /// The wallet's identity record.
    pub fn info(&self) -> &ProviderInfo {
        &self.info
    }

    /// The wallet's provider handle.
    pub fn provider(&self) -> &ProviderHandle {
        &self.provider
    }

    /// Consumes the detail, keeping only the provider handle.
    pub fn into_provider(self) -> ProviderHandle {
        self.provider
    }

    /// Builds a fresh raw record carrying this detail, for (re-)announcement.
    pub fn to_raw(&self) -> RawProviderDetail {
        RawProviderDetail {
            info: self.info.to_value(),
            provider: ProviderSlot::Handle(Arc::clone(&self.provider)),
        }
    }
}

impl PartialEq for ProviderDetail {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info && same_provider(&self.provider, &other.provider)
    }
}

impl fmt::Debug for ProviderDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDetail")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

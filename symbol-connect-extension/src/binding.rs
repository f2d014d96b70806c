//! Bound/unbound state of the facade.

use symbol_connect_core::error::{ConnectError, Result};
use symbol_connect_core::types::ProviderHandle;

/// The provider a facade is committed to, if any.
#[derive(Clone, Default)]
pub enum Binding {
    /// No provider registered yet.
    #[default]
    Unbound,
    /// Committed to one provider.
    Bound(ProviderHandle),
}

impl Binding {
    /// The bound provider, or [`ConnectError::ProviderNotRegistered`].
    pub fn provider(&self) -> Result<&ProviderHandle> {
        match self {
            Binding::Bound(provider) => Ok(provider),
            Binding::Unbound => Err(ConnectError::ProviderNotRegistered),
        }
    }

    /// Whether a provider is bound.
    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Bound(_))
    }
}

impl From<Option<ProviderHandle>> for Binding {
    fn from(provider: Option<ProviderHandle>) -> Self {
        provider.map_or(Binding::Unbound, Binding::Bound)
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Unbound => f.write_str("Unbound"),
            Binding::Bound(_) => f.write_str("Bound(..)"),
        }
    }
}

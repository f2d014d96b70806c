//! Shared fixtures for discovery tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use symbol_connect_bus::InMemorySignalBus;
use symbol_connect_core::error::{Result, RpcError};
use symbol_connect_core::traits::{EventListener, ListenerId, SignalBus, SignalListener, WalletProvider};
use symbol_connect_core::types::{
    ProviderDetail, ProviderEvent, ProviderHandle, ProviderInfo, RpcRequest, Signal, SignalKind,
};

/// One call made against a [`RecordingBus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusCall {
    AddListener(SignalKind),
    Dispatch(SignalKind),
}

/// Bus wrapper that journals registrations and dispatches, in call order.
#[derive(Default)]
pub struct RecordingBus {
    pub inner: InMemorySignalBus,
    journal: Mutex<Vec<BusCall>>,
}

impl RecordingBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn journal(&self) -> Vec<BusCall> {
        self.journal.lock().clone()
    }

    pub fn dispatches(&self) -> usize {
        self.journal
            .lock()
            .iter()
            .filter(|call| matches!(call, BusCall::Dispatch(_)))
            .count()
    }

    pub fn shared(self: &Arc<Self>) -> Arc<dyn SignalBus> {
        self.clone()
    }
}

impl SignalBus for RecordingBus {
    fn add_listener(&self, kind: SignalKind, listener: SignalListener) -> ListenerId {
        self.journal.lock().push(BusCall::AddListener(kind));
        self.inner.add_listener(kind, listener)
    }

    fn remove_listener(&self, kind: SignalKind, id: ListenerId) -> bool {
        self.inner.remove_listener(kind, id)
    }

    fn dispatch(&self, signal: Signal) -> Result<usize> {
        self.journal.lock().push(BusCall::Dispatch(signal.kind()));
        self.inner.dispatch(signal)
    }
}

/// Provider with no behavior; only its identity matters here.
pub struct StubProvider;

#[async_trait]
impl WalletProvider for StubProvider {
    fn is_connected(&self) -> bool {
        true
    }

    async fn request(&self, _request: RpcRequest) -> std::result::Result<Value, RpcError> {
        Ok(Value::Null)
    }

    fn on(&self, _event: ProviderEvent, _listener: EventListener) {}

    fn remove_listener(&self, _event: ProviderEvent, _listener: &EventListener) {}
}

pub fn example_info() -> ProviderInfo {
    ProviderInfo::new(
        "350670db-19fa-4704-a166-e52e178b59d2",
        "Example Wallet",
        "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
        "com.example.wallet",
    )
    .expect("valid fixture")
}

pub fn example_detail() -> ProviderDetail {
    let provider: ProviderHandle = Arc::new(StubProvider);
    ProviderDetail::new(example_info(), provider)
}

/// Collects every detail passed to a discovery callback.
pub fn collector() -> (Arc<Mutex<Vec<ProviderDetail>>>, impl Fn(ProviderDetail) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |detail: ProviderDetail| sink.lock().push(detail))
}

//! Scripted wallet and contract doubles, plus a fake JSON-RPC endpoint

use crate::app::{ClientUpdate, WaveEvent};
use crate::wallet::{
    ContractBinding, RawWave, Result, WalletProvider, WaveError, WaveRecord, WaveStream,
};
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockWallet {
    authorized: Mutex<Vec<Address>>,
    on_request: Result<Vec<Address>>,
    pub get_calls: AtomicUsize,
    pub request_calls: AtomicUsize,
}

impl MockWallet {
    /// Wallet that already authorized `accounts`
    pub fn authorized(accounts: Vec<Address>) -> Self {
        Self {
            authorized: Mutex::new(accounts.clone()),
            on_request: Ok(accounts),
            get_calls: AtomicUsize::new(0),
            request_calls: AtomicUsize::new(0),
        }
    }

    /// Wallet with nothing authorized that answers a connect request with `on_request`
    pub fn unauthorized(on_request: Result<Vec<Address>>) -> Self {
        Self {
            authorized: Mutex::new(Vec::new()),
            on_request,
            get_calls: AtomicUsize::new(0),
            request_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn get_accounts(&self) -> Result<Vec<Address>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.on_request.clone()?;
        *self.authorized.lock().unwrap() = accounts.clone();
        Ok(accounts)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Mined,
    Reverted,
    Never,
}

pub struct MockContract {
    waves: Mutex<Vec<RawWave>>,
    read_error: Mutex<Option<WaveError>>,
    confirmation: Confirmation,
    pub sent: Mutex<Vec<(Address, String, u64)>>,
    pub get_all_calls: AtomicUsize,
    pub total_calls: AtomicUsize,
    pub subscribe_calls: AtomicUsize,
    notices: Mutex<Option<UnboundedSender<Result<WaveRecord>>>>,
}

impl MockContract {
    pub fn with_waves(waves: Vec<RawWave>) -> Self {
        Self {
            waves: Mutex::new(waves),
            read_error: Mutex::new(None),
            confirmation: Confirmation::Mined,
            sent: Mutex::new(Vec::new()),
            get_all_calls: AtomicUsize::new(0),
            total_calls: AtomicUsize::new(0),
            subscribe_calls: AtomicUsize::new(0),
            notices: Mutex::new(None),
        }
    }

    pub fn confirming(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn fail_reads(&self, error: WaveError) {
        *self.read_error.lock().unwrap() = Some(error);
    }

    pub fn set_waves(&self, waves: Vec<RawWave>) {
        *self.waves.lock().unwrap() = waves;
    }

    pub fn sent(&self) -> Vec<(Address, String, u64)> {
        self.sent.lock().unwrap().clone()
    }

    /// Push a `NewWave` notification to the live subscription
    pub fn notify(&self, record: WaveRecord) {
        if let Some(tx) = self.notices.lock().unwrap().as_ref() {
            let _ = tx.unbounded_send(Ok(record));
        }
    }

    fn check_reads(&self) -> Result<()> {
        match self.read_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContractBinding for MockContract {
    async fn get_all_waves(&self) -> Result<Vec<RawWave>> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.waves.lock().unwrap().clone())
    }

    async fn get_total_waves(&self) -> Result<U256> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(U256::from(self.waves.lock().unwrap().len()))
    }

    async fn wave(&self, from: Address, message: &str, gas_limit: u64) -> Result<TxHash> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((from, message.to_string(), gas_limit));
        Ok(TxHash::repeat_byte(sent.len() as u8))
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<()> {
        match self.confirmation {
            Confirmation::Mined => {
                let last = self.sent.lock().unwrap().last().cloned();
                if let Some((waver, message, _)) = last {
                    self.waves.lock().unwrap().push(RawWave {
                        waver,
                        timestamp: U256::from(2000u64),
                        message,
                    });
                }
                Ok(())
            }
            Confirmation::Reverted => Err(WaveError::TransactionReverted(tx_hash)),
            Confirmation::Never => futures::future::pending().await,
        }
    }

    async fn subscribe_new_waves(&self) -> Result<WaveStream> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded();
        *self.notices.lock().unwrap() = Some(tx);
        Ok(rx.boxed())
    }
}

/// Drain every event published so far
pub fn drain_events(updates: &mut UnboundedReceiver<ClientUpdate>) -> Vec<WaveEvent> {
    let mut events = Vec::new();
    while let Ok(Some(update)) = updates.try_next() {
        if let ClientUpdate::Event(event) = update {
            events.push(event);
        }
    }
    events
}

/// Last JSON-RPC request body a mock received
pub type Captured = Arc<Mutex<Option<Value>>>;

/// Echo the request id back with the given payload
fn reply(request: &mockito::Request, payload: &Value) -> Vec<u8> {
    let body: Value = serde_json::from_slice(request.body().unwrap()).unwrap();
    let mut response = json!({ "jsonrpc": "2.0", "id": body["id"] });
    for (key, value) in payload.as_object().unwrap() {
        response[key] = value.clone();
    }
    serde_json::to_vec(&response).unwrap()
}

/// Answer every call of `method` on a fake JSON-RPC endpoint with `payload`
pub async fn mock_rpc(server: &mut Server, method: &str, payload: Value) -> mockito::Mock {
    mock_rpc_capturing(server, method, payload).await.0
}

/// Like [`mock_rpc`], also keeping the request body for inspection
pub async fn mock_rpc_capturing(
    server: &mut Server,
    method: &str,
    payload: Value,
) -> (mockito::Mock, Captured) {
    let captured = Captured::default();
    let sink = captured.clone();
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": method })))
        .with_header("content-type", "application/json")
        .with_body_from_request(move |request| {
            let body: Value = serde_json::from_slice(request.body().unwrap()).unwrap();
            *sink.lock().unwrap() = Some(body);
            reply(request, &payload)
        })
        .create_async()
        .await;
    (mock, captured)
}

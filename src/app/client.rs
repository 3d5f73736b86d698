//! The wave client state machine
//!
//! Owns [`AppState`] and drives the wallet and contract collaborators through
//! the connect, fetch and submit flows. Failures are caught here, logged and
//! recorded in the state; the client never retries on its own and always
//! returns to an interactive state.

use crate::app::events::{ClientUpdate, Operation, WaveEvent};
use crate::app::state::{AppState, ClientStatus, NotificationKind};
use crate::config::Config;
use crate::wallet::types::history_from_raw;
use crate::wallet::{ContractBinding, Result, WalletProvider, WaveError, WaveRecord, WaveStream};
use alloy_primitives::{Address, TxHash};
use futures::channel::mpsc::UnboundedSender;
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct ClientSettings {
    pub gas_limit: u64,
    pub request_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub live_updates: bool,
}

impl From<&Config> for ClientSettings {
    fn from(config: &Config) -> Self {
        Self {
            gas_limit: config.contract.gas_limit,
            request_timeout: config.client.request_timeout(),
            confirmation_timeout: config.client.confirmation_timeout(),
            live_updates: config.client.live_updates,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// The wallet and the contract reached through it
#[derive(Clone)]
struct Wallet {
    provider: Arc<dyn WalletProvider>,
    contract: Arc<dyn ContractBinding>,
}

pub struct WaveClient {
    wallet: Option<Wallet>,
    settings: ClientSettings,
    state: AppState,
    subscription: Option<WaveStream>,
    updates: Option<UnboundedSender<ClientUpdate>>,
}

async fn with_timeout<T>(
    operation: &'static str,
    limit: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| WaveError::Timeout { operation, after: limit })?
}

impl WaveClient {
    /// A client without a wallet; every wallet operation reports `MissingProvider`
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            wallet: None,
            settings,
            state: AppState::new(false),
            subscription: None,
            updates: None,
        }
    }

    pub fn with_wallet(
        mut self,
        provider: Arc<dyn WalletProvider>,
        contract: Arc<dyn ContractBinding>,
    ) -> Self {
        self.wallet = Some(Wallet { provider, contract });
        self.state.wallet_available = true;
        self
    }

    /// Publish events and state snapshots to `updates`
    pub fn with_updates(mut self, updates: UnboundedSender<ClientUpdate>) -> Self {
        self.updates = Some(updates);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Send the current state to the UI
    pub fn publish(&self) {
        if let Some(updates) = &self.updates {
            let _ = updates.unbounded_send(ClientUpdate::Snapshot(Box::new(self.state.clone())));
        }
    }

    fn emit(&self, event: WaveEvent) {
        if let Some(updates) = &self.updates {
            let _ = updates.unbounded_send(ClientUpdate::Event(event));
        }
        self.publish();
    }

    fn fail(&mut self, operation: Operation, error: WaveError) -> WaveError {
        if error.is_user_rejection() {
            warn!(?operation, error = %error, "Wallet request rejected");
        } else {
            error!(?operation, error = %error, "Operation failed");
        }
        self.state.last_error = Some(error.clone());
        self.emit(WaveEvent::OperationFailed {
            operation,
            error: error.clone(),
        });
        error
    }

    fn set_connected(&mut self, account: Address) {
        self.state.account = Some(account);
        self.state.status = ClientStatus::ConnectedIdle;
        self.state.last_error = None;
        self.emit(WaveEvent::AccountConnected { account });
    }

    /// Passive start-up check: adopt an already authorized account and load
    /// the history. A missing wallet is only logged.
    pub async fn load(&mut self) -> Result<()> {
        let Some(wallet) = self.wallet.clone() else {
            info!("No wallet available, waiting for the user to connect");
            return Ok(());
        };

        let accounts = match with_timeout(
            "account check",
            self.settings.request_timeout,
            wallet.provider.get_accounts(),
        )
        .await
        {
            Ok(accounts) => accounts,
            Err(e) => return Err(self.fail(Operation::CheckAccounts, e)),
        };

        match accounts.first() {
            Some(&account) => {
                info!(%account, "Found an authorized account");
                self.set_connected(account);
                self.fetch_history().await.map(|_| ())
            }
            None => {
                info!("No authorized account found");
                self.emit(WaveEvent::NoAuthorizedAccount);
                Ok(())
            }
        }
    }

    /// Ask the wallet for an account
    pub async fn connect(&mut self) -> Result<Address> {
        let Some(wallet) = self.wallet.clone() else {
            warn!("Connect requested but no wallet is available");
            let error = WaveError::MissingProvider;
            self.state
                .add_notification(error.user_message(), NotificationKind::Warning);
            self.state.last_error = Some(error.clone());
            self.emit(WaveEvent::MissingProvider);
            return Err(error);
        };

        let prior = self.state.status;
        self.state.status = ClientStatus::Connecting;
        self.publish();

        let requested = with_timeout(
            "account request",
            self.settings.request_timeout,
            wallet.provider.request_accounts(),
        )
        .await
        .and_then(|accounts| accounts.first().copied().ok_or(WaveError::NoAuthorizedAccount));

        match requested {
            Ok(account) => {
                info!(%account, "Connected");
                self.set_connected(account);
                if let Err(e) = self.fetch_history().await {
                    debug!(error = %e, "History unavailable after connect");
                }
                Ok(account)
            }
            Err(e) => {
                self.state.status = prior;
                Err(self.fail(Operation::Connect, e))
            }
        }
    }

    /// Replace the history with the contract's current list and make sure
    /// the `NewWave` subscription is running
    pub async fn fetch_history(&mut self) -> Result<usize> {
        let Some(wallet) = self.wallet.clone() else {
            warn!("Cannot read waves without a wallet");
            return Err(WaveError::MissingProvider);
        };

        let fetched = with_timeout(
            "wave history",
            self.settings.request_timeout,
            wallet.contract.get_all_waves(),
        )
        .await
        .and_then(history_from_raw);

        let history = match fetched {
            Ok(history) => history,
            Err(e) => return Err(self.fail(Operation::FetchHistory, e)),
        };

        let count = history.len();
        self.state.waves = history;
        self.state.last_error = None;
        debug!(count, "Wave history loaded");
        self.emit(WaveEvent::HistoryLoaded { count });

        self.ensure_subscribed(&wallet).await;
        Ok(count)
    }

    async fn ensure_subscribed(&mut self, wallet: &Wallet) {
        if self.subscription.is_some() {
            return;
        }
        match with_timeout(
            "NewWave subscription",
            self.settings.request_timeout,
            wallet.contract.subscribe_new_waves(),
        )
        .await
        {
            Ok(stream) => {
                debug!("Listening for NewWave events");
                self.subscription = Some(stream);
            }
            Err(e) => {
                self.fail(Operation::Subscribe, e);
            }
        }
    }

    /// Send `draft` as a wave and wait for it to be mined, then reload.
    ///
    /// Returns `Ok(None)` for a blank draft, which sends nothing.
    pub async fn submit_wave(&mut self, draft: impl Into<String>) -> Result<Option<TxHash>> {
        let draft = draft.into();

        let Some(wallet) = self.wallet.clone() else {
            warn!("Cannot wave without a wallet");
            return Err(self.fail(Operation::SubmitWave, WaveError::MissingProvider));
        };
        if draft.trim().is_empty() {
            debug!("Ignoring empty wave");
            return Ok(None);
        }
        let Some(from) = self.state.account else {
            return Err(self.fail(Operation::SubmitWave, WaveError::NotConnected));
        };

        self.state.draft = draft.clone();
        self.state.status = ClientStatus::Submitting;
        self.publish();

        match self.send_and_confirm(&wallet, from, &draft).await {
            Ok(tx_hash) => {
                self.state.status = ClientStatus::ConnectedIdle;
                self.state
                    .add_notification("Your wave was mined!".to_string(), NotificationKind::Success);
                if let Err(e) = self.reload().await {
                    debug!(error = %e, "Reload after mining failed");
                }
                Ok(Some(tx_hash))
            }
            Err(e) => {
                self.state.mining = false;
                self.state.pending_tx = None;
                self.state.status = ClientStatus::ConnectedIdle;
                Err(self.fail(Operation::SubmitWave, e))
            }
        }
    }

    async fn send_and_confirm(
        &mut self,
        wallet: &Wallet,
        from: Address,
        message: &str,
    ) -> Result<TxHash> {
        let request_timeout = self.settings.request_timeout;

        let count = with_timeout("total wave count", request_timeout, wallet.contract.get_total_waves())
            .await?;
        info!(%count, "Retrieved total wave count");

        let tx_hash = with_timeout(
            "wave broadcast",
            request_timeout,
            wallet.contract.wave(from, message, self.settings.gas_limit),
        )
        .await?;

        self.state.mining = true;
        self.state.pending_tx = Some(tx_hash);
        info!(%tx_hash, "Mining...");
        self.emit(WaveEvent::WaveSent { tx_hash });

        with_timeout(
            "transaction confirmation",
            self.settings.confirmation_timeout,
            wallet.contract.wait_for_confirmation(tx_hash),
        )
        .await?;

        self.state.mining = false;
        self.state.pending_tx = None;
        info!(%tx_hash, "Mined");
        self.emit(WaveEvent::WaveMined { tx_hash });

        match with_timeout("total wave count", request_timeout, wallet.contract.get_total_waves()).await {
            Ok(count) => info!(%count, "Retrieved total wave count"),
            Err(e) => warn!(error = %e, "Could not read total wave count after mining"),
        }
        Ok(tx_hash)
    }

    /// Start over as if the window had just opened
    pub async fn reload(&mut self) -> Result<()> {
        self.state = self.state.reloaded();
        self.subscription = None;
        self.emit(WaveEvent::Reloaded);
        self.load().await
    }

    /// Next item from the `NewWave` subscription; pending while none is active
    pub async fn next_notification(&mut self) -> Option<Result<WaveRecord>> {
        match self.subscription.as_mut() {
            Some(stream) => {
                let item = stream.next().await;
                if item.is_none() {
                    debug!("NewWave subscription ended");
                    self.subscription = None;
                }
                item
            }
            None => futures::future::pending().await,
        }
    }

    pub async fn handle_notification(&mut self, item: Result<WaveRecord>) {
        let wave = match item {
            Ok(wave) => wave,
            Err(e) => {
                warn!(error = %e, "Unreadable NewWave notification");
                return;
            }
        };

        info!(
            from = %wave.sender,
            timestamp = %wave.timestamp,
            message = %wave.message,
            "NewWave"
        );
        self.emit(WaveEvent::NewWaveObserved(wave));

        if self.settings.live_updates {
            if let Err(e) = self.fetch_history().await {
                debug!(error = %e, "Live refresh failed");
            }
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

//! Hosts the [`WaveClient`] on a tokio runtime beside the UI thread.
//!
//! The window sends [`ClientCommand`]s and receives [`ClientUpdate`]s over
//! runtime-agnostic channels. Commands run one at a time, in order.

use crate::app::client::{ClientSettings, WaveClient};
use crate::app::events::ClientUpdate;
use crate::config::Config;
use crate::wallet::{RpcWallet, WavePortalContract};
use anyhow::{Context, Result};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    Connect,
    SubmitWave(String),
    Refresh,
    Shutdown,
}

/// Sending side held by the window
#[derive(Clone)]
pub struct ClientHandle {
    commands: UnboundedSender<ClientCommand>,
}

impl ClientHandle {
    pub fn send(&self, command: ClientCommand) {
        if self.commands.unbounded_send(command).is_err() {
            warn!("Wave client is no longer running");
        }
    }

    pub fn connect(&self) {
        self.send(ClientCommand::Connect);
    }

    pub fn submit_wave(&self, draft: impl Into<String>) {
        self.send(ClientCommand::SubmitWave(draft.into()));
    }

    pub fn refresh(&self) {
        self.send(ClientCommand::Refresh);
    }

    pub fn shutdown(&self) {
        self.send(ClientCommand::Shutdown);
    }
}

pub struct ClientRuntime {
    pub handle: ClientHandle,
    pub updates: UnboundedReceiver<ClientUpdate>,
    pub thread: JoinHandle<()>,
}

impl ClientRuntime {
    /// Start the client thread: detect the wallet, run the start-up check,
    /// then serve commands until shutdown
    pub fn spawn(config: Config) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::unbounded();
        let (update_tx, update_rx) = mpsc::unbounded();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("wave-client-worker")
            .build()
            .context("Failed to create tokio runtime")?;

        let thread = std::thread::Builder::new()
            .name("wave-client".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let client = build_client(&config).await.with_updates(update_tx);
                    run_client(client, command_rx).await;
                });
            })
            .context("Failed to spawn client thread")?;

        Ok(Self {
            handle: ClientHandle {
                commands: command_tx,
            },
            updates: update_rx,
            thread,
        })
    }
}

async fn build_client(config: &Config) -> WaveClient {
    let client = WaveClient::new(ClientSettings::from(config));
    let probe_timeout = Duration::from_secs(config.wallet.probe_timeout_secs);

    match RpcWallet::detect(config.wallet.rpc_url.as_deref(), probe_timeout).await {
        Some(wallet) => {
            let contract = WavePortalContract::new(config.contract.address, wallet.provider());
            info!(wallet = wallet.url(), contract = %contract.address(), "WavePortal binding ready");
            client.with_wallet(Arc::new(wallet), Arc::new(contract))
        }
        None => client,
    }
}

/// Serve commands and subscription notifications until shutdown
pub async fn run_client(mut client: WaveClient, mut commands: UnboundedReceiver<ClientCommand>) {
    if let Err(e) = client.load().await {
        debug!(error = %e, "Start-up check failed");
    }
    client.publish();

    loop {
        tokio::select! {
            command = commands.next() => match command {
                Some(ClientCommand::Shutdown) | None => break,
                Some(command) => dispatch(&mut client, command).await,
            },
            Some(item) = client.next_notification() => client.handle_notification(item).await,
        }
        client.publish();
    }
    info!("Wave client stopped");
}

async fn dispatch(client: &mut WaveClient, command: ClientCommand) {
    debug!(?command, "Handling command");
    let result = match command {
        ClientCommand::Connect => client.connect().await.map(|_| ()),
        ClientCommand::SubmitWave(draft) => client.submit_wave(draft).await.map(|_| ()),
        ClientCommand::Refresh => client.fetch_history().await.map(|_| ()),
        ClientCommand::Shutdown => Ok(()),
    };
    // Already logged and recorded by the client
    if let Err(e) = result {
        debug!(error = %e, "Command finished with error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ClientStatus, WaveEvent};
    use crate::testing::{drain_events, MockContract, MockWallet};
    use crate::wallet::{RawWave, WaveError};
    use alloy_primitives::{address, Address, U256};

    const ACCOUNT: Address = address!("0000000000000000000000000000000000000abc");

    fn last_snapshot(events: &mut UnboundedReceiver<ClientUpdate>) -> Option<Box<crate::app::AppState>> {
        let mut last = None;
        while let Ok(Some(update)) = events.try_next() {
            if let ClientUpdate::Snapshot(state) = update {
                last = Some(state);
            }
        }
        last
    }

    #[tokio::test]
    async fn test_commands_run_in_order() {
        let wallet = Arc::new(MockWallet::unauthorized(Ok(vec![ACCOUNT])));
        let contract = Arc::new(MockContract::with_waves(vec![RawWave {
            waver: ACCOUNT,
            timestamp: U256::from(1000u64),
            message: "hi".into(),
        }]));
        let (update_tx, mut update_rx) = mpsc::unbounded();
        let client = WaveClient::new(ClientSettings::default())
            .with_wallet(wallet, contract.clone())
            .with_updates(update_tx);

        let (command_tx, command_rx) = mpsc::unbounded();
        let handle = ClientHandle { commands: command_tx };
        handle.connect();
        handle.submit_wave("hello");
        handle.shutdown();

        run_client(client, command_rx).await;

        assert_eq!(contract.sent(), vec![(ACCOUNT, "hello".to_string(), 300_000)]);
        let state = last_snapshot(&mut update_rx).unwrap();
        assert_eq!(state.status, ClientStatus::ConnectedIdle);
        assert_eq!(state.account, Some(ACCOUNT));
        assert_eq!(state.waves.len(), 2);
        assert_eq!(state.reload_count, 1);
    }

    #[tokio::test]
    async fn test_runtime_without_wallet_reports_missing_provider() {
        let (update_tx, mut update_rx) = mpsc::unbounded();
        let client = WaveClient::new(ClientSettings::default()).with_updates(update_tx);

        let (command_tx, command_rx) = mpsc::unbounded();
        let handle = ClientHandle { commands: command_tx };
        handle.connect();
        handle.submit_wave("hello");
        handle.shutdown();

        run_client(client, command_rx).await;

        let events = drain_events(&mut update_rx);
        assert_eq!(events[0], WaveEvent::MissingProvider);
        assert!(events.iter().any(|e| matches!(
            e,
            WaveEvent::OperationFailed { error: WaveError::MissingProvider, .. }
        )));
    }

    #[tokio::test]
    async fn test_stops_when_window_goes_away() {
        let client = WaveClient::new(ClientSettings::default());
        let (command_tx, command_rx) = mpsc::unbounded::<ClientCommand>();
        drop(command_tx);

        run_client(client, command_rx).await;
    }
}

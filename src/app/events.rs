use crate::app::state::AppState;
use crate::wallet::{WaveError, WaveRecord};
use alloy_primitives::{Address, TxHash};

/// Client operation, named in failure events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    CheckAccounts,
    Connect,
    FetchHistory,
    Subscribe,
    SubmitWave,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WaveEvent {
    // Account events
    AccountConnected { account: Address },
    NoAuthorizedAccount,
    MissingProvider,

    // History events
    HistoryLoaded { count: usize },
    NewWaveObserved(WaveRecord),

    // Transaction events
    WaveSent { tx_hash: TxHash },
    WaveMined { tx_hash: TxHash },
    Reloaded,

    OperationFailed { operation: Operation, error: WaveError },
}

/// What the client publishes to the window
#[derive(Clone, Debug)]
pub enum ClientUpdate {
    Snapshot(Box<AppState>),
    Event(WaveEvent),
}

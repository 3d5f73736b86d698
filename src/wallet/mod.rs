pub mod contract;
pub mod error;
pub mod provider;
pub mod storage;
pub mod types;

pub use contract::WavePortalContract;
pub use error::{Result, WaveError};
pub use provider::RpcWallet;
pub use storage::{FilePreferenceStore, PreferenceStore};
pub use types::{short_address, RawWave, WaveRecord};

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Live feed of `NewWave` notifications
pub type WaveStream = BoxStream<'static, Result<WaveRecord>>;

/// Account discovery on the user's wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Non-intrusive check for already authorized accounts (`eth_accounts`)
    async fn get_accounts(&self) -> Result<Vec<Address>>;

    /// Ask the user to authorize accounts (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<Address>>;
}

/// Typed proxy over the WavePortal contract
#[async_trait]
pub trait ContractBinding: Send + Sync {
    async fn get_all_waves(&self) -> Result<Vec<RawWave>>;

    async fn get_total_waves(&self) -> Result<U256>;

    /// Broadcast a `wave(message)` transaction from `from`; signing happens in the wallet
    async fn wave(&self, from: Address, message: &str, gas_limit: u64) -> Result<TxHash>;

    /// Resolve once the transaction is mined
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<()>;

    async fn subscribe_new_waves(&self) -> Result<WaveStream>;
}

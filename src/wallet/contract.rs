use crate::wallet::error::{Result, WaveError};
use crate::wallet::provider::{map_transport_error, user_rejection};
use crate::wallet::types::{RawWave, WaveRecord};
use crate::wallet::{ContractBinding, WaveStream};
use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider};
use alloy_sol_types::sol;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

sol! {
    #[sol(rpc)]
    contract WavePortal {
        struct Wave {
            address waver;
            string message;
            uint256 timestamp;
        }

        event NewWave(address indexed from, uint256 timestamp, string message);

        function wave(string memory _message) public;
        function getAllWaves() public view returns (Wave[] memory);
        function getTotalWaves() public view returns (uint256);
    }
}

impl From<WavePortal::Wave> for RawWave {
    fn from(wave: WavePortal::Wave) -> Self {
        Self {
            waver: wave.waver,
            timestamp: wave.timestamp,
            message: wave.message,
        }
    }
}

impl From<WavePortal::NewWave> for RawWave {
    fn from(event: WavePortal::NewWave) -> Self {
        Self {
            waver: event.from,
            timestamp: event.timestamp,
            message: event.message,
        }
    }
}

/// WavePortal deployed at a fixed address, reached through the wallet's endpoint
#[derive(Clone)]
pub struct WavePortalContract {
    address: Address,
    provider: DynProvider,
}

impl WavePortalContract {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn instance(&self) -> WavePortal::WavePortalInstance<DynProvider> {
        WavePortal::new(self.address, self.provider.clone())
    }
}

fn map_contract_error(err: alloy_contract::Error) -> WaveError {
    match &err {
        alloy_contract::Error::TransportError(transport) => user_rejection(transport)
            .unwrap_or_else(|| WaveError::ContractCall(err.to_string())),
        _ => WaveError::ContractCall(err.to_string()),
    }
}

#[async_trait]
impl ContractBinding for WavePortalContract {
    async fn get_all_waves(&self) -> Result<Vec<RawWave>> {
        let waves = self
            .instance()
            .getAllWaves()
            .call()
            .await
            .map_err(map_contract_error)?;
        Ok(waves.into_iter().map(RawWave::from).collect())
    }

    async fn get_total_waves(&self) -> Result<U256> {
        self.instance()
            .getTotalWaves()
            .call()
            .await
            .map_err(map_contract_error)
    }

    async fn wave(&self, from: Address, message: &str, gas_limit: u64) -> Result<TxHash> {
        let pending = self
            .instance()
            .wave(message.to_string())
            .from(from)
            .gas(gas_limit)
            .send()
            .await
            .map_err(map_contract_error)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<()> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| WaveError::Rpc(e.to_string()))?;

        debug!(%tx_hash, block = ?receipt.block_number(), "Receipt received");
        if receipt.status() {
            Ok(())
        } else {
            Err(WaveError::TransactionReverted(tx_hash))
        }
    }

    async fn subscribe_new_waves(&self) -> Result<WaveStream> {
        let poller = self
            .instance()
            .NewWave_filter()
            .watch()
            .await
            .map_err(map_transport_error)?;

        let stream = poller.into_stream().map(|item| {
            let (event, _log) = item.map_err(|e| WaveError::InvalidResponse(e.to_string()))?;
            WaveRecord::try_from(RawWave::from(event))
        });
        Ok(stream.boxed())
    }
}

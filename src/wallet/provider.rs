use crate::wallet::error::{Result, WaveError, USER_REJECTED_CODE};
use crate::wallet::WalletProvider;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_transport::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wallet reachable over an EIP-1193 style JSON-RPC endpoint.
///
/// Accounts are managed and transactions are signed inside the wallet; this
/// side only asks for them.
#[derive(Clone)]
pub struct RpcWallet {
    provider: DynProvider,
    url: String,
}

impl RpcWallet {
    /// Build a client for the endpoint without touching the network
    pub async fn connect(url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect(url)
            .await
            .map_err(|e| WaveError::Rpc(format!("invalid wallet endpoint {url}: {e}")))?
            .erased();

        Ok(Self {
            provider,
            url: url.to_string(),
        })
    }

    /// Look for a wallet at the configured endpoint.
    ///
    /// Returns `None` when nothing is configured or the endpoint does not
    /// answer `eth_chainId` within `probe_timeout`.
    pub async fn detect(rpc_url: Option<&str>, probe_timeout: Duration) -> Option<Self> {
        let Some(url) = rpc_url else {
            info!("No wallet endpoint configured");
            return None;
        };

        let wallet = match Self::connect(url).await {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!(error = %e, "Make sure you have a wallet running");
                return None;
            }
        };

        match tokio::time::timeout(probe_timeout, wallet.chain_id()).await {
            Ok(Ok(chain_id)) => {
                info!(url, chain_id, "We have a wallet endpoint");
                Some(wallet)
            }
            Ok(Err(e)) => {
                warn!(url, error = %e, "Make sure you have a wallet running");
                None
            }
            Err(_) => {
                warn!(url, timeout_secs = probe_timeout.as_secs(), "Wallet endpoint did not answer");
                None
            }
        }
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(map_transport_error)
    }

    /// Provider handle shared with the contract binding
    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn get_accounts(&self) -> Result<Vec<Address>> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(map_transport_error)?;
        debug!(count = accounts.len(), "eth_accounts");
        Ok(accounts)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .map_err(map_transport_error)?;
        debug!(count = accounts.len(), "eth_requestAccounts");
        Ok(accounts)
    }
}

/// The wallet's answer when the user declined the prompt, if that is what this is
pub(crate) fn user_rejection(err: &TransportError) -> Option<WaveError> {
    err.as_error_resp()
        .filter(|payload| payload.code == USER_REJECTED_CODE)
        .map(|payload| WaveError::RequestRejected(payload.message.to_string()))
}

pub(crate) fn map_transport_error(err: TransportError) -> WaveError {
    user_rejection(&err).unwrap_or_else(|| WaveError::Rpc(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_rpc as mock_method;
    use alloy_primitives::address;
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_accounts() {
        let mut server = Server::new_async().await;
        let _m = mock_method(
            &mut server,
            "eth_accounts",
            json!({ "result": ["0x98b71a6bd534feaad17bb401fb85b93b00e1d547"] }),
        )
        .await;

        let wallet = RpcWallet::connect(&server.url()).await.unwrap();
        let accounts = wallet.get_accounts().await.unwrap();
        assert_eq!(accounts, vec![address!("98B71a6bd534feaAd17bb401FB85B93B00E1D547")]);
    }

    #[tokio::test]
    async fn test_request_accounts_rejected_by_user() {
        let mut server = Server::new_async().await;
        let _m = mock_method(
            &mut server,
            "eth_requestAccounts",
            json!({ "error": { "code": 4001, "message": "User rejected the request." } }),
        )
        .await;

        let wallet = RpcWallet::connect(&server.url()).await.unwrap();
        let err = wallet.request_accounts().await.unwrap_err();
        assert_eq!(err, WaveError::RequestRejected("User rejected the request.".into()));
    }

    #[tokio::test]
    async fn test_other_rpc_errors_are_not_rejections() {
        let mut server = Server::new_async().await;
        let _m = mock_method(
            &mut server,
            "eth_requestAccounts",
            json!({ "error": { "code": -32603, "message": "internal error" } }),
        )
        .await;

        let wallet = RpcWallet::connect(&server.url()).await.unwrap();
        let err = wallet.request_accounts().await.unwrap_err();
        assert!(matches!(err, WaveError::Rpc(_)));
    }

    #[tokio::test]
    async fn test_detect_finds_answering_endpoint() {
        let mut server = Server::new_async().await;
        let _m = mock_method(&mut server, "eth_chainId", json!({ "result": "0x5" })).await;

        let url = server.url();
        let wallet = RpcWallet::detect(Some(&url), Duration::from_secs(5)).await;
        assert!(wallet.is_some());
        assert_eq!(wallet.unwrap().url(), url);
    }

    #[tokio::test]
    async fn test_detect_without_endpoint() {
        assert!(RpcWallet::detect(None, Duration::from_secs(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_detect_failing_endpoint() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(503)
            .create_async()
            .await;

        let url = server.url();
        assert!(RpcWallet::detect(Some(&url), Duration::from_secs(5)).await.is_none());
    }
}

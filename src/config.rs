//! Configuration for the wave client
//!
//! Read from `config.toml` in the user's config directory; every field has a
//! default so the file is optional.

use alloy_primitives::{address, Address};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Deployed WavePortal contract
pub const DEFAULT_CONTRACT: Address = address!("98B71a6bd534feaAd17bb401FB85B93B00E1D547");

/// Gas ceiling attached to every wave transaction
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wallet: WalletConfig,
    pub contract: ContractConfig,
    pub client: ClientConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// JSON-RPC endpoint exposed by the wallet; `None` means no wallet
    pub rpc_url: Option<String>,
    pub probe_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: Some("http://127.0.0.1:1248".to_string()),
            probe_timeout_secs: 3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub address: Address,
    pub gas_limit: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT,
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Bound on wallet prompts and contract reads
    pub request_timeout_secs: u64,
    /// Bound on waiting for a wave to be mined
    pub confirmation_timeout_secs: u64,
    /// Refetch the history when a `NewWave` notification arrives
    pub live_updates: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            confirmation_timeout_secs: 600,
            live_updates: false,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where preferences are kept; defaults to the user data directory
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load from `WAVE_PORTAL_CONFIG` or the default location, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os("WAVE_PORTAL_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wave-portal").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("WAVE_PORTAL_RPC_URL") {
            self.wallet.rpc_url = if url.is_empty() { None } else { Some(url) };
        }
        if let Ok(address) = std::env::var("WAVE_PORTAL_CONTRACT") {
            self.contract.address = address
                .parse()
                .with_context(|| format!("Invalid WAVE_PORTAL_CONTRACT {address}"))?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.contract.gas_limit == 0 {
            bail!("contract.gas_limit must be greater than zero");
        }
        if self.client.request_timeout_secs == 0 || self.client.confirmation_timeout_secs == 0 {
            bail!("client timeouts must be greater than zero");
        }
        if self.wallet.probe_timeout_secs == 0 {
            bail!("wallet.probe_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage.dir.clone()
    }
}

use crate::wallet::error::{Result, WaveError};
use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};

/// A wave exactly as the contract returns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWave {
    pub waver: Address,
    /// Seconds since the epoch
    pub timestamp: U256,
    pub message: String,
}

/// A validated wave ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveRecord {
    pub sender: Address,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl TryFrom<RawWave> for WaveRecord {
    type Error = WaveError;

    fn try_from(raw: RawWave) -> Result<Self> {
        Ok(Self {
            sender: raw.waver,
            timestamp: timestamp_from_seconds(raw.timestamp)?,
            message: raw.message,
        })
    }
}

/// Convert a contract timestamp (seconds) into a point in time
pub fn timestamp_from_seconds(seconds: U256) -> Result<DateTime<Utc>> {
    let out_of_range = || WaveError::InvalidResponse(format!("timestamp {seconds} out of range"));
    u64::try_from(seconds)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(out_of_range)
}

/// Convert a whole fetch; one bad record rejects the batch
pub fn history_from_raw(raw: Vec<RawWave>) -> Result<Vec<WaveRecord>> {
    raw.into_iter().map(WaveRecord::try_from).collect()
}

/// Shortened address for display (first 6 and last 4 chars)
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

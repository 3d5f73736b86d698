use crate::wallet::{WaveError, WaveRecord};
use alloy_primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

const MAX_NOTIFICATIONS: usize = 10;

/// Where the client is in the connect/submit flow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientStatus {
    Disconnected,
    Connecting,
    ConnectedIdle,
    Submitting,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Everything the window renders
#[derive(Clone, Debug)]
pub struct AppState {
    pub status: ClientStatus,
    pub account: Option<Address>,
    /// Whether a wallet endpoint was found at start-up
    pub wallet_available: bool,
    /// Contract order; render with [`AppState::waves_newest_first`]
    pub waves: Vec<WaveRecord>,
    pub draft: String,
    pub mining: bool,
    pub pending_tx: Option<TxHash>,
    pub notifications: VecDeque<Notification>,
    pub last_error: Option<WaveError>,
    pub reload_count: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AppState {
    pub fn new(wallet_available: bool) -> Self {
        Self {
            status: ClientStatus::Disconnected,
            account: None,
            wallet_available,
            waves: Vec::new(),
            draft: String::new(),
            mining: false,
            pending_tx: None,
            notifications: VecDeque::new(),
            last_error: None,
            reload_count: 0,
        }
    }

    /// State as a fresh page load would see it. Notifications carry over.
    pub fn reloaded(&self) -> Self {
        Self {
            notifications: self.notifications.clone(),
            reload_count: self.reload_count + 1,
            ..Self::new(self.wallet_available)
        }
    }

    pub fn waves_newest_first(&self) -> impl Iterator<Item = &WaveRecord> {
        self.waves.iter().rev()
    }

    /// Submit control is usable: connected, idle and not mining
    pub fn can_submit(&self) -> bool {
        self.wallet_available
            && self.account.is_some()
            && self.status == ClientStatus::ConnectedIdle
            && !self.mining
    }

    pub fn add_notification(&mut self, message: String, kind: NotificationKind) {
        let notification = Notification {
            id: Uuid::new_v4(),
            message,
            kind,
            timestamp: Utc::now(),
        };
        self.notifications.push_back(notification);

        // Keep only the most recent notifications
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.back()
    }
}

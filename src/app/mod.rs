mod client;
mod events;
mod runtime;
mod state;

pub use client::{ClientSettings, WaveClient};
pub use events::{ClientUpdate, Operation, WaveEvent};
pub use runtime::{ClientCommand, ClientHandle, ClientRuntime};
pub use state::{AppState, ClientStatus, Notification, NotificationKind};

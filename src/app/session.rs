use std::sync::Mutex;

use chrono::Utc;

use crate::app::models::ConnectRecord;

/// Session-scoped state shared with the shell. Single writer: only the connect
/// operation touches the record, and it overwrites unconditionally.
pub struct SessionState {
    last_connect: Mutex<Option<ConnectRecord>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            last_connect: Mutex::new(None),
        }
    }

    /// Overwrites the last-connected address. Called once the connect command
    /// has been issued, before its output is interpreted.
    pub fn record_connect(&self, address: &str) {
        let mut guard = self
            .last_connect
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(ConnectRecord {
            address: address.to_string(),
            connected_at: Utc::now(),
        });
    }

    pub fn last_connect(&self) -> Option<ConnectRecord> {
        self.last_connect
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

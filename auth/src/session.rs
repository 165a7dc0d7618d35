use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Session data stored for signed-in users
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    /// Email the user signed in with
    pub user_id: String,

    /// Display name
    pub display_name: Option<String>,

    /// Session creation timestamp (Unix timestamp)
    pub created_at: u64,
}

impl SessionData {
    pub fn new(user_id: String, display_name: Option<String>) -> Self {
        Self {
            user_id,
            display_name,
            created_at: unix_now(),
        }
    }

    pub fn is_expired(&self, timeout_seconds: u64) -> bool {
        unix_now().saturating_sub(self.created_at) > timeout_seconds
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = SessionData::new("a@b.com".to_string(), None);
        assert!(!session.is_expired(60));
    }

    #[test]
    fn test_old_session_expired() {
        let mut session = SessionData::new("a@b.com".to_string(), None);
        session.created_at -= 120;
        assert!(session.is_expired(60));
        assert!(!session.is_expired(3600));
    }

    #[test]
    fn test_future_timestamp_does_not_underflow() {
        let mut session = SessionData::new("a@b.com".to_string(), None);
        session.created_at += 1000;
        assert!(!session.is_expired(0));
    }
}

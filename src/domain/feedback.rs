use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer feedback message, created externally by the bot.
///
/// A message is replied to at most once: `admin_reply` and `replied_at` are
/// populated together when `is_replied` flips true, and never change after.
/// This client never deletes feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub id: i64,
    pub telegram_user_id: i64,
    #[serde(default)]
    pub telegram_username: String,
    pub customer_name: String,
    pub message: String,
    #[serde(default)]
    pub admin_reply: Option<String>,
    #[serde(default)]
    pub is_replied: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replied_at: Option<DateTime<Utc>>,
}

/// Local transient state for an unsent reply. At most one composer is open
/// across the whole console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    pub message_id: i64,
    pub draft: String,
}

impl Composer {
    pub fn open(message_id: i64) -> Self {
        Self {
            message_id,
            draft: String::new(),
        }
    }
}

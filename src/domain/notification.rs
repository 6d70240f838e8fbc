use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{NotificationId, UserId};

/// Severity/intent of a notification.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Alert,
    Success,
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Alert => write!(f, "alert"),
            NotificationKind::Success => write!(f, "success"),
        }
    }
}

/// One per-user message in the append-only notification log. Only the
/// `read` flag ever changes after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

/// Insert payload for a notification; `read` starts out false.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: UserId,
    pub message: String,
    pub kind: NotificationKind,
}

impl NewNotification {
    pub fn new(user_id: UserId, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            user_id,
            message: message.into(),
            kind,
        }
    }
}

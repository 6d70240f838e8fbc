use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{ClientId, EffortId, TypeConstraintError, UserId};

/// Channel through which a collection attempt was made.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EffortChannel {
    Sms,
    Email,
    Call,
}

impl Display for EffortChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffortChannel::Sms => write!(f, "sms"),
            EffortChannel::Email => write!(f, "email"),
            EffortChannel::Call => write!(f, "call"),
        }
    }
}

impl FromStr for EffortChannel {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sms" => Ok(EffortChannel::Sms),
            "email" => Ok(EffortChannel::Email),
            "call" => Ok(EffortChannel::Call),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// One logged collection attempt (SMS, email, or call) against a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CollectionEffort {
    pub id: EffortId,
    pub client_id: ClientId,
    pub channel: EffortChannel,
    pub summary: String,
    /// Channel-specific payload (message body, call duration, ...).
    pub details: Value,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
}

/// Insert payload for a collection effort.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCollectionEffort {
    pub client_id: ClientId,
    pub channel: EffortChannel,
    pub summary: String,
    pub details: Value,
    pub created_by: UserId,
}

impl NewCollectionEffort {
    pub fn new(
        client_id: ClientId,
        channel: EffortChannel,
        summary: impl Into<String>,
        created_by: UserId,
    ) -> Self {
        Self {
            client_id,
            channel,
            summary: summary.into().trim().to_string(),
            details: Value::Null,
            created_by,
        }
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

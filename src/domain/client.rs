use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, TypeConstraintError, UserId};

/// Account lifecycle state shown to operators.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ClientStatus {
    #[default]
    Active,
    #[serde(rename = "Past Due")]
    PastDue,
    #[serde(rename = "Paid in Full")]
    PaidInFull,
    Inactive,
}

impl Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientStatus::Active => write!(f, "Active"),
            ClientStatus::PastDue => write!(f, "Past Due"),
            ClientStatus::PaidInFull => write!(f, "Paid in Full"),
            ClientStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

impl FromStr for ClientStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ClientStatus::Active),
            "Past Due" => Ok(ClientStatus::PastDue),
            "Paid in Full" => Ok(ClientStatus::PaidInFull),
            "Inactive" => Ok(ClientStatus::Inactive),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Operational flag derived from the balance arithmetic.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Completed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Partial => write!(f, "Partial"),
            PaymentStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// One customer/account record. The in-memory registry owns the working
/// copy; the remote store holds the durable one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub law_firm: Option<String>,
    pub total_balance: Decimal,
    pub paid_amount: Decimal,
    pub next_due_date: Option<NaiveDate>,
    pub payment_plan: Option<String>,
    pub status: ClientStatus,
    pub payment_status: PaymentStatus,
    pub third_party_payor: Option<String>,
    pub retainer_signed: bool,
    pub created_by: UserId,
    pub modified_by: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert payload submitted to the store. Carries no identifier or
/// timestamps; the store assigns those.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub law_firm: Option<String>,
    pub total_balance: Decimal,
    pub paid_amount: Decimal,
    pub next_due_date: Option<NaiveDate>,
    pub payment_plan: Option<String>,
    pub status: ClientStatus,
    pub third_party_payor: Option<String>,
    pub retainer_signed: bool,
    pub created_by: UserId,
}

impl NewClient {
    /// Minimal payload with everything but the name defaulted.
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: None,
            phone: None,
            law_firm: None,
            total_balance: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            next_due_date: None,
            payment_plan: None,
            status: ClientStatus::Active,
            third_party_payor: None,
            retainer_signed: false,
            created_by,
        }
    }
}

/// Allow-listed update payload. Client-side bookkeeping fields (`id`,
/// `created_by`, `created_at`, `payment_status`) are never forwarded;
/// `payment_status` only changes through the payment path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub law_firm: Option<String>,
    pub total_balance: Decimal,
    pub paid_amount: Decimal,
    pub next_due_date: Option<NaiveDate>,
    pub payment_plan: Option<String>,
    pub status: ClientStatus,
    pub third_party_payor: Option<String>,
    pub retainer_signed: bool,
    pub modified_by: UserId,
}

/// Second half of the two-step payment write: the recomputed balance and
/// status flags patched onto the owning client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalancePatch {
    pub paid_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub status: ClientStatus,
    pub modified_by: UserId,
}

impl Client {
    /// Builds the optimistic candidate row shown before the store round-trip
    /// completes. `payment_status` always starts out `Pending`.
    pub fn candidate(id: ClientId, new_client: &NewClient, now: NaiveDateTime) -> Self {
        Self {
            id,
            name: new_client.name.clone(),
            email: new_client.email.clone(),
            phone: new_client.phone.clone(),
            law_firm: new_client.law_firm.clone(),
            total_balance: new_client.total_balance,
            paid_amount: new_client.paid_amount,
            next_due_date: new_client.next_due_date,
            payment_plan: new_client.payment_plan.clone(),
            status: new_client.status.clone(),
            payment_status: PaymentStatus::Pending,
            third_party_payor: new_client.third_party_payor.clone(),
            retainer_signed: new_client.retainer_signed,
            created_by: new_client.created_by.clone(),
            modified_by: new_client.created_by.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the entry as it will look once the update is accepted, for
    /// the optimistic in-place splice.
    pub fn merged_with(&self, updates: &UpdateClient, now: NaiveDateTime) -> Self {
        Self {
            id: self.id.clone(),
            name: updates.name.clone(),
            email: updates.email.clone(),
            phone: updates.phone.clone(),
            law_firm: updates.law_firm.clone(),
            total_balance: updates.total_balance,
            paid_amount: updates.paid_amount,
            next_due_date: updates.next_due_date,
            payment_plan: updates.payment_plan.clone(),
            status: updates.status.clone(),
            payment_status: self.payment_status.clone(),
            third_party_payor: updates.third_party_payor.clone(),
            retainer_signed: updates.retainer_signed,
            created_by: self.created_by.clone(),
            modified_by: updates.modified_by.clone(),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Returns the entry with the balance patch applied.
    pub fn with_balance(&self, patch: &BalancePatch, now: NaiveDateTime) -> Self {
        Self {
            paid_amount: patch.paid_amount,
            payment_status: patch.payment_status.clone(),
            status: patch.status.clone(),
            modified_by: patch.modified_by.clone(),
            updated_at: now,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn actor() -> UserId {
        UserId::new("ops@firm.test").unwrap()
    }

    #[test]
    fn status_round_trips_through_display() {
        for status in [
            ClientStatus::Active,
            ClientStatus::PastDue,
            ClientStatus::PaidInFull,
            ClientStatus::Inactive,
        ] {
            assert_eq!(status.to_string().parse::<ClientStatus>().unwrap(), status);
        }
        assert!("Unknown".parse::<ClientStatus>().is_err());
    }

    #[test]
    fn candidate_defaults_payment_status_to_pending() {
        let mut new_client = NewClient::new("Acme LLP", actor());
        new_client.paid_amount = Decimal::from(100);
        new_client.total_balance = Decimal::from(100);
        let row = Client::candidate(ClientId::temporary(), &new_client, Utc::now().naive_utc());
        assert_eq!(row.payment_status, PaymentStatus::Pending);
        assert_eq!(row.created_by, actor());
        assert_eq!(row.modified_by, actor());
    }

    #[test]
    fn merged_entry_keeps_bookkeeping_fields() {
        let new_client = NewClient::new("Acme LLP", actor());
        let created = Utc::now().naive_utc();
        let row = Client::candidate(ClientId::new("cl-1").unwrap(), &new_client, created);
        let editor = UserId::new("admin@firm.test").unwrap();
        let updates = UpdateClient {
            name: "Acme, LLP".into(),
            email: Some("billing@acme.test".into()),
            phone: None,
            law_firm: Some("Acme".into()),
            total_balance: Decimal::from(5000),
            paid_amount: Decimal::from(250),
            next_due_date: None,
            payment_plan: None,
            status: ClientStatus::PastDue,
            third_party_payor: None,
            retainer_signed: true,
            modified_by: editor.clone(),
        };
        let merged = row.merged_with(&updates, Utc::now().naive_utc());
        assert_eq!(merged.id, row.id);
        assert_eq!(merged.created_at, created);
        assert_eq!(merged.created_by, actor());
        assert_eq!(merged.modified_by, editor);
        assert_eq!(merged.payment_status, row.payment_status);
        assert_eq!(merged.name, "Acme, LLP");
    }
}

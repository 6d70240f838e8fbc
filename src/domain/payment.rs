use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::client::{BalancePatch, Client, ClientStatus, PaymentStatus};
use crate::domain::types::{ClientId, PaymentId, UserId};

/// How a payment was received.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Ach,
    Check,
    Cash,
    Other,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Ach => write!(f, "ach"),
            PaymentMethod::Check => write!(f, "check"),
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Other => write!(f, "other"),
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(s: &str) -> Self {
        match s {
            "card" => PaymentMethod::Card,
            "ach" => PaymentMethod::Ach,
            "check" => PaymentMethod::Check,
            "cash" => PaymentMethod::Cash,
            _ => PaymentMethod::Other,
        }
    }
}

/// One recorded money receipt. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub client_id: ClientId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insert payload for a payment row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewPayment {
    pub client_id: ClientId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
}

impl Payment {
    /// Optimistic candidate row shown before the store assigns an id.
    pub fn candidate(id: PaymentId, new_payment: &NewPayment, now: NaiveDateTime) -> Self {
        Self {
            id,
            client_id: new_payment.client_id.clone(),
            amount: new_payment.amount,
            payment_date: new_payment.payment_date,
            payment_method: new_payment.payment_method.clone(),
            description: new_payment.description.clone(),
            created_at: now,
        }
    }
}

/// Result of applying a payment amount to a client's balance: the new paid
/// total and the derived status flags.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentOutcome {
    pub paid_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub status: ClientStatus,
}

impl PaymentOutcome {
    /// Balance arithmetic for a new payment. The payment completes the
    /// account when the new paid total reaches `total_balance`; otherwise
    /// the client's lifecycle status is left unchanged.
    pub fn apply(client: &Client, amount: Decimal) -> Self {
        let paid_amount = client.paid_amount + amount;
        if paid_amount >= client.total_balance {
            Self {
                paid_amount,
                payment_status: PaymentStatus::Completed,
                status: ClientStatus::PaidInFull,
            }
        } else {
            Self {
                paid_amount,
                payment_status: PaymentStatus::Partial,
                status: client.status.clone(),
            }
        }
    }

    /// The store patch carrying this outcome.
    pub fn into_patch(self, modified_by: UserId) -> BalancePatch {
        BalancePatch {
            paid_amount: self.paid_amount,
            payment_status: self.payment_status,
            status: self.status,
            modified_by,
        }
    }
}

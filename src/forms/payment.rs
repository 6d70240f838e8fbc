use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::client::Client;
use crate::domain::payment::{NewPayment, PaymentMethod};

/// Rejections specific to the payment form.
#[derive(Debug, Error, PartialEq)]
pub enum PaymentFormError {
    #[error("amount is not a valid number")]
    InvalidAmount,

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("amount exceeds the outstanding balance of {outstanding}")]
    ExceedsBalance { outstanding: Decimal },
}

#[derive(Deserialize, Validate)]
/// Form data for recording a payment against a client.
pub struct AddPaymentForm {
    /// Payment amount as free text.
    pub amount: String,
    /// Receipt date; defaults to today when omitted.
    pub payment_date: Option<NaiveDate>,
    /// Method label: "card", "ach", "check", "cash", anything else maps to
    /// other.
    pub payment_method: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl AddPaymentForm {
    /// Validates the payment against the owning client and produces the
    /// insert payload. This is the upstream gate for the
    /// `paid_amount <= total_balance` invariant: the registry itself does
    /// not re-check amounts.
    pub fn validate_for(&self, client: &Client) -> Result<NewPayment, PaymentFormError> {
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|_| PaymentFormError::InvalidAmount)?;
        if amount <= Decimal::ZERO {
            return Err(PaymentFormError::NonPositiveAmount);
        }
        let outstanding = client.total_balance - client.paid_amount;
        if amount > outstanding {
            return Err(PaymentFormError::ExceedsBalance { outstanding });
        }

        Ok(NewPayment {
            client_id: client.id.clone(),
            amount,
            payment_date: self
                .payment_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            payment_method: PaymentMethod::from(self.payment_method.as_str()),
            description: self
                .description
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

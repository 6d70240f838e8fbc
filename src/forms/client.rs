use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{ClientStatus, NewClient, UpdateClient};
use crate::domain::effort::EffortChannel;
use crate::domain::note::NewClientNote;
use crate::domain::types::{ClientId, EmailAddress, PhoneNumber, TypeConstraintError, UserId};

/// Money fields arrive as free text; absent or unparseable input is coerced
/// to zero and negatives are clamped to keep the amounts non-negative.
fn coerce_amount(value: Option<&str>) -> Decimal {
    value
        .and_then(|s| Decimal::from_str(s.trim()).ok())
        .unwrap_or_default()
        .max(Decimal::ZERO)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Deserialize, Validate)]
/// Form data for creating a client.
pub struct AddClientForm {
    /// Display name; the only required field.
    #[validate(length(min = 1))]
    pub name: String,
    /// Contact email, when present must be a valid address.
    #[validate(email)]
    pub email: Option<String>,
    /// Contact phone, when present must match the loose phone pattern.
    pub phone: Option<String>,
    pub law_firm: Option<String>,
    pub total_balance: Option<String>,
    pub paid_amount: Option<String>,
    pub next_due_date: Option<NaiveDate>,
    pub payment_plan: Option<String>,
    pub third_party_payor: Option<String>,
    #[serde(default)]
    pub retainer_signed: bool,
}

impl AddClientForm {
    /// Converts the validated form into an insert payload, normalizing the
    /// contact fields through their value objects.
    pub fn into_new_client(self, created_by: UserId) -> Result<NewClient, TypeConstraintError> {
        let email = non_blank(self.email)
            .map(EmailAddress::new)
            .transpose()?
            .map(EmailAddress::into_inner);
        let phone = non_blank(self.phone)
            .map(PhoneNumber::new)
            .transpose()?
            .map(PhoneNumber::into_inner);

        let mut new_client = NewClient::new(self.name, created_by);
        new_client.email = email;
        new_client.phone = phone;
        new_client.law_firm = non_blank(self.law_firm);
        new_client.total_balance = coerce_amount(self.total_balance.as_deref());
        new_client.paid_amount = coerce_amount(self.paid_amount.as_deref());
        new_client.next_due_date = self.next_due_date;
        new_client.payment_plan = non_blank(self.payment_plan);
        new_client.third_party_payor = non_blank(self.third_party_payor);
        new_client.retainer_signed = self.retainer_signed;
        Ok(new_client)
    }
}

#[derive(Deserialize, Validate)]
/// Form data for editing an existing client.
///
/// Correction-edit policy: direct edits may set `paid_amount` above
/// `total_balance`. The `paid <= total` invariant is enforced only on the
/// new-payment path (`AddPaymentForm`); edits are treated as corrections
/// that may legitimately overshoot.
pub struct SaveClientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub law_firm: Option<String>,
    pub total_balance: Option<String>,
    pub paid_amount: Option<String>,
    pub next_due_date: Option<NaiveDate>,
    pub payment_plan: Option<String>,
    /// Lifecycle status label, e.g. "Past Due".
    pub status: String,
    pub third_party_payor: Option<String>,
    #[serde(default)]
    pub retainer_signed: bool,
}

impl SaveClientForm {
    /// Converts the validated form into the allow-listed update payload.
    pub fn into_update(self, modified_by: UserId) -> Result<UpdateClient, TypeConstraintError> {
        let email = non_blank(self.email)
            .map(EmailAddress::new)
            .transpose()?
            .map(EmailAddress::into_inner);
        let phone = non_blank(self.phone)
            .map(PhoneNumber::new)
            .transpose()?
            .map(PhoneNumber::into_inner);

        Ok(UpdateClient {
            name: self.name.trim().to_string(),
            email,
            phone,
            law_firm: non_blank(self.law_firm),
            total_balance: coerce_amount(self.total_balance.as_deref()),
            paid_amount: coerce_amount(self.paid_amount.as_deref()),
            next_due_date: self.next_due_date,
            payment_plan: non_blank(self.payment_plan),
            status: ClientStatus::from_str(&self.status)?,
            third_party_payor: non_blank(self.third_party_payor),
            retainer_signed: self.retainer_signed,
            modified_by,
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for attaching a note to a client.
pub struct AddNoteForm {
    #[validate(length(min = 1))]
    pub text: String,
}

impl AddNoteForm {
    /// Converts the validated form into an insert payload for `client_id`.
    pub fn into_new_note(self, client_id: ClientId, created_by: UserId) -> NewClientNote {
        NewClientNote::new(client_id, self.text, created_by)
    }
}

#[derive(Deserialize, Validate)]
/// Form data for logging a collection attempt.
pub struct LogEffortForm {
    /// Channel label: "sms", "email", or "call".
    pub channel: String,
    #[validate(length(min = 1))]
    pub summary: String,
}

impl LogEffortForm {
    pub fn channel(&self) -> Result<EffortChannel, TypeConstraintError> {
        EffortChannel::from_str(&self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> UserId {
        UserId::new("ops@firm.test").unwrap()
    }

    fn base_form() -> AddClientForm {
        AddClientForm {
            name: "Acme LLP".into(),
            email: None,
            phone: None,
            law_firm: None,
            total_balance: None,
            paid_amount: None,
            next_due_date: None,
            payment_plan: None,
            third_party_payor: None,
            retainer_signed: false,
        }
    }

    #[test]
    fn absent_amounts_coerce_to_zero() {
        let new_client = base_form().into_new_client(actor()).unwrap();
        assert_eq!(new_client.total_balance, Decimal::ZERO);
        assert_eq!(new_client.paid_amount, Decimal::ZERO);
    }

    #[test]
    fn unparseable_and_negative_amounts_coerce_to_zero() {
        let mut form = base_form();
        form.total_balance = Some("lots".into());
        form.paid_amount = Some("-50".into());
        let new_client = form.into_new_client(actor()).unwrap();
        assert_eq!(new_client.total_balance, Decimal::ZERO);
        assert_eq!(new_client.paid_amount, Decimal::ZERO);
    }

    #[test]
    fn contact_fields_are_normalized() {
        let mut form = base_form();
        form.email = Some(" Billing@Acme.TEST ".into());
        form.phone = Some("+1 (555) 123-4567".into());
        let new_client = form.into_new_client(actor()).unwrap();
        assert_eq!(new_client.email.as_deref(), Some("billing@acme.test"));
        assert_eq!(new_client.phone.as_deref(), Some("+1 (555) 123-4567"));
    }

    #[test]
    fn bad_phone_is_rejected() {
        let mut form = base_form();
        form.phone = Some("call me".into());
        assert!(form.into_new_client(actor()).is_err());
    }

    #[test]
    fn correction_edit_may_overshoot_balance() {
        let form = SaveClientForm {
            name: "Acme LLP".into(),
            email: None,
            phone: None,
            law_firm: None,
            total_balance: Some("100".into()),
            paid_amount: Some("250".into()),
            next_due_date: None,
            payment_plan: None,
            status: "Active".into(),
            third_party_payor: None,
            retainer_signed: false,
        };
        let updates = form.into_update(actor()).unwrap();
        assert!(updates.paid_amount > updates.total_balance);
    }

    #[test]
    fn unknown_status_label_is_rejected() {
        let form = SaveClientForm {
            name: "Acme LLP".into(),
            email: None,
            phone: None,
            law_firm: None,
            total_balance: None,
            paid_amount: None,
            next_due_date: None,
            payment_plan: None,
            status: "Archived".into(),
            third_party_payor: None,
            retainer_signed: false,
        };
        assert!(form.into_update(actor()).is_err());
    }

    #[test]
    fn note_form_builds_a_trimmed_payload() {
        let form = AddNoteForm {
            text: "  left a voicemail  ".into(),
        };
        let client_id = ClientId::new("cl-1").unwrap();
        let new_note = form.into_new_note(client_id.clone(), actor());
        assert_eq!(new_note.client_id, client_id);
        assert_eq!(new_note.note, "left a voicemail");
        assert_eq!(new_note.created_by, actor());
    }

    #[test]
    fn blank_note_fails_validation() {
        let form = AddNoteForm {
            text: String::new(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn validator_flags_missing_name() {
        let mut form = base_form();
        form.name = String::new();
        assert!(form.validate().is_err());
    }
}

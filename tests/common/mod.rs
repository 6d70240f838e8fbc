#![allow(dead_code)] // each test binary uses a different subset of helpers

use chrono::Utc;
use rust_decimal::Decimal;

use retainer_crm::domain::client::{Client, NewClient, UpdateClient};
use retainer_crm::domain::payment::{NewPayment, PaymentMethod};
use retainer_crm::domain::types::{ClientId, UserId};
use retainer_crm::registry::{ClientRegistry, Session};
use retainer_crm::store::memory::InMemoryStore;

pub fn actor() -> UserId {
    UserId::new("ops@firm.test").unwrap()
}

pub fn registry() -> ClientRegistry<InMemoryStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    ClientRegistry::new(InMemoryStore::new(), Session::new(actor()))
}

pub fn new_client(name: &str, total: i64, paid: i64) -> NewClient {
    let mut new_client = NewClient::new(name, actor());
    new_client.total_balance = Decimal::from(total);
    new_client.paid_amount = Decimal::from(paid);
    new_client
}

pub fn seed_client(
    registry: &mut ClientRegistry<InMemoryStore>,
    name: &str,
    total: i64,
    paid: i64,
) -> ClientId {
    registry
        .add_client(new_client(name, total, paid))
        .expect("seed client")
}

/// Identity update payload for `client`, ready for field tweaks.
pub fn update_from(client: &Client) -> UpdateClient {
    UpdateClient {
        name: client.name.clone(),
        email: client.email.clone(),
        phone: client.phone.clone(),
        law_firm: client.law_firm.clone(),
        total_balance: client.total_balance,
        paid_amount: client.paid_amount,
        next_due_date: client.next_due_date,
        payment_plan: client.payment_plan.clone(),
        status: client.status.clone(),
        third_party_payor: client.third_party_payor.clone(),
        retainer_signed: client.retainer_signed,
        modified_by: actor(),
    }
}

pub fn payment(client_id: &ClientId, amount: i64) -> NewPayment {
    NewPayment {
        client_id: client_id.clone(),
        amount: Decimal::from(amount),
        payment_date: Utc::now().date_naive(),
        payment_method: PaymentMethod::Card,
        description: None,
    }
}

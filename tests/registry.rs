use rust_decimal::Decimal;

use retainer_crm::domain::client::{ClientStatus, PaymentStatus};
use retainer_crm::domain::effort::EffortChannel;
use retainer_crm::domain::types::ClientId;
use retainer_crm::registry::RegistryError;
use retainer_crm::store::memory::StoreOp;
use retainer_crm::store::{PaymentListQuery, PaymentStore};
use retainer_crm::services::notify;

mod common;

#[test]
fn failed_insert_rolls_back_completely() {
    let mut registry = common::registry();
    common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    let before = registry.clients().to_vec();

    registry.store().fail_next(StoreOp::InsertClient);
    let result = registry.add_client(common::new_client("Globex", 500, 0));

    assert!(result.is_err());
    assert_eq!(registry.clients(), before.as_slice());
    assert!(registry.error().is_some());
}

#[test]
fn successful_insert_reconciles_temporary_id() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);

    assert!(!id.is_temporary());
    assert_eq!(
        registry.clients().iter().filter(|c| c.id == id).count(),
        1
    );
    assert!(registry.clients().iter().all(|c| !c.id.is_temporary()));
    assert!(registry.error().is_none());
}

#[test]
fn new_clients_are_prepended() {
    let mut registry = common::registry();
    common::seed_client(&mut registry, "Acme LLP", 1000, 0);
    common::seed_client(&mut registry, "Globex", 500, 0);

    assert_eq!(registry.clients()[0].name, "Globex");
    assert_eq!(registry.clients()[1].name, "Acme LLP");
}

#[test]
fn update_keeps_collection_and_selected_slot_in_agreement() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    registry.select_client(&id).unwrap();

    let mut updates = common::update_from(registry.selected_client().unwrap());
    updates.name = "Acme, LLP".into();
    updates.status = ClientStatus::PastDue;
    registry.update_client(&id, updates).unwrap();

    let in_collection = registry.clients().iter().find(|c| c.id == id).unwrap();
    assert_eq!(in_collection.name, "Acme, LLP");
    assert_eq!(registry.selected_client(), Some(in_collection));
}

#[test]
fn failed_update_restores_both_views() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    registry.select_client(&id).unwrap();
    let snapshot = registry.clients().to_vec();
    let selected_snapshot = registry.selected_client().cloned();

    registry.store().fail_next(StoreOp::UpdateClient);
    let mut updates = common::update_from(&snapshot[0]);
    updates.name = "Changed".into();
    assert!(registry.update_client(&id, updates).is_err());

    assert_eq!(registry.clients(), snapshot.as_slice());
    assert_eq!(registry.selected_client(), selected_snapshot.as_ref());
    assert!(registry.error().is_some());
}

#[test]
fn unknown_client_fails_before_any_store_call() {
    let mut registry = common::registry();
    common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    let ghost = ClientId::new("cl-999999").unwrap();

    let updates = common::update_from(&registry.clients()[0]);
    assert!(matches!(
        registry.update_client(&ghost, updates),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        registry.delete_client(&ghost),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        registry.add_payment(&ghost, common::payment(&ghost, 10)),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        registry.select_client(&ghost),
        Err(RegistryError::NotFound(_))
    ));
    assert_eq!(registry.clients().len(), 1);
}

#[test]
fn partial_payment_updates_balance_and_keeps_status() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    registry.select_client(&id).unwrap();

    let payment = registry.add_payment(&id, common::payment(&id, 300)).unwrap();
    assert!(!payment.id.is_temporary());

    let client = registry.clients().iter().find(|c| c.id == id).unwrap();
    assert_eq!(client.paid_amount, Decimal::from(500));
    assert_eq!(client.payment_status, PaymentStatus::Partial);
    assert_eq!(client.status, ClientStatus::Active);
    assert_eq!(registry.client_payment_history().len(), 1);
    assert!(registry.client_payment_history().iter().all(|p| !p.id.is_temporary()));
}

#[test]
fn exact_payoff_completes_the_account() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    registry.select_client(&id).unwrap();

    registry.add_payment(&id, common::payment(&id, 800)).unwrap();

    let client = registry.clients().iter().find(|c| c.id == id).unwrap();
    assert_eq!(client.paid_amount, Decimal::from(1000));
    assert_eq!(client.payment_status, PaymentStatus::Completed);
    assert_eq!(client.status, ClientStatus::PaidInFull);
    assert_eq!(registry.selected_client(), Some(client));
}

#[test]
fn failed_payment_insert_rolls_back_everything() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    registry.select_client(&id).unwrap();
    let clients_before = registry.clients().to_vec();
    let history_before = registry.client_payment_history().to_vec();

    registry.store().fail_next(StoreOp::InsertPayment);
    let result = registry.add_payment(&id, common::payment(&id, 300));

    assert!(matches!(result, Err(RegistryError::Store(_))));
    assert_eq!(registry.clients(), clients_before.as_slice());
    assert_eq!(registry.client_payment_history(), history_before.as_slice());
    let durable = registry
        .store()
        .list_payments(PaymentListQuery::new(id))
        .unwrap();
    assert!(durable.is_empty());
}

#[test]
fn failed_balance_update_is_flagged_as_partial_write() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    registry.select_client(&id).unwrap();
    let client_before = registry.clients()[0].clone();

    registry.store().fail_next(StoreOp::ApplyBalance);
    let result = registry.add_payment(&id, common::payment(&id, 800));

    assert!(matches!(result, Err(RegistryError::PartialWrite(_))));

    // Local state reverted entirely.
    let client = registry.clients().iter().find(|c| c.id == id).unwrap();
    assert_eq!(client, &client_before);
    assert_eq!(client.paid_amount, Decimal::from(200));
    assert_eq!(client.status, ClientStatus::Active);
    assert!(
        registry
            .client_payment_history()
            .iter()
            .all(|p| p.amount != Decimal::from(800))
    );

    // The store keeps the orphaned payment row.
    let durable = registry
        .store()
        .list_payments(PaymentListQuery::new(id))
        .unwrap();
    assert_eq!(durable.len(), 1);
    assert_eq!(durable[0].amount, Decimal::from(800));
    assert!(registry.error().is_some());
}

#[test]
fn failed_delete_restores_content_and_selection() {
    let mut registry = common::registry();
    let first = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    common::seed_client(&mut registry, "Globex", 500, 0);
    registry.select_client(&first).unwrap();
    let snapshot = registry.clients().iter().find(|c| c.id == first).cloned().unwrap();

    registry.store().fail_next(StoreOp::DeleteClient);
    assert!(registry.delete_client(&first).is_err());

    // Content survives even though the position may not.
    let restored = registry.clients().iter().find(|c| c.id == first).unwrap();
    assert_eq!(restored, &snapshot);
    assert_eq!(registry.selected_client().map(|c| &c.id), Some(&first));
}

#[test]
fn successful_delete_clears_the_selection() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    registry.select_client(&id).unwrap();

    registry.delete_client(&id).unwrap();

    assert!(registry.clients().is_empty());
    assert!(registry.selected_client().is_none());
}

#[test]
fn selection_scopes_notes_and_history_to_one_client() {
    let mut registry = common::registry();
    let first = common::seed_client(&mut registry, "Acme LLP", 1000, 0);
    let second = common::seed_client(&mut registry, "Globex", 500, 0);

    registry.select_client(&first).unwrap();
    registry.add_client_note(&first, "left a voicemail").unwrap();
    registry.select_client(&second).unwrap();
    registry.add_client_note(&second, "sent an invoice").unwrap();

    registry.select_client(&first).unwrap();
    assert_eq!(registry.client_notes().len(), 1);
    assert_eq!(registry.client_notes()[0].note, "left a voicemail");
    assert!(registry.client_payment_history().is_empty());

    registry.select_client(&second).unwrap();
    assert_eq!(registry.client_notes().len(), 1);
    assert_eq!(registry.client_notes()[0].note, "sent an invoice");
}

#[test]
fn failed_note_insert_rolls_back() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 0);
    registry.select_client(&id).unwrap();

    registry.store().fail_next(StoreOp::InsertNote);
    assert!(registry.add_client_note(&id, "will not stick").is_err());
    assert!(registry.client_notes().is_empty());
}

#[test]
fn next_success_clears_the_error_flag() {
    let mut registry = common::registry();
    registry.store().fail_next(StoreOp::InsertClient);
    assert!(registry.add_client(common::new_client("Acme LLP", 0, 0)).is_err());
    assert!(registry.error().is_some());

    common::seed_client(&mut registry, "Acme LLP", 0, 0);
    assert!(registry.error().is_none());
}

#[test]
fn successful_payment_notifies_the_actor() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    let before = notify::unread_count(registry.store(), &common::actor()).unwrap();

    registry.add_payment(&id, common::payment(&id, 300)).unwrap();

    let after = notify::unread_count(registry.store(), &common::actor()).unwrap();
    assert!(after > before);
}

#[test]
fn committed_updates_notes_and_deletes_notify_the_actor() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);
    let before = notify::unread_count(registry.store(), &common::actor()).unwrap();

    let mut updates = common::update_from(&registry.clients()[0]);
    updates.name = "Acme, LLP".into();
    registry.update_client(&id, updates).unwrap();
    registry.add_client_note(&id, "left a voicemail").unwrap();
    registry.delete_client(&id).unwrap();

    let after = notify::unread_count(registry.store(), &common::actor()).unwrap();
    assert_eq!(after, before + 3);
}

#[test]
fn collection_efforts_are_logged_and_listed() {
    let mut registry = common::registry();
    let id = common::seed_client(&mut registry, "Acme LLP", 1000, 200);

    let effort = registry
        .log_collection_effort(&id, EffortChannel::Call, "left a voicemail")
        .unwrap();
    assert_eq!(effort.channel, EffortChannel::Call);
    assert_eq!(registry.collection_efforts().len(), 1);

    registry.store().fail_next(StoreOp::InsertEffort);
    assert!(
        registry
            .log_collection_effort(&id, EffortChannel::Sms, "payment reminder")
            .is_err()
    );
    assert_eq!(registry.collection_efforts().len(), 1);

    registry.fetch_collection_efforts(&id).unwrap();
    assert_eq!(registry.collection_efforts().len(), 1);
}

#[test]
fn failed_refresh_keeps_the_previous_collection() {
    let mut registry = common::registry();
    common::seed_client(&mut registry, "Acme LLP", 1000, 0);
    common::seed_client(&mut registry, "Globex", 500, 0);
    registry.fetch_clients().unwrap();
    assert_eq!(registry.clients().len(), 2);

    registry.store().fail_next(StoreOp::ListClients);
    assert!(registry.fetch_clients().is_err());

    assert_eq!(registry.clients().len(), 2);
    assert!(!registry.is_loading());
    assert!(registry.error().is_some());
}

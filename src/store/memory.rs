//! In-memory simulated backend.
//!
//! Stands in for the hosted table service during tests and local demos:
//! server-assigns identifiers, stamps creation times, and honors the same
//! ordering and filter semantics the real backend exposes. Tests can arm
//! one-shot failures per operation to exercise rollback paths.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::client::{BalancePatch, Client, NewClient, UpdateClient};
use crate::domain::effort::{CollectionEffort, NewCollectionEffort};
use crate::domain::note::{ClientNote, NewClientNote};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::types::{
    ClientId, EffortId, NoteId, NotificationId, PaymentId, TypeConstraintError, UserId,
};
use crate::store::errors::{StoreError, StoreResult};
use crate::store::{
    ClientListQuery, ClientStore, EffortListQuery, EffortStore, NoteListQuery, NoteStore,
    NotificationListQuery, NotificationStore, Pagination, PaymentListQuery, PaymentStore,
};

/// Store operations that can be armed to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetClient,
    ListClients,
    InsertClient,
    UpdateClient,
    ApplyBalance,
    DeleteClient,
    ListNotes,
    InsertNote,
    ListPayments,
    InsertPayment,
    ListNotifications,
    UnreadCount,
    InsertNotification,
    MarkRead,
    MarkAllRead,
    ListEfforts,
    InsertEffort,
}

#[derive(Default)]
struct Tables {
    clients: Vec<Client>,
    notes: Vec<ClientNote>,
    payments: Vec<Payment>,
    notifications: Vec<Notification>,
    efforts: Vec<CollectionEffort>,
    next_id: u64,
}

impl Tables {
    fn assign_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:06}", self.next_id)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    failures: Mutex<HashSet<StoreOp>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot failure: the next call of `op` returns a rejection.
    pub fn fail_next(&self, op: StoreOp) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(op);
        }
    }

    fn gate(&self, op: StoreOp) -> StoreResult<()> {
        let mut failures = self
            .failures
            .lock()
            .map_err(|_| StoreError::Connection("failure table poisoned".into()))?;
        if failures.remove(&op) {
            return Err(StoreError::Rejected(format!("injected failure for {op:?}")));
        }
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Connection("store mutex poisoned".into()))
    }

    fn wrap_id<T>(id: Result<T, TypeConstraintError>) -> StoreResult<T> {
        id.map_err(|e| StoreError::Unexpected(e.to_string()))
    }
}

fn paged<T: Clone>(rows: Vec<T>, pagination: &Option<Pagination>) -> Vec<T> {
    match pagination {
        Some(p) => {
            let page = p.page.max(1);
            rows.into_iter()
                .skip((page - 1) * p.per_page)
                .take(p.per_page)
                .collect()
        }
        None => rows,
    }
}

fn matches_search(client: &Client, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let hay = |value: &Option<String>| {
        value
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains(&needle))
    };
    client.name.to_lowercase().contains(&needle)
        || hay(&client.email)
        || hay(&client.phone)
        || hay(&client.law_firm)
}

impl ClientStore for InMemoryStore {
    fn get_client_by_id(&self, id: &ClientId) -> StoreResult<Option<Client>> {
        self.gate(StoreOp::GetClient)?;
        let tables = self.lock()?;
        Ok(tables.clients.iter().find(|c| &c.id == id).cloned())
    }

    fn list_clients(&self, query: ClientListQuery) -> StoreResult<(usize, Vec<Client>)> {
        self.gate(StoreOp::ListClients)?;
        let tables = self.lock()?;
        // Rows are appended in creation order, so reverse iteration yields
        // created_at descending.
        let matching: Vec<Client> = tables
            .clients
            .iter()
            .rev()
            .filter(|c| query.status.as_ref().is_none_or(|s| &c.status == s))
            .filter(|c| query.search.as_deref().is_none_or(|s| matches_search(c, s)))
            .cloned()
            .collect();
        let total = matching.len();
        Ok((total, paged(matching, &query.pagination)))
    }

    fn insert_client(&self, new_client: &NewClient) -> StoreResult<Client> {
        self.gate(StoreOp::InsertClient)?;
        let mut tables = self.lock()?;
        let id = Self::wrap_id(ClientId::new(tables.assign_id("cl")))?;
        let row = Client::candidate(id, new_client, Utc::now().naive_utc());
        tables.clients.push(row.clone());
        Ok(row)
    }

    fn update_client(&self, client_id: &ClientId, updates: &UpdateClient) -> StoreResult<Client> {
        self.gate(StoreOp::UpdateClient)?;
        let mut tables = self.lock()?;
        let row = tables
            .clients
            .iter_mut()
            .find(|c| &c.id == client_id)
            .ok_or(StoreError::NotFound)?;
        *row = row.merged_with(updates, Utc::now().naive_utc());
        Ok(row.clone())
    }

    fn apply_client_balance(
        &self,
        client_id: &ClientId,
        patch: &BalancePatch,
    ) -> StoreResult<Client> {
        self.gate(StoreOp::ApplyBalance)?;
        let mut tables = self.lock()?;
        let row = tables
            .clients
            .iter_mut()
            .find(|c| &c.id == client_id)
            .ok_or(StoreError::NotFound)?;
        *row = row.with_balance(patch, Utc::now().naive_utc());
        Ok(row.clone())
    }

    fn delete_client(&self, client_id: &ClientId) -> StoreResult<()> {
        self.gate(StoreOp::DeleteClient)?;
        let mut tables = self.lock()?;
        let before = tables.clients.len();
        tables.clients.retain(|c| &c.id != client_id);
        if tables.clients.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

impl NoteStore for InMemoryStore {
    fn list_client_notes(&self, query: NoteListQuery) -> StoreResult<Vec<ClientNote>> {
        self.gate(StoreOp::ListNotes)?;
        let tables = self.lock()?;
        let matching: Vec<ClientNote> = tables
            .notes
            .iter()
            .rev()
            .filter(|n| n.client_id == query.client_id)
            .cloned()
            .collect();
        Ok(paged(matching, &query.pagination))
    }

    fn insert_client_note(&self, new_note: &NewClientNote) -> StoreResult<ClientNote> {
        self.gate(StoreOp::InsertNote)?;
        let mut tables = self.lock()?;
        if !tables.clients.iter().any(|c| c.id == new_note.client_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "client {} does not exist",
                new_note.client_id
            )));
        }
        let id = Self::wrap_id(NoteId::new(tables.assign_id("nt")))?;
        let row = ClientNote::candidate(id, new_note, Utc::now().naive_utc());
        tables.notes.push(row.clone());
        Ok(row)
    }
}

impl PaymentStore for InMemoryStore {
    fn list_payments(&self, query: PaymentListQuery) -> StoreResult<Vec<Payment>> {
        self.gate(StoreOp::ListPayments)?;
        let tables = self.lock()?;
        let matching: Vec<Payment> = tables
            .payments
            .iter()
            .rev()
            .filter(|p| p.client_id == query.client_id)
            .cloned()
            .collect();
        Ok(paged(matching, &query.pagination))
    }

    fn insert_payment(&self, new_payment: &NewPayment) -> StoreResult<Payment> {
        self.gate(StoreOp::InsertPayment)?;
        let mut tables = self.lock()?;
        if !tables.clients.iter().any(|c| c.id == new_payment.client_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "client {} does not exist",
                new_payment.client_id
            )));
        }
        let id = Self::wrap_id(PaymentId::new(tables.assign_id("pm")))?;
        let row = Payment::candidate(id, new_payment, Utc::now().naive_utc());
        tables.payments.push(row.clone());
        Ok(row)
    }
}

impl NotificationStore for InMemoryStore {
    fn list_notifications(
        &self,
        query: NotificationListQuery,
    ) -> StoreResult<(usize, Vec<Notification>)> {
        self.gate(StoreOp::ListNotifications)?;
        let tables = self.lock()?;
        let matching: Vec<Notification> = tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == query.user_id)
            .filter(|n| !query.unread_only || !n.read)
            .cloned()
            .collect();
        let total = matching.len();
        Ok((total, paged(matching, &query.pagination)))
    }

    fn unread_count(&self, user_id: &UserId) -> StoreResult<usize> {
        self.gate(StoreOp::UnreadCount)?;
        let tables = self.lock()?;
        Ok(tables
            .notifications
            .iter()
            .filter(|n| &n.user_id == user_id && !n.read)
            .count())
    }

    fn insert_notification(&self, new_notification: &NewNotification) -> StoreResult<Notification> {
        self.gate(StoreOp::InsertNotification)?;
        let mut tables = self.lock()?;
        let id = Self::wrap_id(NotificationId::new(tables.assign_id("nf")))?;
        let row = Notification {
            id,
            user_id: new_notification.user_id.clone(),
            message: new_notification.message.clone(),
            kind: new_notification.kind.clone(),
            read: false,
            created_at: Utc::now().naive_utc(),
        };
        tables.notifications.push(row.clone());
        Ok(row)
    }

    fn mark_notification_read(&self, id: &NotificationId) -> StoreResult<()> {
        self.gate(StoreOp::MarkRead)?;
        let mut tables = self.lock()?;
        let row = tables
            .notifications
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or(StoreError::NotFound)?;
        row.read = true;
        Ok(())
    }

    fn mark_all_notifications_read(&self, user_id: &UserId) -> StoreResult<usize> {
        self.gate(StoreOp::MarkAllRead)?;
        let mut tables = self.lock()?;
        let mut flipped = 0;
        for row in tables
            .notifications
            .iter_mut()
            .filter(|n| &n.user_id == user_id && !n.read)
        {
            row.read = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}

impl EffortStore for InMemoryStore {
    fn list_collection_efforts(
        &self,
        query: EffortListQuery,
    ) -> StoreResult<Vec<CollectionEffort>> {
        self.gate(StoreOp::ListEfforts)?;
        let tables = self.lock()?;
        let matching: Vec<CollectionEffort> = tables
            .efforts
            .iter()
            .rev()
            .filter(|e| e.client_id == query.client_id)
            .cloned()
            .collect();
        Ok(paged(matching, &query.pagination))
    }

    fn insert_collection_effort(
        &self,
        new_effort: &NewCollectionEffort,
    ) -> StoreResult<CollectionEffort> {
        self.gate(StoreOp::InsertEffort)?;
        let mut tables = self.lock()?;
        if !tables.clients.iter().any(|c| c.id == new_effort.client_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "client {} does not exist",
                new_effort.client_id
            )));
        }
        let id = Self::wrap_id(EffortId::new(tables.assign_id("ce")))?;
        let row = CollectionEffort {
            id,
            client_id: new_effort.client_id.clone(),
            channel: new_effort.channel.clone(),
            summary: new_effort.summary.clone(),
            details: new_effort.details.clone(),
            created_by: new_effort.created_by.clone(),
            created_at: Utc::now().naive_utc(),
        };
        tables.efforts.push(row.clone());
        Ok(row)
    }
}

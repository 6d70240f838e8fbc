//! Remote store boundary: per-table traits, query builders, and backends.
//!
//! Every call is table-scoped and returns the affected rows so callers can
//! reconcile local state with the canonical server-assigned fields. List
//! results come back ordered by creation time, newest first.

use crate::domain::client::{BalancePatch, Client, ClientStatus, NewClient, UpdateClient};
use crate::domain::effort::{CollectionEffort, NewCollectionEffort};
use crate::domain::note::{ClientNote, NewClientNote};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::types::{ClientId, NotificationId, UserId};
use crate::store::errors::StoreResult;

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Filter/pagination parameters for the client list.
#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn status(mut self, status: ClientStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Stable cache key for the read-through layer.
    pub fn cache_key(&self) -> String {
        let (page, per_page) = match &self.pagination {
            Some(p) => (p.page, p.per_page),
            None => (0, 0),
        };
        format!(
            "clients:p{page}:n{per_page}:s{}:st{}",
            self.search.as_deref().unwrap_or(""),
            self.status
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct NoteListQuery {
    pub client_id: ClientId,
    pub pagination: Option<Pagination>,
}

impl NoteListQuery {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct PaymentListQuery {
    pub client_id: ClientId,
    pub pagination: Option<Pagination>,
}

impl PaymentListQuery {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct EffortListQuery {
    pub client_id: ClientId,
    pub pagination: Option<Pagination>,
}

impl EffortListQuery {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct NotificationListQuery {
    pub user_id: UserId,
    pub unread_only: bool,
    pub pagination: Option<Pagination>,
}

impl NotificationListQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            unread_only: false,
            pagination: None,
        }
    }

    pub fn unread_only(mut self) -> Self {
        self.unread_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientStore {
    fn get_client_by_id(&self, id: &ClientId) -> StoreResult<Option<Client>>;
    /// Returns the total matching count alongside the requested page,
    /// ordered by `created_at` descending.
    fn list_clients(&self, query: ClientListQuery) -> StoreResult<(usize, Vec<Client>)>;
    fn insert_client(&self, new_client: &NewClient) -> StoreResult<Client>;
    fn update_client(&self, client_id: &ClientId, updates: &UpdateClient) -> StoreResult<Client>;
    fn apply_client_balance(
        &self,
        client_id: &ClientId,
        patch: &BalancePatch,
    ) -> StoreResult<Client>;
    fn delete_client(&self, client_id: &ClientId) -> StoreResult<()>;
}

pub trait NoteStore {
    fn list_client_notes(&self, query: NoteListQuery) -> StoreResult<Vec<ClientNote>>;
    fn insert_client_note(&self, new_note: &NewClientNote) -> StoreResult<ClientNote>;
}

pub trait PaymentStore {
    fn list_payments(&self, query: PaymentListQuery) -> StoreResult<Vec<Payment>>;
    fn insert_payment(&self, new_payment: &NewPayment) -> StoreResult<Payment>;
}

pub trait NotificationStore {
    fn list_notifications(
        &self,
        query: NotificationListQuery,
    ) -> StoreResult<(usize, Vec<Notification>)>;
    fn unread_count(&self, user_id: &UserId) -> StoreResult<usize>;
    fn insert_notification(&self, new_notification: &NewNotification) -> StoreResult<Notification>;
    fn mark_notification_read(&self, id: &NotificationId) -> StoreResult<()>;
    fn mark_all_notifications_read(&self, user_id: &UserId) -> StoreResult<usize>;
}

pub trait EffortStore {
    fn list_collection_efforts(&self, query: EffortListQuery)
    -> StoreResult<Vec<CollectionEffort>>;
    fn insert_collection_effort(
        &self,
        new_effort: &NewCollectionEffort,
    ) -> StoreResult<CollectionEffort>;
}

//! In-memory mirror of the client table with optimistic writes.
//!
//! Every mutating operation applies its change to local state first, then
//! submits the corresponding store call. On success the local entry is
//! reconciled with the canonical server-returned row; on failure local state
//! is restored from a snapshot taken before the mutation and the error is
//! re-raised. Each operation therefore terminates in one of three states:
//! committed, rolled back, or (for the two-step payment write only)
//! partial-write flagged.
//!
//! The registry is single-operator by design: concurrent mutations of the
//! same record follow last-writer-wins with no lost-update detection.

use chrono::Utc;
use thiserror::Error;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::effort::{CollectionEffort, EffortChannel, NewCollectionEffort};
use crate::domain::note::{ClientNote, NewClientNote};
use crate::domain::notification::NotificationKind;
use crate::domain::payment::{NewPayment, Payment, PaymentOutcome};
use crate::domain::types::{ClientId, NoteId, PaymentId, UserId};
use crate::services::notify;
use crate::store::errors::StoreError;
use crate::store::{
    ClientListQuery, ClientStore, EffortListQuery, EffortStore, NoteListQuery, NoteStore,
    NotificationStore, PaymentListQuery, PaymentStore,
};

/// Authenticated actor handle, injected rather than read from ambient
/// context so the registry is testable with a fake session.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: UserId,
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Referenced client is not in the loaded collection. Raised before any
    /// store call is attempted.
    #[error("client {0} is not loaded")]
    NotFound(ClientId),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The payment row was durably inserted but the follow-up balance update
    /// failed. Local state has been rolled back; the store is left holding
    /// the orphaned payment row.
    #[error("payment was recorded but the balance update failed: {0}")]
    PartialWrite(StoreError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Owner of the in-memory client collection, the selected-client slot, and
/// its two dependent collections (notes, payment history).
pub struct ClientRegistry<S> {
    store: S,
    session: Session,
    clients: Vec<Client>,
    selected: Option<Client>,
    notes: Vec<ClientNote>,
    payment_history: Vec<Payment>,
    efforts: Vec<CollectionEffort>,
    loading: bool,
    notes_loading: bool,
    history_loading: bool,
    error: Option<String>,
}

impl<S> ClientRegistry<S> {
    pub fn new(store: S, session: Session) -> Self {
        Self {
            store,
            session,
            clients: Vec::new(),
            selected: None,
            notes: Vec::new(),
            payment_history: Vec::new(),
            efforts: Vec::new(),
            loading: false,
            notes_loading: false,
            history_loading: false,
            error: None,
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.selected.as_ref()
    }

    pub fn client_notes(&self) -> &[ClientNote] {
        &self.notes
    }

    pub fn client_payment_history(&self) -> &[Payment] {
        &self.payment_history
    }

    pub fn collection_efforts(&self) -> &[CollectionEffort] {
        &self.efforts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notes_loading(&self) -> bool {
        self.notes_loading
    }

    pub fn history_loading(&self) -> bool {
        self.history_loading
    }

    /// Last surfaced failure, for passive observation by the view layer.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Access to the underlying store, for collaborators that share it.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn fail<T>(&mut self, err: RegistryError) -> RegistryResult<T> {
        self.error = Some(err.to_string());
        Err(err)
    }

    fn position(&self, client_id: &ClientId) -> Option<usize> {
        self.clients.iter().position(|c| &c.id == client_id)
    }

    fn selected_is(&self, client_id: &ClientId) -> bool {
        self.selected.as_ref().is_some_and(|c| &c.id == client_id)
    }

    /// Replaces the whole collection with the store's current contents,
    /// ordered newest first. The previous collection survives a failed call.
    pub fn fetch_clients(&mut self) -> RegistryResult<()>
    where
        S: ClientStore,
    {
        self.loading = true;
        let result = self.store.list_clients(ClientListQuery::new());
        self.loading = false;
        match result {
            Ok((_, rows)) => {
                self.clients = rows;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("client list refresh failed: {e}");
                self.fail(e.into())
            }
        }
    }

    /// Optimistic insert: the candidate row is visible under a temporary id
    /// until the store echoes the canonical one.
    pub fn add_client(&mut self, mut new_client: NewClient) -> RegistryResult<ClientId>
    where
        S: ClientStore + NotificationStore,
    {
        new_client.created_by = self.session.user_id.clone();
        let temp_id = ClientId::temporary();
        let candidate = Client::candidate(temp_id.clone(), &new_client, Utc::now().naive_utc());
        self.clients.insert(0, candidate);

        match self.store.insert_client(&new_client) {
            Ok(row) => {
                let id = row.id.clone();
                if let Some(entry) = self.clients.iter_mut().find(|c| c.id == temp_id) {
                    *entry = row;
                }
                self.error = None;
                log::info!("client {id} committed");
                notify::notify(
                    &self.store,
                    &self.session.user_id,
                    NotificationKind::Success,
                    format!("Client {} added", new_client.name),
                );
                Ok(id)
            }
            Err(e) => {
                self.clients.retain(|c| c.id != temp_id);
                log::warn!("client insert rolled back: {e}");
                self.fail(e.into())
            }
        }
    }

    /// Optimistic in-place update. The collection entry and the selected
    /// slot move together, both on splice and on rollback, so readers never
    /// see them disagree.
    pub fn update_client(
        &mut self,
        client_id: &ClientId,
        mut updates: UpdateClient,
    ) -> RegistryResult<Client>
    where
        S: ClientStore + NotificationStore,
    {
        let Some(pos) = self.position(client_id) else {
            return self.fail(RegistryError::NotFound(client_id.clone()));
        };
        updates.modified_by = self.session.user_id.clone();

        let snapshot = self.clients[pos].clone();
        let selected_snapshot = self.selected.clone();
        let merged = snapshot.merged_with(&updates, Utc::now().naive_utc());
        self.clients[pos] = merged.clone();
        if self.selected_is(client_id) {
            self.selected = Some(merged);
        }

        match self.store.update_client(client_id, &updates) {
            Ok(row) => {
                self.clients[pos] = row.clone();
                if self.selected_is(client_id) {
                    self.selected = Some(row.clone());
                }
                self.error = None;
                log::info!("client {client_id} update committed");
                notify::notify(
                    &self.store,
                    &self.session.user_id,
                    NotificationKind::Success,
                    format!("Client {} updated", row.name),
                );
                Ok(row)
            }
            Err(e) => {
                self.clients[pos] = snapshot;
                self.selected = selected_snapshot;
                log::warn!("client {client_id} update rolled back: {e}");
                self.fail(e.into())
            }
        }
    }

    /// Optimistic delete. A failed delete re-appends the snapshot rather
    /// than splicing it back, so ordering is not preserved on rollback.
    pub fn delete_client(&mut self, client_id: &ClientId) -> RegistryResult<()>
    where
        S: ClientStore + NotificationStore,
    {
        let Some(pos) = self.position(client_id) else {
            return self.fail(RegistryError::NotFound(client_id.clone()));
        };
        let snapshot = self.clients.remove(pos);
        let was_selected = self.selected_is(client_id);
        if was_selected {
            self.selected = None;
        }

        match self.store.delete_client(client_id) {
            Ok(()) => {
                self.error = None;
                log::info!("client {client_id} delete committed");
                notify::notify(
                    &self.store,
                    &self.session.user_id,
                    NotificationKind::Success,
                    format!("Client {} deleted", snapshot.name),
                );
                Ok(())
            }
            Err(e) => {
                self.clients.push(snapshot.clone());
                if was_selected {
                    self.selected = Some(snapshot);
                }
                log::warn!("client {client_id} delete rolled back: {e}");
                self.fail(e.into())
            }
        }
    }

    /// Sets the selected-client slot from the loaded collection (no store
    /// call) and triggers the two independent sub-fetches. Sub-fetch
    /// failures are recorded but do not undo the selection.
    pub fn select_client(&mut self, client_id: &ClientId) -> RegistryResult<()>
    where
        S: NoteStore + PaymentStore,
    {
        let Some(client) = self.clients.iter().find(|c| &c.id == client_id).cloned() else {
            return self.fail(RegistryError::NotFound(client_id.clone()));
        };
        self.selected = Some(client);

        if let Err(e) = self.fetch_client_notes(client_id) {
            log::warn!("note fetch for {client_id} failed: {e}");
        }
        if let Err(e) = self.fetch_client_payment_history(client_id) {
            log::warn!("payment history fetch for {client_id} failed: {e}");
        }
        Ok(())
    }

    /// Wholesale replace of the notes collection, scoped to one client.
    pub fn fetch_client_notes(&mut self, client_id: &ClientId) -> RegistryResult<()>
    where
        S: NoteStore,
    {
        self.notes_loading = true;
        let result = self
            .store
            .list_client_notes(NoteListQuery::new(client_id.clone()));
        self.notes_loading = false;
        match result {
            Ok(rows) => {
                self.notes = rows;
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Wholesale replace of the payment-history collection, scoped to one
    /// client.
    pub fn fetch_client_payment_history(&mut self, client_id: &ClientId) -> RegistryResult<()>
    where
        S: PaymentStore,
    {
        self.history_loading = true;
        let result = self
            .store
            .list_payments(PaymentListQuery::new(client_id.clone()));
        self.history_loading = false;
        match result {
            Ok(rows) => {
                self.payment_history = rows;
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Optimistic note insert, in the `add_client` pattern.
    pub fn add_client_note(
        &mut self,
        client_id: &ClientId,
        text: &str,
    ) -> RegistryResult<ClientNote>
    where
        S: NoteStore + NotificationStore,
    {
        if self.position(client_id).is_none() {
            return self.fail(RegistryError::NotFound(client_id.clone()));
        }
        let new_note =
            NewClientNote::new(client_id.clone(), text, self.session.user_id.clone());
        let temp_id = NoteId::temporary();
        self.notes.insert(
            0,
            ClientNote::candidate(temp_id.clone(), &new_note, Utc::now().naive_utc()),
        );

        match self.store.insert_client_note(&new_note) {
            Ok(row) => {
                if let Some(entry) = self.notes.iter_mut().find(|n| n.id == temp_id) {
                    *entry = row.clone();
                }
                self.error = None;
                notify::notify(
                    &self.store,
                    &self.session.user_id,
                    NotificationKind::Success,
                    format!("Note added for client {client_id}"),
                );
                Ok(row)
            }
            Err(e) => {
                self.notes.retain(|n| n.id != temp_id);
                log::warn!("note insert for {client_id} rolled back: {e}");
                self.fail(e.into())
            }
        }
    }

    /// Two-row optimistic write: a payment insert followed by a balance
    /// patch on the owning client, as two separate store calls.
    ///
    /// A failure at either step rolls back the payment history, the client
    /// entry, and the selected slot together. When the second call fails the
    /// payment row is already durable server-side; that outcome is flagged
    /// as [`RegistryError::PartialWrite`] rather than repaired.
    ///
    /// Amount validation (positive, within the outstanding balance) is the
    /// caller's responsibility; see `forms::payment::AddPaymentForm`.
    pub fn add_payment(
        &mut self,
        client_id: &ClientId,
        mut new_payment: NewPayment,
    ) -> RegistryResult<Payment>
    where
        S: ClientStore + PaymentStore + NotificationStore,
    {
        let Some(pos) = self.position(client_id) else {
            return self.fail(RegistryError::NotFound(client_id.clone()));
        };
        new_payment.client_id = client_id.clone();

        let client_snapshot = self.clients[pos].clone();
        let selected_snapshot = self.selected.clone();
        let history_snapshot = self.payment_history.clone();

        let outcome = PaymentOutcome::apply(&client_snapshot, new_payment.amount);
        let now = Utc::now().naive_utc();
        let temp_id = PaymentId::temporary();
        self.payment_history
            .insert(0, Payment::candidate(temp_id.clone(), &new_payment, now));
        let patch = outcome.into_patch(self.session.user_id.clone());
        let updated = client_snapshot.with_balance(&patch, now);
        self.clients[pos] = updated.clone();
        if self.selected_is(client_id) {
            self.selected = Some(updated);
        }

        let inserted = match self.store.insert_payment(&new_payment) {
            Ok(row) => row,
            Err(e) => {
                self.payment_history = history_snapshot;
                self.clients[pos] = client_snapshot;
                self.selected = selected_snapshot;
                log::warn!("payment insert for {client_id} rolled back: {e}");
                return self.fail(e.into());
            }
        };

        // The payment row is durable from here on. A failed balance patch
        // reverts local state while the store keeps the inserted row.
        match self.store.apply_client_balance(client_id, &patch) {
            Ok(row) => {
                if let Some(entry) = self.payment_history.iter_mut().find(|p| p.id == temp_id) {
                    *entry = inserted.clone();
                }
                self.clients[pos] = row.clone();
                if self.selected_is(client_id) {
                    self.selected = Some(row);
                }
                self.error = None;
                log::info!(
                    "payment {} of {} committed for client {client_id}",
                    inserted.id,
                    inserted.amount
                );
                notify::notify(
                    &self.store,
                    &self.session.user_id,
                    NotificationKind::Success,
                    format!(
                        "Payment of {} recorded for {}",
                        inserted.amount, client_snapshot.name
                    ),
                );
                Ok(inserted)
            }
            Err(e) => {
                self.payment_history = history_snapshot;
                self.clients[pos] = client_snapshot;
                self.selected = selected_snapshot;
                log::error!(
                    "partial write: payment {} persisted but balance update for {client_id} failed: {e}",
                    inserted.id
                );
                self.fail(RegistryError::PartialWrite(e))
            }
        }
    }

    /// Wholesale replace of the collection-effort log, scoped to one client.
    pub fn fetch_collection_efforts(&mut self, client_id: &ClientId) -> RegistryResult<()>
    where
        S: EffortStore,
    {
        match self
            .store
            .list_collection_efforts(EffortListQuery::new(client_id.clone()))
        {
            Ok(rows) => {
                self.efforts = rows;
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Records a collection attempt (insert-then-prepend, not optimistic).
    pub fn log_collection_effort(
        &mut self,
        client_id: &ClientId,
        channel: EffortChannel,
        summary: &str,
    ) -> RegistryResult<CollectionEffort>
    where
        S: EffortStore + NotificationStore,
    {
        if self.position(client_id).is_none() {
            return self.fail(RegistryError::NotFound(client_id.clone()));
        }
        let new_effort = NewCollectionEffort::new(
            client_id.clone(),
            channel,
            summary,
            self.session.user_id.clone(),
        );

        match self.store.insert_collection_effort(&new_effort) {
            Ok(row) => {
                self.efforts.insert(0, row.clone());
                self.error = None;
                notify::notify(
                    &self.store,
                    &self.session.user_id,
                    NotificationKind::Info,
                    format!("{} attempt logged for client {client_id}", row.channel),
                );
                Ok(row)
            }
            Err(e) => {
                log::warn!("collection effort for {client_id} failed: {e}");
                self.fail(e.into())
            }
        }
    }
}

//! Mock store implementations for isolating the service layer in tests.

use mockall::mock;

use crate::domain::client::{BalancePatch, Client, NewClient, UpdateClient};
use crate::domain::effort::{CollectionEffort, NewCollectionEffort};
use crate::domain::note::{ClientNote, NewClientNote};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::types::{ClientId, NotificationId, UserId};
use crate::store::errors::StoreResult;
use crate::store::{
    ClientListQuery, ClientStore, EffortListQuery, EffortStore, NoteListQuery, NoteStore,
    NotificationListQuery, NotificationStore, PaymentListQuery, PaymentStore,
};

mock! {
    pub Store {}

    impl ClientStore for Store {
        fn get_client_by_id(&self, id: &ClientId) -> StoreResult<Option<Client>>;
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

    impl NoteStore for Store {
        fn list_client_notes(&self, query: NoteListQuery) -> StoreResult<Vec<ClientNote>>;
        fn insert_client_note(&self, new_note: &NewClientNote) -> StoreResult<ClientNote>;
    }

    impl PaymentStore for Store {
        fn list_payments(&self, query: PaymentListQuery) -> StoreResult<Vec<Payment>>;
        fn insert_payment(&self, new_payment: &NewPayment) -> StoreResult<Payment>;
    }

    impl NotificationStore for Store {
        fn list_notifications(
            &self,
            query: NotificationListQuery,
        ) -> StoreResult<(usize, Vec<Notification>)>;
        fn unread_count(&self, user_id: &UserId) -> StoreResult<usize>;
        fn insert_notification(&self, new_notification: &NewNotification) -> StoreResult<Notification>;
        fn mark_notification_read(&self, id: &NotificationId) -> StoreResult<()>;
        fn mark_all_notifications_read(&self, user_id: &UserId) -> StoreResult<usize>;
    }

    impl EffortStore for Store {
        fn list_collection_efforts(&self, query: EffortListQuery)
        -> StoreResult<Vec<CollectionEffort>>;
        fn insert_collection_effort(
            &self,
            new_effort: &NewCollectionEffort,
        ) -> StoreResult<CollectionEffort>;
    }
}

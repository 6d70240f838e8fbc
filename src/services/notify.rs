//! Notification log operations.

use crate::domain::notification::{NewNotification, Notification, NotificationKind};
use crate::domain::types::{NotificationId, UserId};
use crate::services::ServiceResult;
use crate::store::{NotificationListQuery, NotificationStore};

/// Appends a notification on a non-critical path: a store failure is logged
/// and swallowed so it cannot fail the parent operation.
pub fn notify<S>(store: &S, user_id: &UserId, kind: NotificationKind, message: impl Into<String>)
where
    S: NotificationStore + ?Sized,
{
    let new_notification = NewNotification::new(user_id.clone(), message, kind);
    if let Err(e) = store.insert_notification(&new_notification) {
        log::warn!("notification for {user_id} dropped: {e}");
    }
}

/// Paginated fetch of a user's notification log, newest first.
pub fn list_notifications<S>(
    store: &S,
    query: NotificationListQuery,
) -> ServiceResult<(usize, Vec<Notification>)>
where
    S: NotificationStore + ?Sized,
{
    Ok(store.list_notifications(query)?)
}

/// Number of unread notifications for the user.
pub fn unread_count<S>(store: &S, user_id: &UserId) -> ServiceResult<usize>
where
    S: NotificationStore + ?Sized,
{
    Ok(store.unread_count(user_id)?)
}

/// Flips one notification's `read` flag.
pub fn mark_read<S>(store: &S, id: &NotificationId) -> ServiceResult<()>
where
    S: NotificationStore + ?Sized,
{
    Ok(store.mark_notification_read(id)?)
}

/// Marks every unread notification for the user as read, returning how many
/// were flipped.
pub fn mark_all_read<S>(store: &S, user_id: &UserId) -> ServiceResult<usize>
where
    S: NotificationStore + ?Sized,
{
    Ok(store.mark_all_notifications_read(user_id)?)
}

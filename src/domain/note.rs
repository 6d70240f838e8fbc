use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, NoteId, UserId};

/// Free-text annotation attached to one client. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientNote {
    pub id: NoteId,
    pub client_id: ClientId,
    pub note: String,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
}

/// Insert payload for a note.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewClientNote {
    pub client_id: ClientId,
    pub note: String,
    pub created_by: UserId,
}

impl NewClientNote {
    pub fn new(client_id: ClientId, note: impl Into<String>, created_by: UserId) -> Self {
        Self {
            client_id,
            note: note.into().trim().to_string(),
            created_by,
        }
    }
}

impl ClientNote {
    /// Optimistic candidate row shown before the store assigns an id.
    pub fn candidate(id: NoteId, new_note: &NewClientNote, now: NaiveDateTime) -> Self {
        Self {
            id,
            client_id: new_note.client_id.clone(),
            note: new_note.note.clone(),
            created_by: new_note.created_by.clone(),
            created_at: now,
        }
    }
}

//! Domain entities and value objects, independent of any store backend.

pub mod client;
pub mod effort;
pub mod note;
pub mod notification;
pub mod payment;
pub mod types;

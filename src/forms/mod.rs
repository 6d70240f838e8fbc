//! Input forms: deserialization plus validation, upstream of the registry.

pub mod client;
pub mod payment;

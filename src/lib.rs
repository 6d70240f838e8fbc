//! Data core for a law-firm collections CRM.
//!
//! The centerpiece is [`registry::ClientRegistry`], an in-memory mirror of
//! the hosted client table that applies every mutation optimistically:
//! local state changes first, the store call follows, and the entry is
//! either reconciled with the canonical server row or rolled back to a
//! pre-operation snapshot. Around it sit the [`store`] boundary (per-table
//! traits over the remote persistence service, plus a simulated in-memory
//! backend), a [`cache`] for the read-through query layer in [`services`],
//! [`forms`] for input validation, and [`config`] for runtime settings.
//!
//! The crate owns no wire protocol or UI; it is an in-process library
//! consumed by a view layer that renders registry state and dispatches its
//! operations.

pub mod cache;
pub mod config;
pub mod domain;
pub mod forms;
pub mod registry;
pub mod services;
pub mod store;

//! Channel storage backends.
//!
//! [`PgChannelRepository`] is the durable store and keeps the ability index in
//! step with every write. [`InMemoryChannelStore`] serves tests and
//! single-process deployments.

pub mod memory;
pub mod postgres;
pub mod repositories;

pub use memory::InMemoryChannelStore;
pub use repositories::*;

//! # Edugate Audit
//!
//! Persistence of strict-path authorization denials.
//!
//! - [`model`]: denial records as stored and as submitted
//! - [`store`]: the [`DenialStore`] trait with PostgreSQL and in-memory backends
//! - [`auditor`]: the best-effort [`Auditor`] used by the guard middleware

pub mod auditor;
pub mod model;
pub mod store;

pub use auditor::{AuditOutcome, Auditor};
pub use model::{DenialRecord, NewDenialRecord};
pub use store::{AuditError, DenialStore, MEMORY_STORE_CAPACITY, MemoryDenialStore, PgDenialStore};

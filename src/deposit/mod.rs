//! Deposit Store
//!
//! Idempotent persistence of deposit records keyed by transaction hash.
//!
//! - [`DepositStore`]: atomic insert-if-absent, status update, listing
//! - [`InMemoryDepositStore`]: DashMap-backed, for dev mode and tests
//! - [`PgDepositStore`]: PostgreSQL-backed

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use memory::InMemoryDepositStore;
pub use postgres::PgDepositStore;
pub use store::DepositStore;
pub use types::{DepositRecord, DepositStatus, InsertOutcome, UpdateOutcome};

//! Row store backends for Sealward
//!
//! Provides the shared shipment table: an in-memory table and a SQLite-backed one.

pub mod factory;
pub mod memory_store;
pub mod row_store;
pub mod sqlite_store;

pub use factory::RowStoreBuilder;
pub use memory_store::MemoryRowStore;
pub use row_store::RowStore;
pub use sqlite_store::SqliteRowStore;

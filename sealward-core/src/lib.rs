//! Sealward Core - custody registry for sealed trailer shipments
//!
//! A departure appends one row to a shared shipment table with the trailer seal
//! as its open key; the matching arrival finds that row again by seal and
//! closes it out in place. The table is a plain row store with no transactions,
//! so every write sequence goes through a single registry-wide lock.

pub mod blob;
pub mod engine;
pub mod error;
pub mod operations;
pub mod record;
pub mod schema;
pub mod seal;
pub mod storage;

pub use blob::{
    BlobResolver, BlobResolverBuilder, FileHandle, LINK_RESOLUTION_FAILED, LinkTemplateResolver,
    PermissionGrantResolver, resolve_reference,
};
pub use engine::{DepartureResponse, FinalizeResponse, LocateResponse, OutcomeStatus, SealRegistry};
pub use error::{Result, SealError};
pub use operations::{
    ArrivalPhotos, DeparturePhotos, FinalizeArrivalOperationRequest, LocatePendingOperationRequest,
    RegisterDepartureOperationRequest, RegisterDepartureSettings, SealUniqueness,
};
pub use record::{Clock, LocalClock, PendingArrival, ShipmentStatus};
pub use storage::{MemoryRowStore, RowStore, RowStoreBuilder, SqliteRowStore};

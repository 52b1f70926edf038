pub mod finalize_arrival;
pub mod locate_pending;
pub mod register_departure;

use std::sync::Arc;

/// Process-wide lock serializing every check-then-write sequence on the row store.
pub type WriteLock = Arc<tokio::sync::Mutex<()>>;

pub use finalize_arrival::{
    ArrivalPhotos, FinalizeArrivalOperation, FinalizeArrivalOperationOutcome,
    FinalizeArrivalOperationRequest,
};
pub use locate_pending::{
    LocatePendingOperation, LocatePendingOperationOutcome, LocatePendingOperationRequest,
};
pub use register_departure::{
    DeparturePhotos, RegisterDepartureOperation, RegisterDepartureOperationOutcome,
    RegisterDepartureOperationRequest, RegisterDepartureOperationResult,
    RegisterDepartureSettings, SealUniqueness,
};

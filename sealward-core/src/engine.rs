//! The seal registry: the three shipment operations behind one write lock,
//! translated into caller-facing responses.

use crate::blob::BlobResolver;
use crate::operations::{
    FinalizeArrivalOperation, FinalizeArrivalOperationOutcome, FinalizeArrivalOperationRequest,
    LocatePendingOperation, LocatePendingOperationOutcome, LocatePendingOperationRequest,
    RegisterDepartureOperation, RegisterDepartureOperationOutcome,
    RegisterDepartureOperationRequest, RegisterDepartureSettings, WriteLock,
};
use crate::record::{Clock, LocalClock, PendingArrival};
use crate::RowStore;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Success,
    Validation,
    Conflict,
    NotFound,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureResponse {
    pub status: OutcomeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void_seal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateResponse {
    pub status: OutcomeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PendingArrival>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub status: OutcomeStatus,
    pub message: String,
}

/// Entry point for the shipment lifecycle.
///
/// Register and finalize share a single write lock, so a duplicate-seal check
/// and its append, or a status check and its update, never interleave with
/// another write. Store faults are never retried here.
#[derive(Clone)]
pub struct SealRegistry {
    register: RegisterDepartureOperation,
    locate: LocatePendingOperation,
    finalize: FinalizeArrivalOperation,
}

impl SealRegistry {
    pub fn new(store: Arc<dyn RowStore>, resolver: Arc<dyn BlobResolver>) -> Self {
        Self::with_options(
            store,
            resolver,
            Arc::new(LocalClock),
            RegisterDepartureSettings::default(),
        )
    }

    pub fn with_options(
        store: Arc<dyn RowStore>,
        resolver: Arc<dyn BlobResolver>,
        clock: Arc<dyn Clock>,
        settings: RegisterDepartureSettings,
    ) -> Self {
        let write_lock: WriteLock = Arc::new(tokio::sync::Mutex::new(()));

        Self {
            register: RegisterDepartureOperation::new(
                store.clone(),
                resolver.clone(),
                clock.clone(),
                write_lock.clone(),
                settings,
            ),
            locate: LocatePendingOperation::new(store.clone()),
            finalize: FinalizeArrivalOperation::new(store, resolver, clock, write_lock),
        }
    }

    pub async fn register_departure(
        &self,
        request: RegisterDepartureOperationRequest,
    ) -> DepartureResponse {
        match self.register.run(request).await {
            Ok(RegisterDepartureOperationOutcome::Registered(result)) => DepartureResponse {
                status: OutcomeStatus::Success,
                message: format!(
                    "Departure registered successfully. Void seal: {}",
                    result.void_seal
                ),
                void_seal: Some(result.void_seal),
            },
            Ok(RegisterDepartureOperationOutcome::DuplicateSeal { seal }) => {
                tracing::info!("Rejected duplicate trailer seal {}", seal);
                DepartureResponse {
                    status: OutcomeStatus::Conflict,
                    message: format!("Seal \"{}\" has already been registered.", seal),
                    void_seal: None,
                }
            }
            Ok(RegisterDepartureOperationOutcome::Invalid(reason)) => DepartureResponse {
                status: OutcomeStatus::Validation,
                message: reason,
                void_seal: None,
            },
            Err(error) => {
                tracing::error!("Failed to register departure: {}", error);
                DepartureResponse {
                    status: OutcomeStatus::Internal,
                    message: "Internal error while registering the departure.".to_string(),
                    void_seal: None,
                }
            }
        }
    }

    pub async fn locate_pending(&self, request: LocatePendingOperationRequest) -> LocateResponse {
        let query = request.seal_query.clone();

        match self.locate.run(request).await {
            Ok(LocatePendingOperationOutcome::Found(record)) => LocateResponse {
                status: OutcomeStatus::Success,
                message: format!("Pending arrival found at row {}.", record.row_index),
                record: Some(record),
            },
            Ok(LocatePendingOperationOutcome::Empty) => LocateResponse {
                status: OutcomeStatus::NotFound,
                message: "No shipments have been recorded yet.".to_string(),
                record: None,
            },
            Ok(LocatePendingOperationOutcome::NotFound) => LocateResponse {
                status: OutcomeStatus::NotFound,
                message: format!("No pending arrival found for seal \"{}\".", query),
                record: None,
            },
            Ok(LocatePendingOperationOutcome::Invalid(reason)) => LocateResponse {
                status: OutcomeStatus::Validation,
                message: reason,
                record: None,
            },
            Err(error) => {
                tracing::error!("Failed to search pending arrivals for {:?}: {}", query, error);
                LocateResponse {
                    status: OutcomeStatus::Internal,
                    message: "Internal error while searching for the arrival.".to_string(),
                    record: None,
                }
            }
        }
    }

    pub async fn finalize_arrival(
        &self,
        request: FinalizeArrivalOperationRequest,
    ) -> FinalizeResponse {
        let row_index = request.row_index;

        match self.finalize.run(request).await {
            Ok(FinalizeArrivalOperationOutcome::Finalized { .. }) => FinalizeResponse {
                status: OutcomeStatus::Success,
                message: "Arrival inspection finalized successfully.".to_string(),
            },
            Ok(FinalizeArrivalOperationOutcome::AlreadyFinalized { row_index }) => {
                tracing::info!("Rejected second finalization of row {}", row_index);
                FinalizeResponse {
                    status: OutcomeStatus::Conflict,
                    message: "This arrival has already been finalized.".to_string(),
                }
            }
            Ok(FinalizeArrivalOperationOutcome::Invalid(reason)) => FinalizeResponse {
                status: OutcomeStatus::Validation,
                message: reason,
            },
            Err(error) => {
                tracing::error!("Failed to finalize arrival at row {}: {}", row_index, error);
                FinalizeResponse {
                    status: OutcomeStatus::Internal,
                    message: "Internal error while finalizing the arrival.".to_string(),
                }
            }
        }
    }
}

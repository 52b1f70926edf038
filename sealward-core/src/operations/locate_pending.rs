use crate::record::{PendingArrival, ShipmentStatus, row_status};
use crate::schema::{COL_TRAILER_SEAL, FIRST_DATA_ROW};
use crate::seal::lookup_key;
use crate::{Result, RowStore};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatePendingOperationRequest {
    #[serde(default, alias = "lacreCarretaBusca")]
    pub seal_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatePendingOperationOutcome {
    Found(PendingArrival),
    /// The table holds no shipment rows at all.
    Empty,
    NotFound,
    Invalid(String),
}

/// Read-only search for the newest pending shipment carrying a seal.
///
/// Runs without the write lock: a concurrent write may or may not be visible.
#[derive(Clone)]
pub struct LocatePendingOperation {
    store: Arc<dyn RowStore>,
}

impl LocatePendingOperation {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    pub async fn run(
        &self,
        request: LocatePendingOperationRequest,
    ) -> Result<LocatePendingOperationOutcome> {
        let query = lookup_key(&request.seal_query);
        if query.is_empty() {
            return Ok(LocatePendingOperationOutcome::Invalid(
                "seal search text is required".to_string(),
            ));
        }

        let rows = self.store.read_all_rows().await?;
        if rows.len() < FIRST_DATA_ROW as usize {
            return Ok(LocatePendingOperationOutcome::Empty);
        }

        // Newest first: a released seal may reappear on a later row.
        for (position, row) in rows.iter().enumerate().skip(1).rev() {
            let Some(pending) = PendingArrival::from_row(row, position as u32 + 1) else {
                continue;
            };

            if lookup_key(&row[COL_TRAILER_SEAL as usize - 1]) != query {
                continue;
            }

            if row_status(row) == Some(ShipmentStatus::Pending) {
                tracing::info!(
                    "Found pending arrival for seal {:?} at row {}",
                    request.seal_query,
                    pending.row_index
                );
                return Ok(LocatePendingOperationOutcome::Found(pending));
            }
        }

        Ok(LocatePendingOperationOutcome::NotFound)
    }
}

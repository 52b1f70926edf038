use crate::blob::{BlobResolver, FileHandle, deserialize_optional_handle, resolve_reference};
use crate::operations::WriteLock;
use crate::record::{ArrivalRecord, Clock, ShipmentStatus};
use crate::schema::{COL_FINALIZED_AT, COL_STATUS, FIRST_DATA_ROW};
use crate::{Result, RowStore, SealError};
use serde::{Deserialize, Deserializer, de};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalPhotos {
    #[serde(
        default,
        alias = "fileStatus",
        deserialize_with = "deserialize_optional_handle"
    )]
    pub status: Option<FileHandle>,
    #[serde(
        default,
        alias = "fileVideoAbertura",
        deserialize_with = "deserialize_optional_handle"
    )]
    pub opening_video: Option<FileHandle>,
    #[serde(
        default,
        alias = "fileLacreStatus",
        deserialize_with = "deserialize_optional_handle"
    )]
    pub seal: Option<FileHandle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeArrivalOperationRequest {
    #[serde(deserialize_with = "deserialize_row_index")]
    pub row_index: u32,
    #[serde(default, alias = "lacreViolado")]
    pub seal_tampered: String,
    #[serde(default, alias = "informacoesProcedem")]
    pub info_matches: String,
    #[serde(default, alias = "observacoes")]
    pub notes: String,
    #[serde(flatten)]
    pub photos: ArrivalPhotos,
}

/// Form posts carry the row index as text, JSON clients as a number.
fn deserialize_row_index<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RowIndex {
        Number(u32),
        Text(String),
    }

    match RowIndex::deserialize(deserializer)? {
        RowIndex::Number(row) => Ok(row),
        RowIndex::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid row index {:?}", text))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeArrivalOperationOutcome {
    Finalized { row_index: u32 },
    AlreadyFinalized { row_index: u32 },
    Invalid(String),
}

#[derive(Clone)]
pub struct FinalizeArrivalOperation {
    store: Arc<dyn RowStore>,
    resolver: Arc<dyn BlobResolver>,
    clock: Arc<dyn Clock>,
    write_lock: WriteLock,
}

impl FinalizeArrivalOperation {
    pub fn new(
        store: Arc<dyn RowStore>,
        resolver: Arc<dyn BlobResolver>,
        clock: Arc<dyn Clock>,
        write_lock: WriteLock,
    ) -> Self {
        Self {
            store,
            resolver,
            clock,
            write_lock,
        }
    }

    pub async fn run(
        &self,
        request: FinalizeArrivalOperationRequest,
    ) -> Result<FinalizeArrivalOperationOutcome> {
        let FinalizeArrivalOperationRequest {
            row_index,
            seal_tampered,
            info_matches,
            notes,
            photos,
        } = request;

        if seal_tampered.trim().is_empty() {
            return Ok(FinalizeArrivalOperationOutcome::Invalid(
                "seal tamper answer is required".to_string(),
            ));
        }
        if info_matches.trim().is_empty() {
            return Ok(FinalizeArrivalOperationOutcome::Invalid(
                "information match answer is required".to_string(),
            ));
        }
        if row_index < FIRST_DATA_ROW {
            return Err(SealError::InvalidRow {
                row: row_index,
                reason: "header or zero row index".to_string(),
            });
        }

        let resolver = self.resolver.as_ref();
        let (status_photo, opening_video, seal_photo) = tokio::join!(
            resolve_reference(resolver, photos.status.as_ref()),
            resolve_reference(resolver, photos.opening_video.as_ref()),
            resolve_reference(resolver, photos.seal.as_ref()),
        );

        let _guard = self.write_lock.lock().await;

        let status_cell = self.store.read_cell(row_index, COL_STATUS).await?;
        let current = ShipmentStatus::parse(&status_cell).ok_or_else(|| SealError::InvalidRow {
            row: row_index,
            reason: format!("unrecognized status {:?}", status_cell),
        })?;

        if current.finalize().is_none() {
            return Ok(FinalizeArrivalOperationOutcome::AlreadyFinalized { row_index });
        }

        let arrival = ArrivalRecord {
            finalized_at: self.clock.now(),
            seal_tampered,
            info_matches,
            notes,
            status_photo,
            opening_video,
            seal_photo,
        };

        self.store
            .write_range(row_index, COL_FINALIZED_AT, COL_STATUS, arrival.to_cells())
            .await?;

        tracing::info!("Finalized arrival at row {}", row_index);

        Ok(FinalizeArrivalOperationOutcome::Finalized { row_index })
    }
}

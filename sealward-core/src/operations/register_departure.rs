use crate::blob::{BlobResolver, FileHandle, deserialize_optional_handle, resolve_reference};
use crate::operations::WriteLock;
use crate::record::{Clock, DepartureRecord, ShipmentStatus, row_status};
use crate::schema::{COL_TRAILER_SEAL, DEFAULT_VOID_SEAL_PREFIX};
use crate::seal::{compose_compound, registration_key, void_seal};
use crate::{Result, RowStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which rows a new trailer seal must not collide with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SealUniqueness {
    /// Every data row, finalized ones included. A seal can never be reused.
    #[default]
    AllRows,
    /// Only rows still pending, so a released seal can be issued again.
    PendingOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDepartureSettings {
    pub void_seal_prefix: String,
    pub seal_uniqueness: SealUniqueness,
}

impl Default for RegisterDepartureSettings {
    fn default() -> Self {
        Self {
            void_seal_prefix: DEFAULT_VOID_SEAL_PREFIX.to_string(),
            seal_uniqueness: SealUniqueness::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturePhotos {
    #[serde(
        default,
        alias = "fileCarreta",
        deserialize_with = "deserialize_optional_handle"
    )]
    pub trailer: Option<FileHandle>,
    #[serde(
        default,
        alias = "fileRegistroSaida",
        deserialize_with = "deserialize_optional_handle"
    )]
    pub departure_log: Option<FileHandle>,
    #[serde(
        default,
        alias = "fileLacre",
        deserialize_with = "deserialize_optional_handle"
    )]
    pub seal: Option<FileHandle>,
}

/// Departure payload. For a double-trailer unit `trailer_plate` and
/// `trailer_seal` describe the first trailer and the `second_*` fields the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDepartureOperationRequest {
    #[serde(default, alias = "vigilante")]
    pub guard: String,
    #[serde(default, alias = "origem")]
    pub origin: String,
    #[serde(default, alias = "destino")]
    pub destination: String,
    #[serde(default, alias = "transportadora")]
    pub carrier: String,
    #[serde(default, alias = "motorista")]
    pub driver: String,
    #[serde(default, alias = "placaCavalo")]
    pub tractor_plate: String,
    #[serde(default, alias = "placaCarreta", alias = "placaCarreta1")]
    pub trailer_plate: String,
    #[serde(default, alias = "placaCarreta2")]
    pub second_trailer_plate: String,
    #[serde(default, alias = "lacreCarreta", alias = "lacreCarreta1")]
    pub trailer_seal: String,
    #[serde(default, alias = "lacreCarreta2")]
    pub second_trailer_seal: String,
    #[serde(default, alias = "isBiTrem")]
    pub is_double_trailer: bool,
    #[serde(default, alias = "lacreNumero")]
    pub void_seal_number: String,
    #[serde(flatten)]
    pub photos: DeparturePhotos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDepartureOperationResult {
    pub trailer_seal: String,
    pub void_seal: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterDepartureOperationOutcome {
    Registered(RegisterDepartureOperationResult),
    /// The seal, as submitted, is already registered.
    DuplicateSeal { seal: String },
    Invalid(String),
}

#[derive(Clone)]
pub struct RegisterDepartureOperation {
    store: Arc<dyn RowStore>,
    resolver: Arc<dyn BlobResolver>,
    clock: Arc<dyn Clock>,
    write_lock: WriteLock,
    settings: RegisterDepartureSettings,
}

impl RegisterDepartureOperation {
    pub fn new(
        store: Arc<dyn RowStore>,
        resolver: Arc<dyn BlobResolver>,
        clock: Arc<dyn Clock>,
        write_lock: WriteLock,
        settings: RegisterDepartureSettings,
    ) -> Self {
        Self {
            store,
            resolver,
            clock,
            write_lock,
            settings,
        }
    }

    pub async fn run(
        &self,
        request: RegisterDepartureOperationRequest,
    ) -> Result<RegisterDepartureOperationOutcome> {
        let RegisterDepartureOperationRequest {
            guard,
            origin,
            destination,
            carrier,
            driver,
            tractor_plate,
            trailer_plate,
            second_trailer_plate,
            trailer_seal,
            second_trailer_seal,
            is_double_trailer,
            void_seal_number,
            photos,
        } = request;

        let (seal, plate) = if is_double_trailer {
            if trailer_seal.trim().is_empty() || second_trailer_seal.trim().is_empty() {
                return Ok(RegisterDepartureOperationOutcome::Invalid(
                    "both trailer seals are required for a double-trailer unit".to_string(),
                ));
            }
            (
                compose_compound(&trailer_seal, &second_trailer_seal),
                compose_compound(&trailer_plate, &second_trailer_plate).to_uppercase(),
            )
        } else {
            if trailer_seal.trim().is_empty() {
                return Ok(RegisterDepartureOperationOutcome::Invalid(
                    "trailer seal is required".to_string(),
                ));
            }
            (
                registration_key(&trailer_seal),
                trailer_plate.trim().to_uppercase(),
            )
        };

        let resolver = self.resolver.as_ref();
        let (trailer_photo, departure_log_photo, seal_photo) = tokio::join!(
            resolve_reference(resolver, photos.trailer.as_ref()),
            resolve_reference(resolver, photos.departure_log.as_ref()),
            resolve_reference(resolver, photos.seal.as_ref()),
        );

        let void_seal = void_seal(&self.settings.void_seal_prefix, &void_seal_number);

        let _guard = self.write_lock.lock().await;

        if self.is_registered(&seal).await? {
            return Ok(RegisterDepartureOperationOutcome::DuplicateSeal { seal });
        }

        let record = DepartureRecord {
            departed_at: self.clock.now(),
            guard: guard.trim().to_uppercase(),
            origin,
            destination,
            carrier,
            driver: driver.trim().to_uppercase(),
            tractor_plate: tractor_plate.trim().to_uppercase(),
            trailer_plate: plate,
            trailer_seal: registration_key(&seal),
            void_seal: void_seal.clone(),
            trailer_photo,
            departure_log_photo,
            seal_photo,
        };

        self.store.append_row(record.to_row()).await?;

        tracing::info!("Registered departure with trailer seal {}", seal);

        Ok(RegisterDepartureOperationOutcome::Registered(
            RegisterDepartureOperationResult {
                trailer_seal: record.trailer_seal,
                void_seal,
            },
        ))
    }

    /// Must run under the write lock.
    async fn is_registered(&self, seal: &str) -> Result<bool> {
        let key = registration_key(seal);

        match self.settings.seal_uniqueness {
            SealUniqueness::AllRows => {
                let column = self.store.read_column(COL_TRAILER_SEAL).await?;
                Ok(column
                    .iter()
                    .skip(1)
                    .any(|cell| registration_key(cell) == key))
            }
            SealUniqueness::PendingOnly => {
                let rows = self.store.read_all_rows().await?;
                Ok(rows.iter().skip(1).any(|row| {
                    row.get(COL_TRAILER_SEAL as usize - 1)
                        .is_some_and(|cell| registration_key(cell) == key)
                        && row_status(row) == Some(ShipmentStatus::Pending)
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_payload_with_listed_file_inputs() {
        let request: RegisterDepartureOperationRequest = serde_json::from_str(
            r#"{
                "lacreCarreta": "q1",
                "isBiTrem": false,
                "fileCarreta": [{"name": "a.jpg"}],
                "fileRegistroSaida": [{"id": "log-1", "name": "log.jpg"}],
                "fileLacre": null
            }"#,
        )
        .unwrap();

        assert_eq!(request.trailer_seal, "q1");
        let trailer = request.photos.trailer.unwrap();
        assert!(trailer.id.is_empty());
        assert_eq!(trailer.name.as_deref(), Some("a.jpg"));
        assert_eq!(request.photos.departure_log.unwrap().id, "log-1");
        assert!(request.photos.seal.is_none());
    }

    #[test]
    fn test_mistyped_field_is_rejected() {
        let result =
            serde_json::from_str::<RegisterDepartureOperationRequest>(r#"{"trailerSeal": 5}"#);
        assert!(result.is_err());
    }
}

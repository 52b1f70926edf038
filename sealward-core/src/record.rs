use crate::schema::{
    COL_CARRIER, COL_DEPARTED_AT, COL_DEPARTURE_LOG_PHOTO, COL_DESTINATION, COL_DRIVER,
    COL_GUARD, COL_ORIGIN, COL_SEAL_PHOTO, COL_STATUS, COL_TRACTOR_PLATE, COL_TRAILER_PHOTO,
    COL_TRAILER_PLATE, COL_TRAILER_SEAL, COL_VOID_SEAL, DISPLAY_TIMESTAMP_FORMAT,
    STORED_TIMESTAMP_FORMAT, TOTAL_COLUMNS,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle of a shipment row. `Finalized` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Pending,
    Finalized,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Finalized => "FINALIZED",
        }
    }

    /// Parses a stored status cell. Legacy labels from older tables are accepted.
    pub fn parse(cell: &str) -> Option<Self> {
        match cell.trim().to_uppercase().as_str() {
            "PENDING" | "PENDENTE" => Some(Self::Pending),
            "FINALIZED" | "FINALIZADO" => Some(Self::Finalized),
            _ => None,
        }
    }

    /// The only transition: pending to finalized.
    pub fn finalize(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

pub fn format_stored_timestamp(at: NaiveDateTime) -> String {
    at.format(STORED_TIMESTAMP_FORMAT).to_string()
}

/// Reformats a stored timestamp for display, keeping the raw text if it does not parse.
pub fn display_timestamp(stored: &str) -> String {
    match NaiveDateTime::parse_from_str(stored.trim(), STORED_TIMESTAMP_FORMAT) {
        Ok(at) => at.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        Err(_) => stored.to_string(),
    }
}

/// Departure block of a shipment row (columns 1-13).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureRecord {
    pub departed_at: NaiveDateTime,
    pub guard: String,
    pub origin: String,
    pub destination: String,
    pub carrier: String,
    pub driver: String,
    pub tractor_plate: String,
    pub trailer_plate: String,
    pub trailer_seal: String,
    pub void_seal: String,
    pub trailer_photo: String,
    pub departure_log_photo: String,
    pub seal_photo: String,
}

impl DepartureRecord {
    /// Full 21-cell row: finalize block empty, status pending.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            format_stored_timestamp(self.departed_at),
            self.guard.clone(),
            self.origin.clone(),
            self.destination.clone(),
            self.carrier.clone(),
            self.driver.clone(),
            self.tractor_plate.clone(),
            self.trailer_plate.clone(),
            self.trailer_seal.clone(),
            self.void_seal.clone(),
            self.trailer_photo.clone(),
            self.departure_log_photo.clone(),
            self.seal_photo.clone(),
        ];
        row.resize(TOTAL_COLUMNS as usize - 1, String::new());
        row.push(ShipmentStatus::Pending.as_str().to_string());
        row
    }
}

/// Finalize block of a shipment row (columns 14-21).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub finalized_at: NaiveDateTime,
    pub seal_tampered: String,
    pub info_matches: String,
    pub notes: String,
    pub status_photo: String,
    pub opening_video: String,
    pub seal_photo: String,
}

impl ArrivalRecord {
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            format_stored_timestamp(self.finalized_at),
            self.seal_tampered.clone(),
            self.info_matches.clone(),
            self.notes.clone(),
            self.status_photo.clone(),
            self.opening_video.clone(),
            self.seal_photo.clone(),
            ShipmentStatus::Finalized.as_str().to_string(),
        ]
    }
}

/// Display projection of a pending shipment, as returned by the arrival search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingArrival {
    pub departed_at: String,
    pub guard: String,
    pub origin: String,
    pub destination: String,
    pub carrier: String,
    pub driver: String,
    pub tractor_plate: String,
    pub trailer_plate: String,
    pub trailer_seal: String,
    pub void_seal: String,
    pub trailer_photo: String,
    pub departure_log_photo: String,
    pub seal_photo: String,
    pub row_index: u32,
}

impl PendingArrival {
    /// Builds the projection from a full row. Returns `None` for rows too short
    /// to carry a status cell.
    pub fn from_row(row: &[String], row_index: u32) -> Option<Self> {
        if row.len() < TOTAL_COLUMNS as usize {
            return None;
        }
        let cell = |col: u32| row[col as usize - 1].clone();

        Some(Self {
            departed_at: display_timestamp(&row[COL_DEPARTED_AT as usize - 1]),
            guard: cell(COL_GUARD),
            origin: cell(COL_ORIGIN),
            destination: cell(COL_DESTINATION),
            carrier: cell(COL_CARRIER),
            driver: cell(COL_DRIVER),
            tractor_plate: cell(COL_TRACTOR_PLATE),
            trailer_plate: cell(COL_TRAILER_PLATE),
            trailer_seal: cell(COL_TRAILER_SEAL),
            void_seal: cell(COL_VOID_SEAL),
            trailer_photo: cell(COL_TRAILER_PHOTO),
            departure_log_photo: cell(COL_DEPARTURE_LOG_PHOTO),
            seal_photo: cell(COL_SEAL_PHOTO),
            row_index,
        })
    }
}

/// Status cell of a full row, if the row is long enough and the cell parses.
pub fn row_status(row: &[String]) -> Option<ShipmentStatus> {
    row.get(COL_STATUS as usize - 1)
        .and_then(|cell| ShipmentStatus::parse(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_status_parse_accepts_legacy_labels() {
        assert_eq!(ShipmentStatus::parse(" pendente "), Some(ShipmentStatus::Pending));
        assert_eq!(ShipmentStatus::parse("FINALIZADO"), Some(ShipmentStatus::Finalized));
        assert_eq!(ShipmentStatus::parse("finalized"), Some(ShipmentStatus::Finalized));
        assert_eq!(ShipmentStatus::parse(""), None);
        assert_eq!(ShipmentStatus::parse("CANCELLED"), None);
    }

    #[test]
    fn test_status_transition_is_one_way() {
        assert_eq!(
            ShipmentStatus::Pending.finalize(),
            Some(ShipmentStatus::Finalized)
        );
        assert_eq!(ShipmentStatus::Finalized.finalize(), None);
    }

    #[test]
    fn test_display_timestamp() {
        assert_eq!(display_timestamp("07/03/2024 08:05:09"), "07/03/2024, 08:05:09");
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_departure_row_layout() {
        let record = DepartureRecord {
            departed_at: at(8, 5, 9),
            guard: "G".to_string(),
            origin: "O".to_string(),
            destination: "D".to_string(),
            carrier: "C".to_string(),
            driver: "DR".to_string(),
            tractor_plate: "ABC1234".to_string(),
            trailer_plate: "XYZ9876".to_string(),
            trailer_seal: "S1".to_string(),
            void_seal: "V1".to_string(),
            trailer_photo: String::new(),
            departure_log_photo: String::new(),
            seal_photo: String::new(),
        };

        let row = record.to_row();
        assert_eq!(row.len(), TOTAL_COLUMNS as usize);
        assert_eq!(row[0], "07/03/2024 08:05:09");
        assert_eq!(row[COL_TRAILER_SEAL as usize - 1], "S1");
        assert!(row[13..20].iter().all(|cell| cell.is_empty()));
        assert_eq!(row_status(&row), Some(ShipmentStatus::Pending));

        let pending = PendingArrival::from_row(&row, 5).unwrap();
        assert_eq!(pending.departed_at, "07/03/2024, 08:05:09");
        assert_eq!(pending.row_index, 5);
        assert!(PendingArrival::from_row(&row[..20], 5).is_none());
    }

    #[test]
    fn test_arrival_cells() {
        let arrival = ArrivalRecord {
            finalized_at: at(18, 0, 0),
            seal_tampered: "No".to_string(),
            info_matches: "Yes".to_string(),
            notes: String::new(),
            status_photo: "a".to_string(),
            opening_video: "b".to_string(),
            seal_photo: "c".to_string(),
        };
        let cells = arrival.to_cells();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[7], "FINALIZED");
    }
}

//! Column contract of the shipment table.
//!
//! Indices are 1-based to match the row store. Columns 1-13 are written once
//! when a departure is registered; columns 14-21 are written once when the
//! arrival is finalized.

pub const COL_DEPARTED_AT: u32 = 1;
pub const COL_GUARD: u32 = 2;
pub const COL_ORIGIN: u32 = 3;
pub const COL_DESTINATION: u32 = 4;
pub const COL_CARRIER: u32 = 5;
pub const COL_DRIVER: u32 = 6;
pub const COL_TRACTOR_PLATE: u32 = 7;
pub const COL_TRAILER_PLATE: u32 = 8;
pub const COL_TRAILER_SEAL: u32 = 9;
pub const COL_VOID_SEAL: u32 = 10;
pub const COL_TRAILER_PHOTO: u32 = 11;
pub const COL_DEPARTURE_LOG_PHOTO: u32 = 12;
pub const COL_SEAL_PHOTO: u32 = 13;
pub const COL_FINALIZED_AT: u32 = 14;
pub const COL_SEAL_TAMPERED: u32 = 15;
pub const COL_INFO_MATCHES: u32 = 16;
pub const COL_NOTES: u32 = 17;
pub const COL_ARRIVAL_STATUS_PHOTO: u32 = 18;
pub const COL_OPENING_VIDEO: u32 = 19;
pub const COL_ARRIVAL_SEAL_PHOTO: u32 = 20;
pub const COL_STATUS: u32 = 21;

pub const DEPARTURE_COLUMNS: u32 = COL_SEAL_PHOTO;
pub const TOTAL_COLUMNS: u32 = COL_STATUS;

pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 2;

/// Separator used for double-trailer plates and seals.
pub const COMPOUND_SEPARATOR: &str = " / ";

pub const DEFAULT_VOID_SEAL_PREFIX: &str = "V";

/// Storage format of both timestamp columns.
pub const STORED_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

pub const HEADER_LABELS: [&str; TOTAL_COLUMNS as usize] = [
    "Departed At",
    "Guard",
    "Origin",
    "Destination",
    "Carrier",
    "Driver",
    "Tractor Plate",
    "Trailer Plate",
    "Trailer Seal",
    "Void Seal",
    "Trailer Photo",
    "Departure Log Photo",
    "Seal Photo",
    "Finalized At",
    "Seal Tampered",
    "Info Matches",
    "Notes",
    "Arrival Status Photo",
    "Opening Video",
    "Arrival Seal Photo",
    "Status",
];

pub fn header_row() -> Vec<String> {
    HEADER_LABELS.iter().map(|label| label.to_string()).collect()
}

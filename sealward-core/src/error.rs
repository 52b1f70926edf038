use thiserror::Error;

#[derive(Error, Debug)]
pub enum SealError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("row {0} is out of range")]
    RowOutOfRange(u32),

    #[error("row {row} is not a shipment record: {reason}")]
    InvalidRow { row: u32, reason: String },

    #[error("row store error: {0}")]
    Store(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SealError>;

use crate::Result;
use async_trait::async_trait;

/// An ordered table of text cells addressed by 1-based row and column.
///
/// Row 1 is the header. Nothing here is transactional across calls; callers
/// that need check-then-write sequences must serialize them themselves.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn append_row(&self, cells: Vec<String>) -> Result<()>;

    /// Every row's value in `column`, header included. Short rows yield "".
    async fn read_column(&self, column: u32) -> Result<Vec<String>>;

    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>>;

    /// Fails with `RowOutOfRange` past the last row; a cell past the end of
    /// an existing row reads as "".
    async fn read_cell(&self, row: u32, column: u32) -> Result<String>;

    /// Overwrites columns `start_column..=end_column` of `row`.
    async fn write_range(
        &self,
        row: u32,
        start_column: u32,
        end_column: u32,
        values: Vec<String>,
    ) -> Result<()>;
}

/// Checks range arguments shared by every backend.
pub(crate) fn check_range(
    start_column: u32,
    end_column: u32,
    values: &[String],
) -> Result<()> {
    if start_column == 0 || end_column < start_column {
        return Err(crate::SealError::InvalidRequest(format!(
            "invalid column range {}..={}",
            start_column, end_column
        )));
    }

    let width = (end_column - start_column + 1) as usize;
    if values.len() != width {
        return Err(crate::SealError::InvalidRequest(format!(
            "range {}..={} expects {} values, got {}",
            start_column,
            end_column,
            width,
            values.len()
        )));
    }

    Ok(())
}

/// Writes `values` into `row` starting at 1-based `start_column`, padding short rows.
pub(crate) fn splice_cells(row: &mut Vec<String>, start_column: u32, values: Vec<String>) {
    let start = start_column as usize - 1;
    let end = start + values.len();
    if row.len() < end {
        row.resize(end, String::new());
    }
    for (offset, value) in values.into_iter().enumerate() {
        row[start + offset] = value;
    }
}

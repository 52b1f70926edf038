use super::row_store::{RowStore, check_range, splice_cells};
use crate::schema::header_row;
use crate::{Result, SealError};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Volatile shipment table, seeded with the header row.
pub struct MemoryRowStore {
    rows: RwLock<Vec<Vec<String>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::with_rows(vec![header_row()])
    }

    /// Starts from an existing table. The first row is treated as the header.
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }
}

impl Default for MemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn append_row(&self, cells: Vec<String>) -> Result<()> {
        self.rows.write().await.push(cells);
        Ok(())
    }

    async fn read_column(&self, column: u32) -> Result<Vec<String>> {
        if column == 0 {
            return Err(SealError::InvalidRequest("column index is 1-based".to_string()));
        }

        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .map(|row| row.get(column as usize - 1).cloned().unwrap_or_default())
            .collect())
    }

    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.rows.read().await.clone())
    }

    async fn read_cell(&self, row: u32, column: u32) -> Result<String> {
        if row == 0 || column == 0 {
            return Err(SealError::InvalidRequest("indices are 1-based".to_string()));
        }

        let rows = self.rows.read().await;
        let cells = rows
            .get(row as usize - 1)
            .ok_or(SealError::RowOutOfRange(row))?;
        Ok(cells.get(column as usize - 1).cloned().unwrap_or_default())
    }

    async fn write_range(
        &self,
        row: u32,
        start_column: u32,
        end_column: u32,
        values: Vec<String>,
    ) -> Result<()> {
        check_range(start_column, end_column, &values)?;
        if row == 0 {
            return Err(SealError::RowOutOfRange(row));
        }

        let mut rows = self.rows.write().await;
        let cells = rows
            .get_mut(row as usize - 1)
            .ok_or(SealError::RowOutOfRange(row))?;
        splice_cells(cells, start_column, values);
        Ok(())
    }
}

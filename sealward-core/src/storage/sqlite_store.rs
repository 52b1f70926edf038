use super::row_store::{RowStore, check_range, splice_cells};
use crate::schema::{HEADER_ROW, header_row};
use crate::{Result, SealError};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// Shipment table persisted in a SQLite file.
///
/// Each row is stored as a JSON array of cells keyed by its 1-based index, so
/// rows of any width survive unchanged.
pub struct SqliteRowStore {
    db_path: PathBuf,
}

impl SqliteRowStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self { db_path };
        store.init_schema()?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn get_conn(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.get_conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sheet_rows (
                row_index INTEGER PRIMARY KEY,
                cells TEXT NOT NULL
            )",
            [],
        )?;

        let header_json = serde_json::to_string(&header_row())?;
        conn.execute(
            "INSERT OR IGNORE INTO sheet_rows (row_index, cells) VALUES (?1, ?2)",
            params![HEADER_ROW, header_json],
        )?;

        Ok(())
    }

    fn load_rows(&self) -> Result<Vec<Vec<String>>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT row_index, cells FROM sheet_rows ORDER BY row_index")?;

        let rows = stmt.query_map([], |row| {
            let row_index: i64 = row.get(0)?;
            let cells_json: String = row.get(1)?;
            Ok((row_index, cells_json))
        })?;

        let mut table = Vec::new();
        for row in rows {
            let (row_index, cells_json) = row?;
            if row_index != table.len() as i64 + 1 {
                return Err(SealError::Store(format!(
                    "row index gap before row {}",
                    row_index
                )));
            }
            let cells: Vec<String> = serde_json::from_str(&cells_json)?;
            table.push(cells);
        }

        Ok(table)
    }

    fn load_row(conn: &Connection, row: u32) -> Result<Vec<String>> {
        let cells_json: Option<String> = conn
            .query_row(
                "SELECT cells FROM sheet_rows WHERE row_index = ?1",
                params![row],
                |r| r.get(0),
            )
            .optional()?;

        match cells_json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(SealError::RowOutOfRange(row)),
        }
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn append_row(&self, cells: Vec<String>) -> Result<()> {
        let conn = self.get_conn()?;
        let cells_json = serde_json::to_string(&cells)?;

        conn.execute(
            "INSERT INTO sheet_rows (row_index, cells)
             VALUES ((SELECT COALESCE(MAX(row_index), 0) + 1 FROM sheet_rows), ?1)",
            params![cells_json],
        )?;

        Ok(())
    }

    async fn read_column(&self, column: u32) -> Result<Vec<String>> {
        if column == 0 {
            return Err(SealError::InvalidRequest("column index is 1-based".to_string()));
        }

        Ok(self
            .load_rows()?
            .into_iter()
            .map(|mut row| {
                if row.len() >= column as usize {
                    row.swap_remove(column as usize - 1)
                } else {
                    String::new()
                }
            })
            .collect())
    }

    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>> {
        self.load_rows()
    }

    async fn read_cell(&self, row: u32, column: u32) -> Result<String> {
        if column == 0 {
            return Err(SealError::InvalidRequest("column index is 1-based".to_string()));
        }

        let conn = self.get_conn()?;
        let cells = Self::load_row(&conn, row)?;
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

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut cells = Self::load_row(&tx, row)?;
        splice_cells(&mut cells, start_column, values);

        tx.execute(
            "UPDATE sheet_rows SET cells = ?1 WHERE row_index = ?2",
            params![serde_json::to_string(&cells)?, row],
        )?;
        tx.commit()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TOTAL_COLUMNS;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_sqlite_store_seeds_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SqliteRowStore::open(temp_dir.path().join("rows.db")).unwrap();

        let rows = store.read_all_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), TOTAL_COLUMNS as usize);

        // Reopening must not duplicate the header.
        let store = SqliteRowStore::open(temp_dir.path().join("rows.db")).unwrap();
        assert_eq!(store.read_all_rows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_store_append_and_update() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SqliteRowStore::open(temp_dir.path().join("nested/rows.db")).unwrap();

        store.append_row(cells(&["a", "b"])).await.unwrap();
        store.append_row(cells(&["c", "d", "e"])).await.unwrap();

        let column = store.read_column(3).await.unwrap();
        assert_eq!(column.len(), 3);
        assert_eq!(column[1], "");
        assert_eq!(column[2], "e");

        store
            .write_range(2, 3, 4, cells(&["x", "y"]))
            .await
            .unwrap();
        assert_eq!(store.read_cell(2, 1).await.unwrap(), "a");
        assert_eq!(store.read_cell(2, 4).await.unwrap(), "y");
        assert_eq!(store.read_cell(2, 9).await.unwrap(), "");

        assert!(matches!(
            store.read_cell(7, 1).await,
            Err(SealError::RowOutOfRange(7))
        ));
        assert!(matches!(
            store.write_range(7, 1, 1, cells(&["z"])).await,
            Err(SealError::RowOutOfRange(7))
        ));
    }
}

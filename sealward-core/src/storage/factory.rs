use super::{MemoryRowStore, RowStore, SqliteRowStore};
use crate::{Result, SealError};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RowStoreBuilder {
    backend: Option<String>,
    sqlite_path: Option<PathBuf>,
}

impl RowStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn sqlite_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sqlite_path = Some(path.into());
        self
    }

    fn resolve_backend(&self) -> Result<String> {
        let backend = self
            .backend
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if backend.is_empty() {
            return Err(SealError::Config(
                "row store backend cannot be empty".to_string(),
            ));
        }

        Ok(backend)
    }

    pub fn build(&self) -> Result<Arc<dyn RowStore>> {
        let backend = self.resolve_backend()?;

        match backend.as_str() {
            "memory" => Ok(Arc::new(MemoryRowStore::new())),
            "sqlite" => {
                let path = self.sqlite_path.clone().ok_or_else(|| {
                    SealError::Config("sqlite path is required for sqlite backend".to_string())
                })?;

                if path.as_os_str().is_empty() {
                    return Err(SealError::Config(
                        "sqlite path cannot be empty for sqlite backend".to_string(),
                    ));
                }

                let store = SqliteRowStore::open(path)?;
                Ok(Arc::new(store))
            }
            other => Err(SealError::Config(format!(
                "unsupported row store backend: {}",
                other
            ))),
        }
    }
}

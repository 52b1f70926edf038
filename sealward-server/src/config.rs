use sealward_core::{
    BlobResolverBuilder, RegisterDepartureSettings, Result, RowStoreBuilder, SealError,
    SealUniqueness,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    pub store: StoreConfig,
    #[serde(default)]
    pub blobs: BlobConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

/// Row store backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobConfig {
    #[serde(default)]
    pub link_template: Option<String>,
    #[serde(default)]
    pub permission_grant: Option<PermissionGrantConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGrantConfig {
    pub api_base: String,
    #[serde(default)]
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_void_seal_prefix")]
    pub void_seal_prefix: String,
    #[serde(default)]
    pub seal_uniqueness: SealUniqueness,
}

fn default_void_seal_prefix() -> String {
    sealward_core::schema::DEFAULT_VOID_SEAL_PREFIX.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            void_seal_prefix: default_void_seal_prefix(),
            seal_uniqueness: SealUniqueness::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .add_source(::config::Environment::with_prefix("SEALWARD").separator("__"))
            .build()
            .map_err(|e| SealError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| SealError::Config(e.to_string()))?;

        Ok(config)
    }

    pub fn row_store_builder(&self) -> RowStoreBuilder {
        let builder = RowStoreBuilder::new().backend(self.store.backend.as_str());
        match &self.store.sqlite_path {
            Some(path) => builder.sqlite_path(path.clone()),
            None => builder,
        }
    }

    pub fn blob_resolver_builder(&self) -> BlobResolverBuilder {
        let mut builder = BlobResolverBuilder::new();
        if let Some(template) = &self.blobs.link_template {
            builder = builder.link_template(template.clone());
        }
        if let Some(grant) = &self.blobs.permission_grant {
            builder = builder.permission_grant(grant.api_base.clone(), grant.bearer_token.clone());
        }
        builder
    }

    pub fn register_settings(&self) -> RegisterDepartureSettings {
        RegisterDepartureSettings {
            void_seal_prefix: self.registry.void_seal_prefix.clone(),
            seal_uniqueness: self.registry.seal_uniqueness,
        }
    }
}

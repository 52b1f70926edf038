//! Resolution of uploaded-file handles into public links.

use crate::{Result, SealError};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

pub const DEFAULT_LINK_TEMPLATE: &str = "https://drive.google.com/uc?export=view&id={id}";

/// Stored in place of a link when resolution fails.
pub const LINK_RESOLUTION_FAILED: &str = "LINK_RESOLUTION_FAILED";

/// Handle of a file the client already uploaded to blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl FileHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Reads a photo field sent either as a single handle or as a list of handles.
///
/// Browser forms post file inputs as lists, so only the first entry is kept.
pub fn deserialize_optional_handle<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<FileHandle>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HandleField {
        One(FileHandle),
        Many(Vec<FileHandle>),
    }

    Ok(match Option::<HandleField>::deserialize(deserializer)? {
        Some(HandleField::One(handle)) => Some(handle),
        Some(HandleField::Many(handles)) => handles.into_iter().next(),
        None => None,
    })
}

#[async_trait]
pub trait BlobResolver: Send + Sync {
    async fn resolve(&self, handle: &FileHandle) -> Result<String>;
}

/// Resolves an optional handle without ever failing.
///
/// An absent handle yields "", a resolver error yields [`LINK_RESOLUTION_FAILED`].
pub async fn resolve_reference(resolver: &dyn BlobResolver, handle: Option<&FileHandle>) -> String {
    let Some(handle) = handle.filter(|h| !h.id.trim().is_empty()) else {
        return String::new();
    };

    match resolver.resolve(handle).await {
        Ok(link) => link,
        Err(error) => {
            tracing::warn!("Failed to resolve link for file {}: {}", handle.id, error);
            LINK_RESOLUTION_FAILED.to_string()
        }
    }
}

/// Builds a link by substituting the handle id into a URL template.
#[derive(Debug, Clone)]
pub struct LinkTemplateResolver {
    template: String,
}

impl LinkTemplateResolver {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains("{id}") {
            return Err(SealError::Config(format!(
                "link template must contain {{id}}: {}",
                template
            )));
        }
        Ok(Self { template })
    }

    pub fn link_for(&self, id: &str) -> String {
        self.template.replace("{id}", id.trim())
    }
}

impl Default for LinkTemplateResolver {
    fn default() -> Self {
        Self {
            template: DEFAULT_LINK_TEMPLATE.to_string(),
        }
    }
}

#[async_trait]
impl BlobResolver for LinkTemplateResolver {
    async fn resolve(&self, handle: &FileHandle) -> Result<String> {
        Ok(self.link_for(&handle.id))
    }
}

/// Grants public read access on the file, then returns its templated link.
#[derive(Debug, Clone)]
pub struct PermissionGrantResolver {
    client: reqwest::Client,
    api_base: String,
    bearer_token: Option<String>,
    links: LinkTemplateResolver,
}

impl PermissionGrantResolver {
    pub fn new(
        api_base: impl Into<String>,
        bearer_token: Option<String>,
        links: LinkTemplateResolver,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bearer_token,
            links,
        }
    }
}

#[async_trait]
impl BlobResolver for PermissionGrantResolver {
    async fn resolve(&self, handle: &FileHandle) -> Result<String> {
        let url = format!("{}/files/{}/permissions", self.api_base, handle.id.trim());

        let mut request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "role": "reader", "type": "anyone" }));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| SealError::Http(error.to_string()))?;

        if !response.status().is_success() {
            return Err(SealError::Http(format!(
                "permission grant for {} failed with status {}",
                handle.id,
                response.status()
            )));
        }

        Ok(self.links.link_for(&handle.id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlobResolverBuilder {
    link_template: Option<String>,
    grant_api_base: Option<String>,
    bearer_token: Option<String>,
}

impl BlobResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_template(mut self, template: impl Into<String>) -> Self {
        self.link_template = Some(template.into());
        self
    }

    pub fn permission_grant(mut self, api_base: impl Into<String>, bearer_token: Option<String>) -> Self {
        self.grant_api_base = Some(api_base.into());
        self.bearer_token = bearer_token;
        self
    }

    pub fn build(&self) -> Result<Arc<dyn BlobResolver>> {
        let links = match self.link_template.as_deref() {
            Some(template) => LinkTemplateResolver::new(template)?,
            None => LinkTemplateResolver::default(),
        };

        match self.grant_api_base.as_deref().map(str::trim) {
            None => Ok(Arc::new(links)),
            Some("") => Err(SealError::Config(
                "permission grant api base cannot be empty".to_string(),
            )),
            Some(api_base) => Ok(Arc::new(PermissionGrantResolver::new(
                api_base,
                self.bearer_token.clone(),
                links,
            ))),
        }
    }
}

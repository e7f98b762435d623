// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tenant content storage

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

/// Page served for a tenant
pub const INDEX_FILE: &str = "index.html";
/// Sub-directory of a tenant holding its media files
pub const FILES_DIR: &str = "files";

const ASSETS_START: &str = "<!--assets-->";
const ASSETS_END: &str = "<!--/assets-->";

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("wiki '{0}' has no page to serve")]
    Missing(String),

    #[error("reading wiki '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Opaque store of rendered tenant content, keyed by tenant name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Whether content exists for `name`
    async fn tenant_exists(&self, name: &str) -> bool;

    /// Render the tenant's page
    async fn render_tenant(
        &self,
        name: &str,
        include_embedded_assets: bool,
    ) -> Result<String, ContentError>;

    /// Directory of the tenant
    fn tenant_path(&self, name: &str) -> PathBuf;

    /// Directory of the tenant's media files
    fn files_root(&self, name: &str) -> PathBuf {
        self.tenant_path(name).join(FILES_DIR)
    }
}

/// One directory per tenant below `wikis_dir`, each with an `index.html`
#[derive(Debug, Clone)]
pub struct FsContentStore {
    wikis_dir: PathBuf,
}

impl FsContentStore {
    pub fn new(wikis_dir: impl Into<PathBuf>) -> Self {
        Self {
            wikis_dir: wikis_dir.into(),
        }
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn tenant_exists(&self, name: &str) -> bool {
        tokio::fs::metadata(self.tenant_path(name))
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn render_tenant(
        &self,
        name: &str,
        include_embedded_assets: bool,
    ) -> Result<String, ContentError> {
        let index = self.tenant_path(name).join(INDEX_FILE);
        let html = match tokio::fs::read_to_string(&index).await {
            Ok(html) => html,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ContentError::Missing(name.to_string()));
            }
            Err(source) => {
                return Err(ContentError::Io {
                    name: name.to_string(),
                    source,
                });
            }
        };

        if include_embedded_assets {
            Ok(html)
        } else {
            Ok(strip_embedded_assets(&html))
        }
    }

    fn tenant_path(&self, name: &str) -> PathBuf {
        self.wikis_dir.join(name)
    }
}

/// Remove the section between the asset markers, markers included
pub fn strip_embedded_assets(html: &str) -> String {
    let Some(start) = html.find(ASSETS_START) else {
        return html.to_string();
    };
    let Some(end) = html[start..].find(ASSETS_END) else {
        return html.to_string();
    };
    let end = start + end + ASSETS_END.len();

    let mut out = String::with_capacity(html.len() - (end - start));
    out.push_str(&html[..start]);
    out.push_str(&html[end..]);
    out
}

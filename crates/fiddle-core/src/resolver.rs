//! Fiddle resolution pipeline.
//!
//! Turns a request (identifier and version, inline source, or nothing) into
//! [`ResolvedFiddleData`] ready for the editor.
//!
//! ```text
//! id == ""  ──► inline source | default template ──► annotations::parse ──► data
//! id != ""  ──► find_fiddle ──┬─ failed ──────────────────────────────► FiddleNotFound
//!                             ├─ owner anonymous ─────────────────────► data (no author)
//!                             └─ owner known ──► find_user ──┬─ ok ───► data (author)
//!                                                            └─ failed ► data (no author)
//! ```
//!
//! Every lookup is bounded by [`ResolverConfig::lookup_timeout`]. The user
//! lookup is only issued once the fiddle lookup has succeeded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::annotations;
use crate::catalog::{CatalogHandle, LibraryCatalog};
use crate::codec;
use crate::error::{Error, LookupError, Result};
use crate::library::Library;
use crate::store::{FiddleStore, UserIdentity};

/// Template served when no fiddle or inline source is requested.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.scala");

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Raw source used when nothing else is supplied.
    pub default_template: String,
    /// Language-version tag for unsaved fiddles.
    pub default_version: String,
    /// Upper bound on each store lookup.
    pub lookup_timeout: Duration,
    /// Display name for authors without a stored name.
    pub anonymous_name: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_template: DEFAULT_TEMPLATE.to_string(),
            default_version: "2.12".to_string(),
            lookup_timeout: Duration::from_secs(5),
            anonymous_name: "Anonymous".to_string(),
        }
    }
}

/// Author shown alongside a saved fiddle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    /// Whether this is the user currently browsing. Always false here.
    pub logged_in: bool,
}

impl AuthorInfo {
    fn from_identity(user: UserIdentity, placeholder: &str) -> Self {
        Self {
            id: user.id,
            name: user.name.unwrap_or_else(|| placeholder.to_string()),
            avatar: user.avatar,
            logged_in: false,
        }
    }
}

/// Fiddle ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFiddleData {
    pub name: String,
    pub description: String,
    pub source_code: String,
    /// Libraries this fiddle uses.
    pub libraries: Vec<Library>,
    /// Every library in the catalog, for the editor's library picker.
    pub available: Vec<Library>,
    pub scala_version: String,
    pub author: Option<AuthorInfo>,
}

/// Resolves fiddle requests against a store and the library catalog.
pub struct FiddleResolver {
    store: Arc<dyn FiddleStore>,
    catalog: Arc<CatalogHandle>,
    config: ResolverConfig,
}

impl FiddleResolver {
    /// Create a resolver.
    pub fn new(
        store: Arc<dyn FiddleStore>,
        catalog: Arc<CatalogHandle>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// The resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The catalog handle shared with this resolver.
    pub fn catalog(&self) -> &Arc<CatalogHandle> {
        &self.catalog
    }

    /// Resolve a fiddle.
    ///
    /// An empty `id` never touches the store: `inline_source` (or the default
    /// template) is parsed instead. Otherwise the only failure is
    /// [`Error::FiddleNotFound`]; a failed author lookup leaves the author out.
    pub async fn resolve(
        &self,
        id: &str,
        version: u32,
        inline_source: Option<&str>,
    ) -> Result<ResolvedFiddleData> {
        let catalog = self.catalog.snapshot();

        if id.is_empty() {
            let source = inline_source.unwrap_or(&self.config.default_template);
            return Ok(self.unsaved(source, &catalog));
        }

        let record = match self.bounded(self.store.find_fiddle(id, version)).await {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Fiddle {} v{} lookup failed: {}", id, version, e);
                return Err(Error::FiddleNotFound {
                    id: id.to_string(),
                    version,
                });
            }
        };

        let author = if record.is_anonymous() {
            None
        } else {
            match self.bounded(self.store.find_user(&record.owner)).await {
                Ok(user) => Some(AuthorInfo::from_identity(user, &self.config.anonymous_name)),
                Err(e) => {
                    tracing::debug!(
                        "Author {} of fiddle {} unavailable, showing as anonymous: {}",
                        record.owner,
                        id,
                        e
                    );
                    None
                }
            }
        };

        let libraries = catalog.resolve_all(&record.libraries);
        Ok(ResolvedFiddleData {
            name: record.name,
            description: record.description,
            source_code: record.source_code,
            libraries,
            available: catalog.list_all().to_vec(),
            scala_version: record.scala_version,
            author,
        })
    }

    /// Resolve an unsaved fiddle from query parameters.
    ///
    /// The compressed token wins when it decodes; otherwise the plain source
    /// is used, and failing that the default template.
    pub fn resolve_inline(&self, token: Option<&str>, plain: Option<&str>) -> ResolvedFiddleData {
        let decoded = token.and_then(codec::decode);
        let source = decoded
            .as_deref()
            .or(plain)
            .unwrap_or(&self.config.default_template);
        self.unsaved(source, &self.catalog.snapshot())
    }

    fn unsaved(&self, source: &str, catalog: &LibraryCatalog) -> ResolvedFiddleData {
        let (source_code, libraries) = annotations::parse(source, catalog);
        ResolvedFiddleData {
            name: String::new(),
            description: String::new(),
            source_code,
            libraries,
            available: catalog.list_all().to_vec(),
            scala_version: self.config.default_version.clone(),
            author: None,
        }
    }

    async fn bounded<T>(
        &self,
        lookup: impl Future<Output = std::result::Result<T, LookupError>>,
    ) -> std::result::Result<T, LookupError> {
        let limit = self.config.lookup_timeout;
        match tokio::time::timeout(limit, lookup).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(limit)),
        }
    }
}

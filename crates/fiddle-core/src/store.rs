//! Fiddle and user records, and the store interface that serves them.

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, LookupError, Result};

/// Owner id of fiddles saved without an account.
pub const ANONYMOUS_USER: &str = "anonymous";

/// A saved fiddle version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiddleRecord {
    pub id: String,
    pub version: u32,
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub source_code: String,
    #[serde(default)]
    pub libraries: Vec<String>,
    pub scala_version: String,
}

impl FiddleRecord {
    /// Whether the fiddle was saved without an account.
    pub fn is_anonymous(&self) -> bool {
        self.owner == ANONYMOUS_USER
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Asynchronous lookups against persisted fiddles and users.
#[async_trait]
pub trait FiddleStore: Send + Sync {
    /// Fetch one version of a fiddle.
    async fn find_fiddle(
        &self,
        id: &str,
        version: u32,
    ) -> std::result::Result<FiddleRecord, LookupError>;

    /// Fetch a user.
    async fn find_user(&self, id: &str) -> std::result::Result<UserIdentity, LookupError>;
}

/// On-disk layout of a store fixture file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreContents {
    #[serde(default)]
    pub fiddles: Vec<FiddleRecord>,
    #[serde(default)]
    pub users: Vec<UserIdentity>,
}

/// In-memory fiddle store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    fiddles: RwLock<FxHashMap<(String, u32), FiddleRecord>>,
    users: RwLock<FxHashMap<String, UserIdentity>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records.
    pub fn from_contents(contents: StoreContents) -> Self {
        let store = Self::new();
        for fiddle in contents.fiddles {
            store.insert_fiddle(fiddle);
        }
        for user in contents.users {
            store.insert_user(user);
        }
        store
    }

    /// Load a JSON fixture file of the form `{"fiddles": [...], "users": [...]}`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Store(format!("{}: {}", path.display(), e)))?;
        let contents: StoreContents = serde_json::from_str(&json)
            .map_err(|e| Error::Store(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_contents(contents))
    }

    /// Insert or replace a fiddle version.
    pub fn insert_fiddle(&self, fiddle: FiddleRecord) {
        let key = (fiddle.id.clone(), fiddle.version);
        self.fiddles
            .write()
            .expect("fiddle lock poisoned")
            .insert(key, fiddle);
    }

    /// Insert or replace a user.
    pub fn insert_user(&self, user: UserIdentity) {
        self.users
            .write()
            .expect("user lock poisoned")
            .insert(user.id.clone(), user);
    }

    /// Highest stored version of a fiddle.
    pub fn latest_version(&self, id: &str) -> Option<u32> {
        self.fiddles
            .read()
            .expect("fiddle lock poisoned")
            .keys()
            .filter(|(fiddle_id, _)| fiddle_id == id)
            .map(|&(_, version)| version)
            .max()
    }

    /// Number of stored fiddle versions.
    pub fn fiddle_count(&self) -> usize {
        self.fiddles.read().expect("fiddle lock poisoned").len()
    }
}

#[async_trait]
impl FiddleStore for MemoryStore {
    async fn find_fiddle(
        &self,
        id: &str,
        version: u32,
    ) -> std::result::Result<FiddleRecord, LookupError> {
        self.fiddles
            .read()
            .expect("fiddle lock poisoned")
            .get(&(id.to_string(), version))
            .cloned()
            .ok_or(LookupError::Missing)
    }

    async fn find_user(&self, id: &str) -> std::result::Result<UserIdentity, LookupError> {
        self.users
            .read()
            .expect("user lock poisoned")
            .get(id)
            .cloned()
            .ok_or(LookupError::Missing)
    }
}

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::{config, session::StoreError, types::TokenPair};

/// Key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "spotify_access_token";
/// Key under which the refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "spotify_refresh_token";

type Entries = BTreeMap<String, String>;

/// Where the session keeps its token pair between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError>;
    async fn save(&self, tokens: &TokenPair) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        (**self).load().await
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        (**self).save(tokens).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        (**self).clear().await
    }
}

fn pair_from_entries(entries: &Entries) -> Option<TokenPair> {
    let access_token = entries.get(ACCESS_TOKEN_KEY)?.clone();
    Some(TokenPair {
        access_token,
        refresh_token: entries.get(REFRESH_TOKEN_KEY).cloned(),
    })
}

fn write_pair(entries: &mut Entries, tokens: &TokenPair) {
    entries.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token.clone());
    match &tokens.refresh_token {
        Some(refresh) => {
            entries.insert(REFRESH_TOKEN_KEY.to_string(), refresh.clone());
        }
        None => {
            entries.remove(REFRESH_TOKEN_KEY);
        }
    }
}

fn remove_pair(entries: &mut Entries) {
    entries.remove(ACCESS_TOKEN_KEY);
    entries.remove(REFRESH_TOKEN_KEY);
}

/// In-process store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<Entries>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: &TokenPair) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            write_pair(&mut entries, tokens);
        }
        store
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, Entries>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        Ok(pair_from_entries(&*self.entries()?))
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        write_pair(&mut *self.entries()?, tokens);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        remove_pair(&mut *self.entries()?);
        Ok(())
    }
}

/// Store backed by a small JSON key/value file, by default
/// `<data dir>/playlist-viewer/session.json`.
///
/// Other keys found in the file are preserved on save and clear.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        config::data_dir().join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, StoreError> {
        match async_fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        Ok(pair_from_entries(&self.read_entries().await?))
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        let mut entries = self.read_entries().await?;
        write_pair(&mut entries, tokens);
        self.write_entries(&entries).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(StoreError::Serde(e)) => {
                tracing::warn!(path = %self.path.display(), "removing unreadable session file: {}", e);
                return Ok(async_fs::remove_file(&self.path).await?);
            }
            Err(e) => return Err(e),
        };
        if entries.is_empty() {
            return Ok(());
        }
        remove_pair(&mut entries);
        self.write_entries(&entries).await
    }
}

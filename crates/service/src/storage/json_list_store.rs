use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info, warn};

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered collection.
///
/// The whole list lives in memory and is rewritten to `file_path` as an indented
/// JSON array after every mutation. Mutations run on a working copy under the
/// write lock; the copy replaces the live list only once the file write has
/// succeeded, so memory never runs ahead of disk.
pub struct JsonListStore<V> {
    inner: RwLock<Vec<V>>,
    file_path: PathBuf,
}

impl<V> JsonListStore<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Load the collection from `path`.
    ///
    /// A missing file yields an empty collection. An unreadable or malformed file
    /// is logged and also yields an empty collection; startup never fails here.
    pub async fn load<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file_path = path.into();
        let items: Vec<V> = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(items) => items,
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "malformed store file; starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %file_path.display(), "no store file yet; starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "cannot read store file; starting empty");
                Vec::new()
            }
        };
        info!(path = %file_path.display(), count = items.len(), "store loaded");
        Arc::new(Self { inner: RwLock::new(items), file_path })
    }

    /// Snapshot of all items in order.
    pub async fn list(&self) -> Vec<V> {
        self.inner.read().await.clone()
    }

    /// First item matching `pred`.
    pub async fn find<F>(&self, pred: F) -> Option<V>
    where
        F: Fn(&V) -> bool,
    {
        let items = self.inner.read().await;
        items.iter().find(|v| pred(v)).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Apply a mutation and persist the whole collection.
    ///
    /// If `f` fails nothing is written and the live list is untouched. If the
    /// write fails the mutation is discarded and `ServiceError::Persistence` is
    /// returned.
    pub async fn mutate<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Vec<V>) -> Result<T, ServiceError>,
    {
        let mut items = self.inner.write().await;
        let mut working = items.clone();
        let out = f(&mut working)?;
        persist(&self.file_path, &working).await?;
        *items = working;
        Ok(out)
    }
}

async fn persist<V: Serialize>(path: &Path, items: &[V]) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::Persistence(e.to_string()))?;
    fs::write(path, data).await.map_err(|e| ServiceError::Persistence(e.to_string()))?;
    debug!(path = %path.display(), count = items.len(), "store persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_list_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn json_list_store_mutations_persist() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonListStore::<String>::load(&tmp).await;
        assert!(store.is_empty().await);
        // Loading alone does not create the file.
        assert!(fs::metadata(&tmp).await.is_err());

        store.mutate(|v| { v.push("a".into()); Ok(()) }).await?;
        store.mutate(|v| { v.push("b".into()); Ok(()) }).await?;
        assert_eq!(store.find(|s| s == "b").await.as_deref(), Some("b"));

        let removed = store
            .mutate(|v| {
                let idx = v.iter().position(|s| s == "a").ok_or_else(|| ServiceError::not_found("a"))?;
                Ok(v.remove(idx))
            })
            .await?;
        assert_eq!(removed, "a");

        let reloaded = JsonListStore::<String>::load(&tmp).await;
        assert_eq!(reloaded.list().await, vec!["b".to_string()]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn file_is_indented_json_array() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonListStore::<serde_json::Value>::load(&tmp).await;
        store.mutate(|v| { v.push(serde_json::json!({"id": "u1"})); Ok(()) }).await?;
        let text = fs::read_to_string(&tmp).await?;
        assert_eq!(text, "[\n  {\n    \"id\": \"u1\"\n  }\n]");
        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_closure_writes_nothing() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonListStore::<String>::load(&tmp).await;
        let res: Result<(), _> = store
            .mutate(|v| {
                v.push("x".into());
                Err(ServiceError::not_found("x"))
            })
            .await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(store.is_empty().await);
        assert!(fs::metadata(&tmp).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_loads_empty() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        fs::write(&tmp, b"{ not json").await?;
        let store = JsonListStore::<String>::load(&tmp).await;
        assert!(store.is_empty().await);
        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_failure_rolls_back() -> Result<(), anyhow::Error> {
        // A directory cannot be read or written as a file.
        let dir = std::env::temp_dir().join(format!("json_list_store_dir_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).await?;
        let store = JsonListStore::<String>::load(&dir).await;
        assert!(store.is_empty().await);

        let res = store.mutate(|v| { v.push("a".into()); Ok(()) }).await;
        assert!(matches!(res, Err(ServiceError::Persistence(_))));
        assert!(store.is_empty().await);

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }
}

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use models::UserRecord;

use crate::errors::ServiceError;
use crate::storage::json_list_store::JsonListStore;

/// Check run against a merged record before an update is committed.
pub type MergeCheck<'a> = &'a (dyn Fn(&UserRecord) -> Result<(), ServiceError> + Send + Sync);

/// Storage seam for the user collection.
///
/// Every mutating call is atomic with respect to the others and reports success
/// only after the collection has been persisted.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Vec<UserRecord>;
    async fn find_by_id(&self, id: &str) -> Option<UserRecord>;
    async fn append(&self, user: UserRecord) -> Result<UserRecord, ServiceError>;
    /// Shallow-merge `patch` onto the record keyed `id`; `check` may veto the result.
    /// A patch `id` re-keys the record.
    async fn replace_fields(&self, id: &str, patch: UserRecord, check: MergeCheck<'_>) -> Result<UserRecord, ServiceError>;
    async fn remove_by_id(&self, id: &str) -> Result<UserRecord, ServiceError>;
}

/// JSON file-backed repository.
pub struct FileUserRepository {
    store: Arc<JsonListStore<UserRecord>>,
    reject_duplicate_ids: bool,
}

impl FileUserRepository {
    /// Load the collection from `path`; see [`JsonListStore::load`].
    pub async fn load<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let store = JsonListStore::load(path).await;
        Arc::new(Self { store, reject_duplicate_ids: false })
    }

    /// Load with duplicate-key rejection switched on or off.
    pub async fn load_with<P: Into<PathBuf>>(path: P, reject_duplicate_ids: bool) -> Arc<Self> {
        let store = JsonListStore::load(path).await;
        Arc::new(Self { store, reject_duplicate_ids })
    }
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn list(&self) -> Vec<UserRecord> {
        self.store.list().await
    }

    async fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.store.find(|u| u.matches_id(id)).await
    }

    async fn append(&self, user: UserRecord) -> Result<UserRecord, ServiceError> {
        let reject = self.reject_duplicate_ids;
        self.store
            .mutate(move |users| {
                if reject {
                    if let Some(id) = user.id() {
                        if users.iter().any(|u| u.matches_id(id)) {
                            return Err(ServiceError::Conflict(id.to_string()));
                        }
                    }
                }
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    async fn replace_fields(&self, id: &str, patch: UserRecord, check: MergeCheck<'_>) -> Result<UserRecord, ServiceError> {
        let reject = self.reject_duplicate_ids;
        self.store
            .mutate(|users| {
                let idx = users
                    .iter()
                    .position(|u| u.matches_id(id))
                    .ok_or_else(|| ServiceError::not_found(id))?;
                let mut merged = users[idx].clone();
                merged.merge(patch);
                check(&merged)?;
                if reject {
                    if let Some(new_id) = merged.id().filter(|new_id| *new_id != id) {
                        if users.iter().any(|u| u.matches_id(new_id)) {
                            return Err(ServiceError::Conflict(new_id.to_string()));
                        }
                    }
                }
                users[idx] = merged.clone();
                Ok(merged)
            })
            .await
    }

    async fn remove_by_id(&self, id: &str) -> Result<UserRecord, ServiceError> {
        self.store
            .mutate(|users| {
                let idx = users
                    .iter()
                    .position(|u| u.matches_id(id))
                    .ok_or_else(|| ServiceError::not_found(id))?;
                Ok(users.remove(idx))
            })
            .await
    }
}

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use models::store::{NewStore, Store, StoreFilter, StoreId, StorePatch};

use crate::errors::ServiceError;
use crate::store::repository::StoreRepository;

/// JSON-file-backed document store for `Store` records.
///
/// Persists a `HashMap<StoreId, Store>` to a single JSON file, rewriting the
/// whole collection after each mutation. Intended for deployments where a
/// full document database is overkill; writers serialize through the lock.
#[derive(Clone)]
pub struct JsonStoreRepository {
    inner: Arc<RwLock<HashMap<StoreId, Store>>>,
    file_path: PathBuf,
}

impl JsonStoreRepository {
    /// Open the store from a path. Creates the file with an empty collection
    /// if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<StoreId, Store> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<StoreId, Store> = HashMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        debug!(path = %file_path.display(), count = map.len(), "opened store collection");
        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl StoreRepository for JsonStoreRepository {
    async fn insert(&self, input: NewStore) -> Result<Store, ServiceError> {
        let doc = Store::from_new(input);
        doc.validate()?;
        let mut map = self.inner.write().await;
        map.insert(doc.id, doc.clone());
        drop(map);
        self.save().await?;
        Ok(doc)
    }

    async fn find_by_id(&self, id: StoreId) -> Result<Option<Store>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(&id).cloned())
    }

    async fn find(&self, filter: &StoreFilter) -> Result<Vec<Store>, ServiceError> {
        let map = self.inner.read().await;
        let mut hits: Vec<Store> = map.values().filter(|s| filter.matches(s)).cloned().collect();
        // Insertion order is the collection's natural order.
        hits.sort_by_key(|s| s.created_at);
        Ok(hits)
    }

    async fn update(&self, id: StoreId, patch: StorePatch) -> Result<Store, ServiceError> {
        let mut map = self.inner.write().await;
        let existing = map.get_mut(&id).ok_or_else(|| ServiceError::not_found("store"))?;
        let mut candidate = existing.clone();
        candidate.apply(patch);
        candidate.validate()?;
        *existing = candidate.clone();
        drop(map);
        self.save().await?;
        Ok(candidate)
    }

    async fn delete(&self, id: StoreId) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(&id).is_some();
        drop(map);
        self.save().await?;
        Ok(existed)
    }
}

use async_trait::async_trait;

use models::store::{NewStore, Store, StoreFilter, StoreId, StorePatch};

use crate::errors::ServiceError;

/// Repository abstraction over the store document collection.
///
/// `update` applies the patch to the stored document, re-runs schema
/// validation on the merged result and returns the post-update document;
/// a miss is `ServiceError::NotFound`. `delete` reports whether a document
/// was actually removed.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn insert(&self, input: NewStore) -> Result<Store, ServiceError>;
    async fn find_by_id(&self, id: StoreId) -> Result<Option<Store>, ServiceError>;
    async fn find(&self, filter: &StoreFilter) -> Result<Vec<Store>, ServiceError>;
    async fn update(&self, id: StoreId, patch: StorePatch) -> Result<Store, ServiceError>;
    async fn delete(&self, id: StoreId) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockStoreRepository {
        docs: Mutex<HashMap<StoreId, Store>>,
    }

    #[async_trait]
    impl StoreRepository for MockStoreRepository {
        async fn insert(&self, input: NewStore) -> Result<Store, ServiceError> {
            let doc = Store::from_new(input);
            doc.validate()?;
            let mut docs = self.docs.lock().unwrap();
            docs.insert(doc.id, doc.clone());
            Ok(doc)
        }

        async fn find_by_id(&self, id: StoreId) -> Result<Option<Store>, ServiceError> {
            let docs = self.docs.lock().unwrap();
            Ok(docs.get(&id).cloned())
        }

        async fn find(&self, filter: &StoreFilter) -> Result<Vec<Store>, ServiceError> {
            let docs = self.docs.lock().unwrap();
            let mut hits: Vec<Store> =
                docs.values().filter(|s| filter.matches(s)).cloned().collect();
            hits.sort_by_key(|s| s.created_at);
            Ok(hits)
        }

        async fn update(&self, id: StoreId, patch: StorePatch) -> Result<Store, ServiceError> {
            let mut docs = self.docs.lock().unwrap();
            let existing = docs.get_mut(&id).ok_or_else(|| ServiceError::not_found("store"))?;
            let mut candidate = existing.clone();
            candidate.apply(patch);
            candidate.validate()?;
            *existing = candidate.clone();
            Ok(candidate)
        }

        async fn delete(&self, id: StoreId) -> Result<bool, ServiceError> {
            let mut docs = self.docs.lock().unwrap();
            Ok(docs.remove(&id).is_some())
        }
    }
}

//! A process-local store, used for dry runs.

use std::{sync::Arc, time::SystemTime};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;

use super::{
    ApprovalLookup, CollectionReference, DocumentReference, DocumentStore, FieldValue, Record,
    RequestedItem, StoreConnector,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Full path of the document, e.g. `approvals/8hT2...`.
    pub path: String,
    pub id: String,
    /// The written fields with server timestamps already resolved.
    pub fields: Record,
    pub create_time: SystemTime,
}

/// Clones share the same underlying documents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<Mutex<Vec<StoredDocument>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document at the given reference, failing if one already
    /// exists there.
    pub async fn create_document_at_ref(
        &self,
        doc_ref: &DocumentReference,
        record: &Record,
    ) -> Result<String, StoreError> {
        let path = doc_ref.to_string();
        let mut documents = self.documents.lock().await;

        if documents.iter().any(|d| d.path == path) {
            return Err(StoreError::DocumentAlreadyExists(format!(
                "Document already exists: {path}"
            )));
        }

        let commit_time = SystemTime::now();
        documents.push(StoredDocument {
            path,
            id: doc_ref.id().to_string(),
            fields: record.resolve_server_timestamps(commit_time),
            create_time: commit_time,
        });

        Ok(doc_ref.id().to_string())
    }

    /// Snapshot of every document, in write order.
    pub async fn documents(&self) -> Vec<StoredDocument> {
        self.documents.lock().await.clone()
    }

    pub async fn documents_in(&self, collection: &CollectionReference) -> Vec<StoredDocument> {
        let prefix = format!("{collection}/");
        self.documents
            .lock()
            .await
            .iter()
            .filter(|d| {
                d.path
                    .strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn add_document(
        &mut self,
        collection: &CollectionReference,
        record: &Record,
    ) -> Result<String, StoreError> {
        self.create_document_at_ref(&collection.auto_doc(), record)
            .await
    }
}

#[async_trait]
impl ApprovalLookup for InMemoryStore {
    async fn approvals_requested_by(
        &mut self,
        collection: &CollectionReference,
        requested_by: &str,
    ) -> Result<Vec<RequestedItem>, StoreError> {
        let items = self
            .documents_in(collection)
            .await
            .into_iter()
            .filter(|d| {
                d.fields.get("requestedBy").and_then(FieldValue::as_str) == Some(requested_by)
            })
            .filter_map(|d| {
                Some(RequestedItem {
                    item_name: d.fields.get("itemName")?.as_str()?.to_string(),
                    status: d.fields.get("status")?.as_str()?.to_string(),
                })
            })
            .collect();

        Ok(items)
    }
}

/// Hands out handles to one shared [`InMemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    store: InMemoryStore,
}

impl InMemoryConnector {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }
}

#[async_trait]
impl StoreConnector for InMemoryConnector {
    type Store = InMemoryStore;

    async fn open(&self) -> Result<Self::Store, StoreError> {
        tracing::debug!("Opening in-memory document store");
        Ok(self.store.clone())
    }

    async fn close(&self, store: Option<Self::Store>) {
        let documents = self.store.len().await;
        tracing::debug!(
            documents,
            opened = store.is_some(),
            "Closing in-memory document store"
        );
    }
}

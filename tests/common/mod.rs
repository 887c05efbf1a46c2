#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use approvals_seeder::{
    error::StoreError,
    store::{
        ApprovalLookup, CollectionReference, DocumentStore, FieldValue, Record, RequestedItem,
        StoreConnector,
    },
};
use async_trait::async_trait;

/// Records every call and fails on the catalog positions listed in
/// `fail_at`.
#[derive(Clone, Default)]
pub struct ScriptedStore {
    calls: Arc<Mutex<Vec<(String, Record)>>>,
    fail_at: Vec<usize>,
}

impl ScriptedStore {
    pub fn failing_at(fail_at: Vec<usize>) -> Self {
        Self {
            fail_at,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Record)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn add_document(
        &mut self,
        collection: &CollectionReference,
        record: &Record,
    ) -> Result<String, StoreError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push((collection.to_string(), record.clone()));

        if self.fail_at.contains(&index) {
            return Err(StoreError::Other(anyhow::anyhow!("quota exceeded")));
        }
        Ok(format!("doc-{index}"))
    }
}

#[derive(Default)]
pub struct ScriptedConnector {
    pub store: ScriptedStore,
    pub refuse_to_open: bool,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub closed_unopened: AtomicUsize,
}

impl ScriptedConnector {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn closed_unopened(&self) -> usize {
        self.closed_unopened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnector for ScriptedConnector {
    type Store = ScriptedStore;

    async fn open(&self) -> Result<Self::Store, StoreError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.refuse_to_open {
            return Err(StoreError::Unauthenticated("no credentials".to_string()));
        }
        Ok(self.store.clone())
    }

    async fn close(&self, store: Option<Self::Store>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if store.is_none() {
            self.closed_unopened.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub fn item_names(records: &[(String, Record)]) -> Vec<String> {
    records
        .iter()
        .map(|(_, r)| r.get("itemName").and_then(FieldValue::as_str).unwrap().to_string())
        .collect()
}


#[async_trait]
impl ApprovalLookup for ScriptedStore {
    async fn approvals_requested_by(
        &mut self,
        collection: &CollectionReference,
        requested_by: &str,
    ) -> Result<Vec<RequestedItem>, StoreError> {
        let items = self
            .calls()
            .into_iter()
            .filter(|(c, r)| {
                c == &collection.to_string()
                    && r.get("requestedBy").and_then(FieldValue::as_str) == Some(requested_by)
            })
            .filter_map(|(_, r)| {
                Some(RequestedItem {
                    item_name: r.get("itemName")?.as_str()?.to_string(),
                    status: r.get("status")?.as_str()?.to_string(),
                })
            })
            .collect();

        Ok(items)
    }
}

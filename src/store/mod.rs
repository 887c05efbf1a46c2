//! The document store capability the seeder writes through.
//!
//! A store only has to know how to add a new document to a collection and
//! hand back the identifier it assigned. Connecting and disconnecting is the
//! job of a [`StoreConnector`], so the seeder can guarantee the connector is
//! released exactly once per run, whether or not the store could be opened.

use async_trait::async_trait;

use crate::error::StoreError;

pub mod memory;
mod record;
pub mod reference;

pub use record::{FieldValue, Record};
pub use reference::{collection, CollectionReference, DocumentReference};

#[async_trait]
pub trait DocumentStore: Send {
    /// Creates a new document in `collection` and returns the ID the store
    /// assigned to it. Never overwrites an existing document.
    async fn add_document(
        &mut self,
        collection: &CollectionReference,
        record: &Record,
    ) -> Result<String, StoreError>;
}

#[async_trait]
pub trait StoreConnector: Sync {
    type Store: DocumentStore;

    async fn open(&self) -> Result<Self::Store, StoreError>;

    /// Releases whatever the connector holds for a run. Called exactly once
    /// per run, with `None` when [`open`](Self::open) failed.
    async fn close(&self, store: Option<Self::Store>);
}

/// An item and its status as found when looking up a requester's approvals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedItem {
    pub item_name: String,
    pub status: String,
}

#[async_trait]
pub trait ApprovalLookup: Send {
    /// Lists the requests in `collection` whose `requestedBy` equals
    /// `requested_by`. Documents missing an item name or status are skipped.
    async fn approvals_requested_by(
        &mut self,
        collection: &CollectionReference,
        requested_by: &str,
    ) -> Result<Vec<RequestedItem>, StoreError>;
}

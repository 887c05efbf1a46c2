use std::sync::Arc;

use rand::{distributions::Alphanumeric, thread_rng, Rng};

const AUTO_ID_LENGTH: usize = 20;

pub fn collection(name: impl Into<String>) -> CollectionReference {
    CollectionReference::new(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReference(Arc<DocumentReferenceInner>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReference(Arc<CollectionReferenceInner>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct CollectionReferenceInner {
    parent: Option<DocumentReference>,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentReferenceInner {
    parent: CollectionReference,
    id: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a collection path; expected an odd number of non-empty segments")]
pub struct InvalidCollectionPath(String);

impl CollectionReference {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self(Arc::new(CollectionReferenceInner {
            parent: None,
            name: collection_name.into(),
        }))
    }

    /// Parses a slash separated path such as `approvals` or
    /// `teams/platform/approvals`.
    pub fn parse(path: &str) -> Result<Self, InvalidCollectionPath> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        if segments.len() % 2 == 0 || segments.iter().any(|s| s.is_empty()) {
            return Err(InvalidCollectionPath(path.to_string()));
        }

        let mut collection = CollectionReference::new(segments[0]);
        for pair in segments[1..].chunks(2) {
            collection = collection.doc(pair[0]).collection(pair[1]);
        }

        Ok(collection)
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentReference {
        DocumentReference(Arc::new(DocumentReferenceInner {
            parent: self.clone(),
            id: id.into(),
        }))
    }

    /// A reference to a new document with a random 20 character ID, the same
    /// shape Firestore uses for the IDs it generates.
    pub fn auto_doc(&self) -> DocumentReference {
        self.doc(generate_auto_id())
    }

    pub fn parent(&self) -> Option<DocumentReference> {
        self.0.parent.clone()
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl DocumentReference {
    pub fn collection(&self, name: impl Into<String>) -> CollectionReference {
        CollectionReference(Arc::new(CollectionReferenceInner {
            parent: Some(self.clone()),
            name: name.into(),
        }))
    }

    pub fn parent(&self) -> CollectionReference {
        self.0.parent.clone()
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }
}

impl std::fmt::Display for CollectionReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0.parent {
            Some(doc) => write!(f, "{}/{}", doc, self.0.name),
            None => write!(f, "{}", self.0.name),
        }
    }
}

impl std::fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0.parent, self.0.id)
    }
}

fn generate_auto_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(AUTO_ID_LENGTH)
        .collect()
}

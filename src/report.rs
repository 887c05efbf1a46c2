use std::fmt;

use crate::error::RecordWriteError;

/// What happened to one catalog entry.
#[derive(Debug)]
pub enum SeedOutcome {
    Created {
        index: usize,
        document_id: String,
        item_name: String,
    },
    Failed {
        index: usize,
        error: RecordWriteError,
    },
}

impl SeedOutcome {
    /// Position of the entry in the catalog.
    pub fn index(&self) -> usize {
        match self {
            SeedOutcome::Created { index, .. } | SeedOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn item_name(&self) -> &str {
        match self {
            SeedOutcome::Created { item_name, .. } => item_name,
            SeedOutcome::Failed { error, .. } => &error.item_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SeedOutcome::Created { .. })
    }

    pub fn document_id(&self) -> Option<&str> {
        match self {
            SeedOutcome::Created { document_id, .. } => Some(document_id),
            SeedOutcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedOutcome::Created {
                document_id,
                item_name,
                ..
            } => write!(f, "Added document with ID: {document_id}, Item: {item_name}"),
            SeedOutcome::Failed { error, .. } => write!(
                f,
                "Error adding document {}: {}",
                error.item_name, error.source
            ),
        }
    }
}

/// Ordered outcomes of one seeding run.
#[derive(Debug)]
pub struct SeedReport {
    collection: String,
    outcomes: Vec<SeedOutcome>,
}

impl SeedReport {
    pub(crate) fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: SeedOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Outcomes in catalog order.
    pub fn outcomes(&self) -> &[SeedOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.created().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn created(&self) -> impl Iterator<Item = &SeedOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SeedOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(SeedOutcome::document_id)
    }

    pub fn summary(&self) -> String {
        format!(
            "Finished populating {}: {} added, {} failed",
            self.collection,
            self.succeeded(),
            self.failed()
        )
    }
}

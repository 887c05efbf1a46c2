//! The catalog of approval request templates to seed.
//!
//! Catalogs are plain JSON fixtures: an array of objects using the same field
//! names as the persisted documents, with timestamp fields set to the literal
//! `"serverTimestamp"`. The built-in sample catalog is embedded in the binary.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    approval::{ApprovalRequest, ApprovalStatus, Decision, InvalidApproval, Timestamp},
    error::CatalogError,
};

const SAMPLE_APPROVALS: &str = include_str!("../data/sample_approvals.json");

/// An ordered, validated list of templates.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<ApprovalRequest>,
}

impl Catalog {
    pub fn new(entries: Vec<ApprovalRequest>) -> Result<Self, CatalogError> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate().map_err(|reason| CatalogError::InvalidEntry {
                index,
                item_name: entry.item_name.clone(),
                reason,
            })?;
        }

        Ok(Self { entries })
    }

    /// The sample approvals shipped with the seeder.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json_str(SAMPLE_APPROVALS)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<CatalogEntry> = serde_json::from_str(json)?;

        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let item_name = entry.item_name.clone();
                entry.into_request().map_err(|reason| CatalogError::InvalidEntry {
                    index,
                    item_name,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(entries)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ApprovalRequest> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ApprovalRequest;
    type IntoIter = std::slice::Iter<'a, ApprovalRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One catalog object as written in the fixture.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CatalogEntry {
    item_name: String,
    status: String,
    requested_by: String,
    requested_at: WriteTime,
    amount: f64,
    approved_by: Option<String>,
    approved_at: Option<WriteTime>,
    rejected_by: Option<String>,
    rejected_at: Option<WriteTime>,
}

/// Fixtures may only ask for the store's commit time.
#[derive(Deserialize, Clone, Copy)]
enum WriteTime {
    #[serde(rename = "serverTimestamp")]
    ServerTimestamp,
}

impl From<WriteTime> for Timestamp {
    fn from(value: WriteTime) -> Self {
        match value {
            WriteTime::ServerTimestamp => Timestamp::ServerTime,
        }
    }
}

impl CatalogEntry {
    fn into_request(self) -> Result<ApprovalRequest, InvalidApproval> {
        let status: ApprovalStatus = self.status.parse()?;

        let approved = self.approved_by.is_some() || self.approved_at.is_some();
        let rejected = self.rejected_by.is_some() || self.rejected_at.is_some();

        let decision = match (
            status,
            self.approved_by,
            self.approved_at,
            self.rejected_by,
            self.rejected_at,
        ) {
            (ApprovalStatus::Pending, ..) if !approved && !rejected => Decision::Pending,
            (ApprovalStatus::Approved, Some(by), Some(at), None, None) => Decision::Approved {
                by,
                at: at.into(),
            },
            (ApprovalStatus::Rejected, None, None, Some(by), Some(at)) => Decision::Rejected {
                by,
                at: at.into(),
            },
            (status, ..) => return Err(decision_mismatch(status)),
        };

        Ok(ApprovalRequest {
            item_name: self.item_name,
            requested_by: self.requested_by,
            requested_at: self.requested_at.into(),
            amount: self.amount,
            decision,
        })
    }
}

fn decision_mismatch(status: ApprovalStatus) -> InvalidApproval {
    let (required, forbidden) = match status {
        ApprovalStatus::Pending => ("(none)", "approvedBy, approvedAt, rejectedBy, rejectedAt"),
        ApprovalStatus::Approved => ("approvedBy, approvedAt", "rejectedBy, rejectedAt"),
        ApprovalStatus::Rejected => ("rejectedBy, rejectedAt", "approvedBy, approvedAt"),
    };

    InvalidApproval::DecisionMismatch {
        status,
        required,
        forbidden,
    }
}

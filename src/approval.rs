//! The approval request entity that gets seeded into the store.

use std::{fmt, str::FromStr, time::SystemTime};

use serde::{Deserialize, Serialize};

use crate::store::{FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = InvalidApproval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(InvalidApproval::UnknownStatus(other.to_string())),
        }
    }
}

/// A point in time as it appears in a template.
///
/// Templates only ever carry [`Timestamp::ServerTime`], a marker meaning
/// "let the store assign its commit time". Resolving the marker is the job of
/// the store backend and never happens on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    ServerTime,
    At(SystemTime),
}

impl From<Timestamp> for FieldValue {
    fn from(timestamp: Timestamp) -> Self {
        match timestamp {
            Timestamp::ServerTime => FieldValue::ServerTimestamp,
            Timestamp::At(at) => FieldValue::Timestamp(at),
        }
    }
}

/// The decision taken on a request. Carrying the decider and decision time
/// inside the variant keeps the decision fields consistent with the status.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Pending,
    Approved { by: String, at: Timestamp },
    Rejected { by: String, at: Timestamp },
}

impl Decision {
    pub fn status(&self) -> ApprovalStatus {
        match self {
            Decision::Pending => ApprovalStatus::Pending,
            Decision::Approved { .. } => ApprovalStatus::Approved,
            Decision::Rejected { .. } => ApprovalStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRequest {
    pub item_name: String,
    pub requested_by: String,
    pub requested_at: Timestamp,
    pub amount: f64,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidApproval {
    #[error("item name must not be empty")]
    EmptyItemName,

    #[error("requester must not be empty")]
    EmptyRequester,

    #[error("amount must be a finite, non-negative number but was {0}")]
    InvalidAmount(f64),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("status '{status}' requires fields {required} and forbids fields {forbidden}")]
    DecisionMismatch {
        status: ApprovalStatus,
        required: &'static str,
        forbidden: &'static str,
    },

    #[error("decider must not be empty")]
    EmptyDecider,

    #[error("'{0}' must be assigned by the store at write time")]
    PrecomputedTimestamp(&'static str),
}

impl ApprovalRequest {
    /// A pending request whose timestamps will be assigned by the store.
    pub fn pending(
        item_name: impl Into<String>,
        requested_by: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            requested_by: requested_by.into(),
            requested_at: Timestamp::ServerTime,
            amount,
            decision: Decision::Pending,
        }
    }

    pub fn approved_by(mut self, approver: impl Into<String>) -> Self {
        self.decision = Decision::Approved {
            by: approver.into(),
            at: Timestamp::ServerTime,
        };
        self
    }

    pub fn rejected_by(mut self, rejecter: impl Into<String>) -> Self {
        self.decision = Decision::Rejected {
            by: rejecter.into(),
            at: Timestamp::ServerTime,
        };
        self
    }

    pub fn status(&self) -> ApprovalStatus {
        self.decision.status()
    }

    /// Checks that this request can be used as a seed template.
    pub fn validate(&self) -> Result<(), InvalidApproval> {
        if self.item_name.trim().is_empty() {
            return Err(InvalidApproval::EmptyItemName);
        }
        if self.requested_by.trim().is_empty() {
            return Err(InvalidApproval::EmptyRequester);
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(InvalidApproval::InvalidAmount(self.amount));
        }
        if self.requested_at != Timestamp::ServerTime {
            return Err(InvalidApproval::PrecomputedTimestamp("requestedAt"));
        }

        match &self.decision {
            Decision::Pending => Ok(()),
            Decision::Approved { by, at } => check_decision(by, at, "approvedAt"),
            Decision::Rejected { by, at } => check_decision(by, at, "rejectedAt"),
        }
    }

    /// Flattens the request into the field layout persisted by the store.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("itemName", self.item_name.as_str());
        record.insert("status", self.status().as_str());
        record.insert("requestedBy", self.requested_by.as_str());
        record.insert("requestedAt", self.requested_at);
        record.insert("amount", FieldValue::amount(self.amount));

        match &self.decision {
            Decision::Pending => {}
            Decision::Approved { by, at } => {
                record.insert("approvedBy", by.as_str());
                record.insert("approvedAt", *at);
            }
            Decision::Rejected { by, at } => {
                record.insert("rejectedBy", by.as_str());
                record.insert("rejectedAt", *at);
            }
        }

        record
    }
}

fn check_decision(
    by: &str,
    at: &Timestamp,
    at_field: &'static str,
) -> Result<(), InvalidApproval> {
    if by.trim().is_empty() {
        return Err(InvalidApproval::EmptyDecider);
    }
    if *at != Timestamp::ServerTime {
        return Err(InvalidApproval::PrecomputedTimestamp(at_field));
    }
    Ok(())
}

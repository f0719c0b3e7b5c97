//! Classification enums for tickets and aggregates

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SLA VERDICT
// ============================================================================

/// Outcome of comparing a ticket's elapsed SLA time with its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaVerdict {
    WithinSla,
    OutOfSla,
    /// No SLA cycle data on the ticket
    Unmeasured,
}

impl SlaVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithinSla => "within_sla",
            Self::OutOfSla => "out_of_sla",
            Self::Unmeasured => "unmeasured",
        }
    }
}

impl fmt::Display for SlaVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AGGREGATION SELECTORS
// ============================================================================

/// Which timestamp assigns a ticket to a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BucketBy {
    #[default]
    Created,
    Resolved,
}

impl BucketBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for BucketBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary grouping dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Area,
    /// Exploded: a ticket counts once per subject tag
    Subject,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Subject => "subject",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FETCH STATE
// ============================================================================

/// How much of a project's result set was retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchState {
    Complete,
    /// Some pages arrived before an error
    Partial,
    /// Error before any ticket arrived
    Failed,
}

impl FetchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Raw ticket → normalized ticket
//!
//! Custom attributes are read into [`SlaCycle`] and [`TaggedAttribute`] once;
//! everything downstream works on the normalized record. Extraction is total:
//! a malformed attribute degrades to its default and is logged at debug level.

use serde_json::Value as JsonValue;
use ticketlens_tracker::RawTicket;

use crate::core::config::{ExtractConfig, FieldsConfig};
use crate::data::types::NormalizedTicket;
use crate::utils::time::{parse_tracker_timestamp, parse_tracker_timestamp_or_epoch};

// ============================================================================
// SLA CYCLE
// ============================================================================

/// Authoritative SLA measurement window of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaCycle {
    Completed { elapsed_ms: u64 },
    /// Still running; `None` when the clock has not started
    Ongoing { elapsed_ms: Option<u64> },
}

impl SlaCycle {
    /// Read the tracker's SLA structure.
    ///
    /// A non-empty `completedCycles` list is authoritative even when its first
    /// entry is unreadable; `ongoingCycle` is only consulted without one.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        if let Some(first) = value
            .get("completedCycles")
            .and_then(JsonValue::as_array)
            .and_then(|cycles| cycles.first())
        {
            return elapsed_millis(first).map(|elapsed_ms| Self::Completed { elapsed_ms });
        }

        value
            .get("ongoingCycle")
            .filter(|c| c.is_object())
            .map(|c| Self::Ongoing {
                elapsed_ms: elapsed_millis(c),
            })
    }

    pub fn elapsed_ms(&self) -> Option<u64> {
        match self {
            Self::Completed { elapsed_ms } => Some(*elapsed_ms),
            Self::Ongoing { elapsed_ms } => *elapsed_ms,
        }
    }
}

/// `elapsedTime.millis` as a non-negative integer
fn elapsed_millis(cycle: &JsonValue) -> Option<u64> {
    let millis = cycle.get("elapsedTime")?.get("millis")?;
    millis.as_u64().or_else(|| {
        millis
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

// ============================================================================
// TAGGED ATTRIBUTE
// ============================================================================

/// `{"value": "..."}` attributes, alone or in a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedAttribute {
    Absent,
    Single(String),
    Multi(Vec<String>),
    /// Present but not shaped like a tagged value
    Malformed,
}

impl TaggedAttribute {
    pub fn from_json(value: Option<&JsonValue>) -> Self {
        match value {
            None | Some(JsonValue::Null) => Self::Absent,
            Some(JsonValue::Array(items)) => {
                // Entries that are not tagged values are dropped
                Self::Multi(items.iter().filter_map(tag_value).collect())
            }
            Some(v) => match tag_value(v) {
                Some(s) => Self::Single(s),
                None => Self::Malformed,
            },
        }
    }

    pub fn single(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_values(self) -> Vec<String> {
        match self {
            Self::Multi(values) => values,
            _ => Vec::new(),
        }
    }
}

fn tag_value(v: &JsonValue) -> Option<String> {
    v.get("value")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

// ============================================================================
// EXTRACTOR
// ============================================================================

/// Maps raw tickets to [`NormalizedTicket`] using configured field ids
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    fields: FieldsConfig,
    unspecified_area: String,
    /// Lower-cased
    product_phrases: Vec<String>,
    escalation_marker: String,
}

impl FieldExtractor {
    pub fn new(fields: &FieldsConfig, extract: &ExtractConfig) -> Self {
        Self {
            fields: fields.clone(),
            unspecified_area: extract.unspecified_area.clone(),
            product_phrases: extract
                .product_status_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            escalation_marker: extract.escalation_marker.clone(),
        }
    }

    /// Normalize one ticket. `project` is the queried project, used when the
    /// ticket does not carry its own project key.
    pub fn extract(&self, project: &str, raw: &RawTicket) -> NormalizedTicket {
        let sla = raw.field(&self.fields.sla).and_then(SlaCycle::from_json);
        if sla.is_none() {
            tracing::debug!(key = %raw.key, "No SLA cycle data");
        }

        let area = match TaggedAttribute::from_json(raw.field(&self.fields.area)) {
            TaggedAttribute::Single(area) => area,
            other => {
                tracing::debug!(key = %raw.key, attribute = ?other, "Area not set, using default");
                self.unspecified_area.clone()
            }
        };

        let subjects = match TaggedAttribute::from_json(raw.field(&self.fields.subjects)) {
            multi @ TaggedAttribute::Multi(_) => multi.into_values(),
            TaggedAttribute::Absent => Vec::new(),
            other => {
                tracing::debug!(key = %raw.key, attribute = ?other, "Subjects not a list, ignoring");
                Vec::new()
            }
        };

        let escalated_tier3 = TaggedAttribute::from_json(raw.field(&self.fields.escalation))
            .single()
            .is_some_and(|v| v == self.escalation_marker);

        let forwarded_to_product = raw
            .status_name()
            .is_some_and(|status| self.is_product_status(status));

        let resolved_at = raw.resolution_date().and_then(|ts| {
            let parsed = parse_tracker_timestamp(ts);
            if parsed.is_none() {
                tracing::debug!(key = %raw.key, ts, "Unparseable resolution date, treating as unresolved");
            }
            parsed
        });

        NormalizedTicket {
            key: raw.key.clone(),
            project: raw.project_key().unwrap_or(project).to_string(),
            summary: raw.summary().map(str::to_string),
            created_at: parse_tracker_timestamp_or_epoch(raw.created()),
            resolved_at,
            sla_elapsed_ms: sla.and_then(|c| c.elapsed_ms()),
            area,
            subjects,
            forwarded_to_product,
            escalated_tier3,
        }
    }

    pub fn extract_all(&self, project: &str, raw: &[RawTicket]) -> Vec<NormalizedTicket> {
        raw.iter().map(|t| self.extract(project, t)).collect()
    }

    fn is_product_status(&self, status: &str) -> bool {
        let status = status.to_lowercase();
        self.product_phrases.iter().any(|p| status.contains(p))
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;

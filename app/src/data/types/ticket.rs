//! Normalized ticket records

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::enums::SlaVerdict;
use super::month::MonthBucket;
use crate::core::constants::MILLIS_PER_DAY;

/// Flat, analytic view of one tracker ticket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTicket {
    pub key: String,
    pub project: String,
    pub summary: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub resolved_at: Option<DateTime<FixedOffset>>,
    pub sla_elapsed_ms: Option<u64>,
    pub area: String,
    pub subjects: Vec<String>,
    pub forwarded_to_product: bool,
    pub escalated_tier3: bool,
}

impl NormalizedTicket {
    /// Elapsed SLA time in calendar days
    pub fn sla_days(&self) -> Option<f64> {
        self.sla_elapsed_ms.map(|ms| ms as f64 / MILLIS_PER_DAY)
    }

    pub fn creation_month(&self) -> MonthBucket {
        MonthBucket::of(&self.created_at)
    }

    pub fn resolution_month(&self) -> Option<MonthBucket> {
        self.resolved_at.as_ref().map(MonthBucket::of)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// A ticket together with its SLA verdict
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTicket {
    pub ticket: NormalizedTicket,
    pub verdict: SlaVerdict,
}

/// Serialized form of a classified ticket, derived values included
#[derive(Debug, Clone, Serialize)]
pub struct TicketRow {
    #[serde(flatten)]
    pub ticket: NormalizedTicket,
    pub sla_days: Option<f64>,
    pub verdict: SlaVerdict,
    pub creation_month: String,
    pub resolution_month: Option<String>,
}

impl From<&ClassifiedTicket> for TicketRow {
    fn from(c: &ClassifiedTicket) -> Self {
        Self {
            sla_days: c.ticket.sla_days(),
            verdict: c.verdict,
            creation_month: c.ticket.creation_month().label(),
            resolution_month: c.ticket.resolution_month().map(|m| m.label()),
            ticket: c.ticket.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Ticket created at noon (-03:00) on the given date, everything else empty
    pub fn ticket(key: &str, project: &str, created: (i32, u32, u32)) -> NormalizedTicket {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        NormalizedTicket {
            key: key.to_string(),
            project: project.to_string(),
            summary: None,
            created_at: offset
                .with_ymd_and_hms(created.0, created.1, created.2, 12, 0, 0)
                .unwrap(),
            resolved_at: None,
            sla_elapsed_ms: None,
            area: "Financeiro".to_string(),
            subjects: Vec::new(),
            forwarded_to_product: false,
            escalated_tier3: false,
        }
    }

    pub fn resolved(mut t: NormalizedTicket, on: (i32, u32, u32)) -> NormalizedTicket {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        t.resolved_at = Some(offset.with_ymd_and_hms(on.0, on.1, on.2, 12, 0, 0).unwrap());
        t
    }

    pub fn classified(ticket: NormalizedTicket, verdict: SlaVerdict) -> ClassifiedTicket {
        ClassifiedTicket { ticket, verdict }
    }
}

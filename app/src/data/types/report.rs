//! Report tables handed to the presentation layer

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::enums::{BucketBy, FetchState};
use super::month::MonthBucket;
use super::ticket::TicketRow;

/// SLA tally for one month, optionally split by a secondary dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub month: MonthBucket,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub count: u64,
    pub within_sla_count: u64,
    pub out_of_sla_count: u64,
    pub unmeasured_count: u64,
    /// `within_sla_count / count * 100`, 0 when `count` is 0
    pub percentage: f64,
    pub meets_goal: bool,
}

/// Tickets opened and closed in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowRow {
    pub month: MonthBucket,
    pub label: String,
    pub created: u64,
    pub resolved: u64,
}

/// Occurrences of one dimension value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionCount {
    pub value: String,
    pub count: u64,
}

/// Headline numbers for one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub created: u64,
    pub resolved: u64,
    pub forwarded_to_product: u64,
    pub escalated_tier3: u64,
    pub within_sla: u64,
    pub out_of_sla: u64,
    pub unmeasured: u64,
    pub sla_percentage: f64,
    pub goal_percent: f64,
    pub meets_goal: bool,
}

/// All tables for one scope: every tracked project, or a single one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// `None` for the overall section
    pub project: Option<String>,
    pub summary: Summary,
    pub created_vs_resolved: Vec<FlowRow>,
    pub sla_by_month: Vec<AggregateRow>,
    pub sla_by_month_and_area: Vec<AggregateRow>,
    pub sla_by_month_and_subject: Vec<AggregateRow>,
    pub tickets_by_area: Vec<DimensionCount>,
    pub tickets_by_subject: Vec<DimensionCount>,
}

/// Outcome of fetching one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchStatus {
    pub project: String,
    pub state: FetchState,
    pub tickets: usize,
    pub pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// First key received, handy for spot checks in the tracker UI
    pub first_key: Option<String>,
}

/// Distinct values present in the fetched tickets, before filtering
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailableValues {
    pub months: Vec<String>,
    pub areas: Vec<String>,
    pub subjects: Vec<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub cutoff_date: NaiveDate,
    pub bucket: BucketBy,
    /// No ticket survived fetching and filtering
    pub empty: bool,
    pub fetch: Vec<FetchStatus>,
    pub available: AvailableValues,
    pub overall: Section,
    pub projects: Vec<Section>,
    pub tickets: Vec<TicketRow>,
}

//! Domain logic for ticket SLA reporting
//!
//! - `extract` - Raw tracker fields to normalized tickets
//! - `sla` - Per-ticket SLA verdicts and project goals
//! - `filter` - Selections over months, areas, subjects and projects
//! - `aggregate` - Monthly SLA tables, flow tables and summaries
//! - `pipeline` - Fetch, cache and assemble a full report

pub mod aggregate;
pub mod extract;
pub mod filter;
pub mod pipeline;
pub mod sla;

pub use pipeline::{ReportPipeline, ReportRequest};

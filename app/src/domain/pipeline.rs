//! Report pipeline
//!
//! ```text
//! fetch (cached) ──▶ extract ──▶ classify ──▶ filter ──▶ aggregate ──▶ Report
//! ```
//!
//! | Stage     | Input                  | Output                  | Module         |
//! |-----------|------------------------|-------------------------|----------------|
//! | Fetch     | projects, cutoff       | `Arc<FetchSnapshot>`    | tracker crate  |
//! | Extract   | `RawTicket`            | `NormalizedTicket`      | `extract.rs`   |
//! | Classify  | `NormalizedTicket`     | `ClassifiedTicket`      | `sla.rs`       |
//! | Filter    | `ClassifiedTicket`     | subset                  | `filter.rs`    |
//! | Aggregate | subset                 | `Section` tables        | `aggregate.rs` |

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ticketlens_tracker::{PaginatedFetcher, ProjectFetch, SearchQuery, SearchTransport};

use super::aggregate::{
    created_vs_resolved, dimension_counts, sla_by_month, sla_by_month_and, summarize,
};
use super::extract::FieldExtractor;
use super::filter::{Selection, available_values};
use super::sla::SlaPolicy;
use crate::core::config::AppConfig;
use crate::data::cache::{CacheKey, FetchCache, FetchSnapshot};
use crate::data::types::{
    BucketBy, ClassifiedTicket, Dimension, FetchState, FetchStatus, Report, Section, TicketRow,
};

/// What to report on
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub selection: Selection,
    pub bucket: BucketBy,
    /// Bypass the fetch cache
    pub refresh: bool,
}

pub struct ReportPipeline {
    fetcher: PaginatedFetcher,
    cache: FetchCache,
    extractor: FieldExtractor,
    policy: SlaPolicy,
    projects: Vec<String>,
    cutoff: NaiveDate,
    fields: Vec<String>,
}

impl ReportPipeline {
    pub fn new(config: &AppConfig, transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            fetcher: PaginatedFetcher::new(transport, config.tracker.page_size),
            cache: FetchCache::new(&config.cache),
            extractor: FieldExtractor::new(&config.fields, &config.extract),
            policy: SlaPolicy::new(&config.sla),
            projects: config.query.projects.clone(),
            cutoff: config.query.cutoff_date,
            fields: config.fields.request_fields(),
        }
    }

    fn cache_key(&self) -> String {
        CacheKey::fetch(&self.projects, self.cutoff, &self.fields)
    }

    /// Fetch every tracked project, served from cache unless `refresh` is set
    pub async fn fetch(&self, refresh: bool) -> Arc<FetchSnapshot> {
        let key = self.cache_key();

        if refresh {
            self.cache.invalidate(&key).await;
        } else if let Some(snapshot) = self.cache.get(&key).await {
            tracing::debug!(fetched_at = %snapshot.fetched_at, "Using cached fetch");
            return snapshot;
        }

        let queries: Vec<SearchQuery> = self
            .projects
            .iter()
            .map(|p| SearchQuery::new(p.as_str(), self.cutoff, self.fields.clone()))
            .collect();

        tracing::info!(
            projects = ?self.projects,
            cutoff = %self.cutoff,
            page_size = self.fetcher.page_size(),
            "Fetching tickets"
        );

        let snapshot = Arc::new(FetchSnapshot::new(self.fetcher.fetch_all(&queries).await));

        tracing::info!(
            tickets = snapshot.ticket_count(),
            complete = snapshot.is_complete(),
            "Fetch finished"
        );

        self.cache.insert(key, snapshot.clone()).await;
        snapshot
    }

    /// Per-project fetch outcome
    pub async fn diagnose(&self, refresh: bool) -> Vec<FetchStatus> {
        let snapshot = self.fetch(refresh).await;
        snapshot.projects.iter().map(fetch_status).collect()
    }

    pub async fn build(&self, request: &ReportRequest) -> Report {
        let snapshot = self.fetch(request.refresh).await;
        self.assemble(&snapshot, request)
    }

    /// Extract, classify, filter and aggregate an existing fetch
    pub fn assemble(&self, snapshot: &FetchSnapshot, request: &ReportRequest) -> Report {
        let classified: Vec<ClassifiedTicket> = snapshot
            .projects
            .iter()
            .flat_map(|p| {
                self.policy
                    .classify_all(self.extractor.extract_all(&p.project, &p.tickets))
            })
            .collect();

        let available = available_values(&classified);
        let selected = request.selection.apply(&classified);

        tracing::debug!(
            fetched = classified.len(),
            selected = selected.len(),
            "Tickets filtered"
        );

        let overall = self.section(&selected, None, request.bucket);
        let projects: Vec<Section> = self
            .projects
            .iter()
            .filter(|p| {
                request
                    .selection
                    .projects
                    .as_ref()
                    .is_none_or(|chosen| chosen.contains(*p))
            })
            .map(|p| {
                let tickets: Vec<ClassifiedTicket> = selected
                    .iter()
                    .filter(|t| &t.ticket.project == p)
                    .cloned()
                    .collect();
                self.section(&tickets, Some(p.as_str()), request.bucket)
            })
            .collect();

        Report {
            generated_at: Utc::now(),
            cutoff_date: self.cutoff,
            bucket: request.bucket,
            empty: selected.is_empty(),
            fetch: snapshot.projects.iter().map(fetch_status).collect(),
            available,
            overall,
            projects,
            tickets: selected.iter().map(TicketRow::from).collect(),
        }
    }

    fn section(
        &self,
        tickets: &[ClassifiedTicket],
        project: Option<&str>,
        bucket: BucketBy,
    ) -> Section {
        let goal = self.policy.goal_percent(project);
        Section {
            project: project.map(str::to_string),
            summary: summarize(tickets, goal),
            created_vs_resolved: created_vs_resolved(tickets),
            sla_by_month: sla_by_month(tickets, bucket, goal),
            sla_by_month_and_area: sla_by_month_and(tickets, bucket, Dimension::Area, goal),
            sla_by_month_and_subject: sla_by_month_and(tickets, bucket, Dimension::Subject, goal),
            tickets_by_area: dimension_counts(tickets, Dimension::Area),
            tickets_by_subject: dimension_counts(tickets, Dimension::Subject),
        }
    }
}

fn fetch_status(fetch: &ProjectFetch) -> FetchStatus {
    let state = match (&fetch.error, fetch.tickets.is_empty()) {
        (None, _) => FetchState::Complete,
        (Some(_), false) => FetchState::Partial,
        (Some(_), true) => FetchState::Failed,
    };
    FetchStatus {
        project: fetch.project.clone(),
        state,
        tickets: fetch.tickets.len(),
        pages: fetch.pages,
        error_kind: fetch.error.as_ref().map(|e| e.kind().to_string()),
        error: fetch.error.as_ref().map(|e| e.to_string()),
        first_key: fetch.tickets.first().map(|t| t.key.clone()),
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

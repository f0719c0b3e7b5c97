//! Page-draining fetcher
//!
//! Each page is requested at the offset just past the issues received so far,
//! so a tracker that caps `maxResults` below the page size loses nothing.
//! Pagination stops on the first page with zero issues; a short page is not
//! treated as the last one.

use std::num::NonZeroU32;
use std::sync::Arc;

use futures::future::join_all;

use crate::client::SearchTransport;
use crate::error::FetchError;
use crate::model::RawTicket;
use crate::query::SearchQuery;

/// Everything retrieved for one project's query
#[derive(Debug)]
pub struct ProjectFetch {
    pub project: String,
    /// Tickets in API order; partial when `error` is set
    pub tickets: Vec<RawTicket>,
    /// Non-empty pages received
    pub pages: u32,
    /// Failure that ended pagination early
    pub error: Option<FetchError>,
}

impl ProjectFetch {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

pub struct PaginatedFetcher {
    transport: Arc<dyn SearchTransport>,
    page_size: NonZeroU32,
}

impl PaginatedFetcher {
    pub fn new(transport: Arc<dyn SearchTransport>, page_size: NonZeroU32) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Drain all pages of one query.
    ///
    /// Never returns early without telling the caller: a failing page ends the
    /// loop and is reported in [`ProjectFetch::error`] next to the tickets
    /// gathered so far.
    pub async fn fetch_project(&self, query: &SearchQuery) -> ProjectFetch {
        let page_size = self.page_size.get();
        let mut tickets = Vec::new();
        let mut pages = 0u32;
        let mut start_at = 0u64;

        let error = loop {
            let page = match self.transport.search(query, start_at, page_size).await {
                Ok(page) => page,
                Err(e) => break Some(e),
            };
            if page.issues.is_empty() {
                break None;
            }
            // A tracker that ignores startAt keeps answering past its own total
            if let Some(total) = page.total
                && start_at >= total.saturating_add(u64::from(page_size))
            {
                break Some(FetchError::MalformedResponse(format!(
                    "issues returned at offset {} beyond reported total {}",
                    start_at, total
                )));
            }

            pages += 1;
            tracing::debug!(
                project = %query.project,
                start_at,
                received = page.issues.len(),
                total = ?page.total,
                "Fetched search page"
            );
            // The tracker may cap maxResults below the requested page size
            start_at += page.issues.len() as u64;
            tickets.extend(page.issues);
        };

        match &error {
            Some(e) => tracing::warn!(
                project = %query.project,
                start_at,
                kind = e.kind(),
                error = %e,
                fetched = tickets.len(),
                "Pagination stopped by fetch error"
            ),
            None => tracing::debug!(
                project = %query.project,
                tickets = tickets.len(),
                pages,
                "Project fetch complete"
            ),
        }

        ProjectFetch {
            project: query.project.clone(),
            tickets,
            pages,
            error,
        }
    }

    /// Fetch several projects concurrently; results follow the order of `queries`
    pub async fn fetch_all(&self, queries: &[SearchQuery]) -> Vec<ProjectFetch> {
        join_all(queries.iter().map(|q| self.fetch_project(q))).await
    }
}

//! # TicketLens Tracker
//!
//! Paged search client for an issue tracker's REST API.
//!
//! - [`SearchQuery`] - one project's creation-bounded search
//! - [`TrackerClient`] - HTTP transport (basic auth, JSON pages)
//! - [`PaginatedFetcher`] - drains every page of a query, stopping on the first empty page
//! - [`RawTicket`] - the semi-structured issue record, exactly as the tracker sent it
//!
//! Failures never discard what was already fetched: a [`ProjectFetch`] carries
//! the tickets accumulated before the failing page alongside the [`FetchError`].

mod client;
mod error;
mod fetcher;
mod model;
mod query;

pub use client::{SearchTransport, TrackerClient, TrackerSettings};
pub use error::FetchError;
pub use fetcher::{PaginatedFetcher, ProjectFetch};
pub use model::{RawTicket, SearchPage, standard_fields};
pub use query::SearchQuery;

//! Data layer
//!
//! - `types` - Ticket records and report tables
//! - `cache` - In-process memoization of fetch results

pub mod cache;
pub mod types;

pub use cache::{CacheKey, FetchCache, FetchSnapshot};

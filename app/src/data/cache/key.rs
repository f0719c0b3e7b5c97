//! Type-safe cache key builder with versioning

use chrono::NaiveDate;

use crate::core::constants::CACHE_KEY_VERSION;

/// Type-safe cache key builder
///
/// All keys are prefixed with a version (e.g., "v1:") to allow
/// invalidating all cached data on schema changes.
pub struct CacheKey;

impl CacheKey {
    /// Cache key for a full fetch. Order of projects and fields is significant.
    pub fn fetch(projects: &[String], cutoff: NaiveDate, fields: &[String]) -> String {
        format!(
            "{}:fetch:{}:{}:{}",
            CACHE_KEY_VERSION,
            projects.join(","),
            cutoff.format("%Y-%m-%d"),
            fields.join(",")
        )
    }
}

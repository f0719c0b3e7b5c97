//! Raw search-response model
//!
//! Only the envelope and the issue key are typed. Everything under `fields`
//! stays as JSON because custom-field shapes vary per tracker instance and the
//! extractor downstream decides how to read them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Built-in field names requested on every search
pub mod standard_fields {
    pub const SUMMARY: &str = "summary";
    pub const CREATED: &str = "created";
    pub const RESOLUTION_DATE: &str = "resolutiondate";
    pub const STATUS: &str = "status";
    pub const PROJECT: &str = "project";

    pub const ALL: [&str; 5] = [SUMMARY, CREATED, RESOLUTION_DATE, STATUS, PROJECT];
}

/// One issue as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTicket {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, JsonValue>,
}

impl RawTicket {
    /// Field value, treating JSON `null` as absent
    pub fn field(&self, id: &str) -> Option<&JsonValue> {
        self.fields.get(id).filter(|v| !v.is_null())
    }

    /// String-valued field, treating `null` and non-strings as absent
    pub fn str_field(&self, id: &str) -> Option<&str> {
        self.field(id).and_then(JsonValue::as_str)
    }

    pub fn summary(&self) -> Option<&str> {
        self.str_field(standard_fields::SUMMARY)
    }

    pub fn created(&self) -> Option<&str> {
        self.str_field(standard_fields::CREATED)
    }

    pub fn resolution_date(&self) -> Option<&str> {
        self.str_field(standard_fields::RESOLUTION_DATE)
    }

    /// `fields.status.name`
    pub fn status_name(&self) -> Option<&str> {
        self.field(standard_fields::STATUS)
            .and_then(|s| s.get("name"))
            .and_then(JsonValue::as_str)
    }

    /// `fields.project.key`
    pub fn project_key(&self) -> Option<&str> {
        self.field(standard_fields::PROJECT)
            .and_then(|p| p.get("key"))
            .and_then(JsonValue::as_str)
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub start_at: u64,
    #[serde(default)]
    pub max_results: u64,
    pub total: Option<u64>,
    #[serde(default)]
    pub issues: Vec<RawTicket>,
}

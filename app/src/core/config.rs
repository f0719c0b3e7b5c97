use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use serde::Deserialize;
use ticketlens_tracker::{TrackerSettings, standard_fields};

use crate::utils::file::expand_path;
use crate::utils::time::parse_iso_date;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CUTOFF_DATE,
    DEFAULT_ESCALATION_MARKER, DEFAULT_FIELD_AREA, DEFAULT_FIELD_ESCALATION, DEFAULT_FIELD_SLA,
    DEFAULT_FIELD_SUBJECTS, DEFAULT_HOURS_PER_DAY, DEFAULT_PAGE_SIZE,
    DEFAULT_PRODUCT_STATUS_PHRASES, DEFAULT_PROJECT_GOALS, DEFAULT_PROJECTS,
    DEFAULT_SLA_GOAL_PERCENT, DEFAULT_SLA_TARGET_HOURS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_UNSPECIFIED_AREA,
};

// =============================================================================
// File Config (all fields optional, merged across files)
// =============================================================================

#[derive(Default, Clone, Deserialize)]
pub struct TrackerFileConfig {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for TrackerFileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerFileConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct QueryFileConfig {
    pub projects: Option<Vec<String>>,
    pub cutoff_date: Option<String>,
    /// Rolling window; excludes `cutoff_date`
    pub cutoff_days: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FieldsFileConfig {
    pub sla: Option<String>,
    pub area: Option<String>,
    pub escalation: Option<String>,
    pub subjects: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SlaFileConfig {
    pub target_hours: Option<f64>,
    pub hours_per_day: Option<f64>,
    pub goal_percent: Option<f64>,
    pub project_targets: Option<BTreeMap<String, f64>>,
    pub project_goals: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExtractFileConfig {
    pub unspecified_area: Option<String>,
    pub product_status_phrases: Option<Vec<String>>,
    pub escalation_marker: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CacheFileConfig {
    pub max_entries: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub tracker: Option<TrackerFileConfig>,
    pub query: Option<QueryFileConfig>,
    pub fields: Option<FieldsFileConfig>,
    pub sla: Option<SlaFileConfig>,
    pub extract: Option<ExtractFileConfig>,
    pub cache: Option<CacheFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Overwrite `current` when `other` is set
macro_rules! merge_field {
    ($current:ident, $other:ident, $field:ident, $path:literal) => {
        if $other.$field.is_some() {
            tracing::trace!(field = $path, value = ?$other.$field, "Merging config field");
            $current.$field = $other.$field;
        }
    };
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(tracker) = other.tracker {
            let current = self.tracker.get_or_insert_with(TrackerFileConfig::default);
            merge_field!(current, tracker, base_url, "tracker.base_url");
            merge_field!(current, tracker, email, "tracker.email");
            if tracker.api_token.is_some() {
                tracing::trace!("Merging tracker.api_token");
                current.api_token = tracker.api_token;
            }
            merge_field!(current, tracker, page_size, "tracker.page_size");
            merge_field!(current, tracker, timeout_secs, "tracker.timeout_secs");
        }

        if let Some(query) = other.query {
            let current = self.query.get_or_insert_with(QueryFileConfig::default);
            merge_field!(current, query, projects, "query.projects");
            // Either cutoff form replaces both from lower layers
            if query.cutoff_date.is_some() || query.cutoff_days.is_some() {
                tracing::trace!(
                    cutoff_date = ?query.cutoff_date,
                    cutoff_days = ?query.cutoff_days,
                    "Merging query cutoff"
                );
                current.cutoff_date = query.cutoff_date;
                current.cutoff_days = query.cutoff_days;
            }
        }

        if let Some(fields) = other.fields {
            let current = self.fields.get_or_insert_with(FieldsFileConfig::default);
            merge_field!(current, fields, sla, "fields.sla");
            merge_field!(current, fields, area, "fields.area");
            merge_field!(current, fields, escalation, "fields.escalation");
            merge_field!(current, fields, subjects, "fields.subjects");
        }

        // Per-project maps merge key by key
        if let Some(sla) = other.sla {
            let current = self.sla.get_or_insert_with(SlaFileConfig::default);
            merge_field!(current, sla, target_hours, "sla.target_hours");
            merge_field!(current, sla, hours_per_day, "sla.hours_per_day");
            merge_field!(current, sla, goal_percent, "sla.goal_percent");
            if let Some(targets) = sla.project_targets {
                tracing::trace!(targets = ?targets, "Merging sla.project_targets");
                current
                    .project_targets
                    .get_or_insert_with(BTreeMap::new)
                    .extend(targets);
            }
            if let Some(goals) = sla.project_goals {
                tracing::trace!(goals = ?goals, "Merging sla.project_goals");
                current
                    .project_goals
                    .get_or_insert_with(BTreeMap::new)
                    .extend(goals);
            }
        }

        if let Some(extract) = other.extract {
            let current = self.extract.get_or_insert_with(ExtractFileConfig::default);
            merge_field!(current, extract, unspecified_area, "extract.unspecified_area");
            merge_field!(
                current,
                extract,
                product_status_phrases,
                "extract.product_status_phrases"
            );
            merge_field!(current, extract, escalation_marker, "extract.escalation_marker");
        }

        if let Some(cache) = other.cache {
            let current = self.cache.get_or_insert_with(CacheFileConfig::default);
            merge_field!(current, cache, max_entries, "cache.max_entries");
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Clone)]
pub struct TrackerConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub page_size: NonZeroU32,
    pub timeout_secs: u64,
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TrackerConfig {
    pub fn settings(&self) -> TrackerSettings {
        TrackerSettings {
            base_url: self.base_url.clone(),
            email: self.email.clone(),
            api_token: self.api_token.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Tracked projects, in report order
    pub projects: Vec<String>,
    pub cutoff_date: NaiveDate,
}

/// Custom field ids on the tracker instance
#[derive(Debug, Clone)]
pub struct FieldsConfig {
    pub sla: String,
    pub area: String,
    pub escalation: String,
    pub subjects: String,
}

impl FieldsConfig {
    /// Standard fields followed by the custom ones, without duplicates
    pub fn request_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        let custom = [&self.sla, &self.area, &self.escalation, &self.subjects];
        for f in standard_fields::ALL
            .iter()
            .copied()
            .chain(custom.iter().map(|s| s.as_str()))
        {
            if !fields.iter().any(|existing| existing == f) {
                fields.push(f.to_string());
            }
        }
        fields
    }
}

#[derive(Debug, Clone)]
pub struct SlaConfig {
    pub target_hours: f64,
    pub hours_per_day: f64,
    pub goal_percent: f64,
    pub project_targets: BTreeMap<String, f64>,
    pub project_goals: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub unspecified_area: String,
    pub product_status_phrases: Vec<String>,
    pub escalation_marker: String,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub query: QueryConfig,
    pub fields: FieldsConfig,
    pub sla: SlaConfig,
    pub extract: ExtractConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.ticketlens/ticketlens.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.ticketlens/ticketlens.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(file_config, cli)
    }

    /// Layer defaults, merged file config and CLI/env overrides, then validate
    pub fn resolve(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_tracker = file_config.tracker.unwrap_or_default();
        let file_query = file_config.query.unwrap_or_default();
        let file_fields = file_config.fields.unwrap_or_default();
        let file_sla = file_config.sla.unwrap_or_default();
        let file_extract = file_config.extract.unwrap_or_default();
        let file_cache = file_config.cache.unwrap_or_default();

        // Tracker
        let page_size = cli
            .page_size
            .or(file_tracker.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let page_size = NonZeroU32::new(page_size).ok_or_else(|| {
            anyhow::anyhow!("Configuration error: tracker.page_size must be greater than 0")
        })?;

        let tracker = TrackerConfig {
            base_url: cli
                .tracker_url
                .clone()
                .or(file_tracker.base_url)
                .unwrap_or_default(),
            email: cli.email.clone().or(file_tracker.email).unwrap_or_default(),
            api_token: cli
                .api_token
                .clone()
                .or(file_tracker.api_token)
                .unwrap_or_default(),
            page_size,
            timeout_secs: cli
                .timeout_secs
                .or(file_tracker.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        // Query
        let projects: Vec<String> = cli
            .projects
            .clone()
            .or(file_query.projects.clone())
            .unwrap_or_else(|| DEFAULT_PROJECTS.iter().map(|p| p.to_string()).collect())
            .into_iter()
            .map(|p| p.trim().to_string())
            .collect();

        let cutoff_date = resolve_cutoff(cli, &file_query, Local::now().date_naive())?;

        let query = QueryConfig {
            projects,
            cutoff_date,
        };

        let fields = FieldsConfig {
            sla: file_fields
                .sla
                .unwrap_or_else(|| DEFAULT_FIELD_SLA.to_string()),
            area: file_fields
                .area
                .unwrap_or_else(|| DEFAULT_FIELD_AREA.to_string()),
            escalation: file_fields
                .escalation
                .unwrap_or_else(|| DEFAULT_FIELD_ESCALATION.to_string()),
            subjects: file_fields
                .subjects
                .unwrap_or_else(|| DEFAULT_FIELD_SUBJECTS.to_string()),
        };

        // SLA: default goals first so file entries override them
        let mut project_goals: BTreeMap<String, f64> = DEFAULT_PROJECT_GOALS
            .iter()
            .map(|(p, g)| (p.to_string(), *g))
            .collect();
        project_goals.extend(file_sla.project_goals.unwrap_or_default());

        let sla = SlaConfig {
            target_hours: cli
                .sla_target_hours
                .or(file_sla.target_hours)
                .unwrap_or(DEFAULT_SLA_TARGET_HOURS),
            hours_per_day: file_sla.hours_per_day.unwrap_or(DEFAULT_HOURS_PER_DAY),
            goal_percent: cli
                .sla_goal
                .or(file_sla.goal_percent)
                .unwrap_or(DEFAULT_SLA_GOAL_PERCENT),
            project_targets: file_sla.project_targets.unwrap_or_default(),
            project_goals,
        };

        let extract = ExtractConfig {
            unspecified_area: file_extract
                .unspecified_area
                .unwrap_or_else(|| DEFAULT_UNSPECIFIED_AREA.to_string()),
            product_status_phrases: file_extract.product_status_phrases.unwrap_or_else(|| {
                DEFAULT_PRODUCT_STATUS_PHRASES
                    .iter()
                    .map(|p| p.to_string())
                    .collect()
            }),
            escalation_marker: file_extract
                .escalation_marker
                .unwrap_or_else(|| DEFAULT_ESCALATION_MARKER.to_string()),
        };

        let cache = CacheConfig {
            max_entries: file_cache.max_entries.unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
        };

        let config = Self {
            tracker,
            query,
            fields,
            sla,
            extract,
            cache,
        };

        config.validate()?;

        tracing::debug!(
            base_url = %config.tracker.base_url,
            projects = ?config.query.projects,
            cutoff = %config.query.cutoff_date,
            page_size = config.tracker.page_size.get(),
            target_hours = config.sla.target_hours,
            goal = config.sla.goal_percent,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.tracker.base_url.trim().is_empty() {
            anyhow::bail!(
                "Configuration error: tracker.base_url must be set (config file, --tracker-url or TICKETLENS_TRACKER_URL)"
            );
        }
        if self.tracker.timeout_secs == 0 {
            anyhow::bail!("Configuration error: tracker.timeout_secs must be greater than 0");
        }

        if self.query.projects.is_empty() {
            anyhow::bail!("Configuration error: query.projects must not be empty");
        }
        if self.query.projects.iter().any(|p| p.is_empty()) {
            anyhow::bail!("Configuration error: query.projects must not contain empty names");
        }

        if self.fields.sla.is_empty()
            || self.fields.area.is_empty()
            || self.fields.escalation.is_empty()
            || self.fields.subjects.is_empty()
        {
            anyhow::bail!("Configuration error: fields.* must not be empty");
        }

        if !is_positive(self.sla.target_hours) {
            anyhow::bail!("Configuration error: sla.target_hours must be greater than 0");
        }
        if !is_positive(self.sla.hours_per_day) {
            anyhow::bail!("Configuration error: sla.hours_per_day must be greater than 0");
        }
        for (project, hours) in &self.sla.project_targets {
            if !is_positive(*hours) {
                anyhow::bail!(
                    "Configuration error: sla.project_targets.{} must be greater than 0",
                    project
                );
            }
        }

        if !is_percent(self.sla.goal_percent) {
            anyhow::bail!("Configuration error: sla.goal_percent must be between 0 and 100");
        }
        for (project, goal) in &self.sla.project_goals {
            if !is_percent(*goal) {
                anyhow::bail!(
                    "Configuration error: sla.project_goals.{} must be between 0 and 100",
                    project
                );
            }
        }

        if self.cache.max_entries == 0 {
            anyhow::bail!("Configuration error: cache.max_entries must be greater than 0");
        }

        Ok(())
    }
}

/// Creation-date lower bound: a fixed date or `today - cutoff_days`.
///
/// CLI/env values win over the file; a file may not set both forms.
fn resolve_cutoff(cli: &CliConfig, file: &QueryFileConfig, today: NaiveDate) -> Result<NaiveDate> {
    if file.cutoff_date.is_some() && file.cutoff_days.is_some() {
        anyhow::bail!(
            "Configuration error: query.cutoff_date and query.cutoff_days are mutually exclusive"
        );
    }

    if let Some(date) = cli.cutoff {
        return Ok(date);
    }

    let Some(days) = cli.cutoff_days.or(file.cutoff_days) else {
        let raw = file
            .cutoff_date
            .clone()
            .unwrap_or_else(|| DEFAULT_CUTOFF_DATE.to_string());
        return parse_iso_date(&raw).ok_or_else(|| {
            anyhow::anyhow!(
                "Configuration error: query.cutoff_date '{}' is not a valid YYYY-MM-DD date",
                raw
            )
        });
    };

    today
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Configuration error: query.cutoff_days {} is out of range",
                days
            )
        })
}

/// Get the profile config path (~/.ticketlens/ticketlens.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn is_percent(v: f64) -> bool {
    (0.0..=100.0).contains(&v)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

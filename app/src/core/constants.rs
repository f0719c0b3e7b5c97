// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "TicketLens";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "ticketlens";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".ticketlens";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "ticketlens.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TICKETLENS_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TICKETLENS_LOG";

// =============================================================================
// Environment Variables - Tracker
// =============================================================================

/// Environment variable for the tracker base URL (e.g. `https://acme.atlassian.net`)
pub const ENV_TRACKER_URL: &str = "TICKETLENS_TRACKER_URL";

/// Environment variable for the tracker account e-mail
pub const ENV_TRACKER_EMAIL: &str = "TICKETLENS_TRACKER_EMAIL";

/// Environment variable for the tracker API token
pub const ENV_TRACKER_API_TOKEN: &str = "TICKETLENS_TRACKER_API_TOKEN";

/// Environment variable for the search page size
pub const ENV_PAGE_SIZE: &str = "TICKETLENS_PAGE_SIZE";

/// Environment variable for the HTTP timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "TICKETLENS_TIMEOUT_SECS";

// =============================================================================
// Environment Variables - Query
// =============================================================================

/// Environment variable for tracked projects (comma-separated)
pub const ENV_PROJECTS: &str = "TICKETLENS_PROJECTS";

/// Environment variable for the creation-date lower bound (`YYYY-MM-DD`)
pub const ENV_CUTOFF_DATE: &str = "TICKETLENS_CUTOFF_DATE";

/// Environment variable for a rolling creation window in days
pub const ENV_CUTOFF_DAYS: &str = "TICKETLENS_CUTOFF_DAYS";

// =============================================================================
// Environment Variables - SLA
// =============================================================================

/// Environment variable for the global SLA target in business hours
pub const ENV_SLA_TARGET_HOURS: &str = "TICKETLENS_SLA_TARGET_HOURS";

/// Environment variable for the global SLA goal percentage
pub const ENV_SLA_GOAL_PERCENT: &str = "TICKETLENS_SLA_GOAL_PERCENT";

// =============================================================================
// Tracker Defaults
// =============================================================================

/// Default results per search page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default HTTP timeout for search requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Query Defaults
// =============================================================================

/// Projects tracked when none are configured, in report order
pub const DEFAULT_PROJECTS: &[&str] = &["TDS", "INT", "TINE", "INTEL"];

/// Tickets created before this date are never fetched
pub const DEFAULT_CUTOFF_DATE: &str = "2024-01-01";

// =============================================================================
// Custom Field Defaults
// =============================================================================

/// SLA cycle structure (`completedCycles` / `ongoingCycle`)
pub const DEFAULT_FIELD_SLA: &str = "customfield_13686";

/// Requesting area, tagged single value
pub const DEFAULT_FIELD_AREA: &str = "customfield_13719";

/// Tier-3 escalation flag, tagged single value
pub const DEFAULT_FIELD_ESCALATION: &str = "customfield_13659";

/// Subject tags, list of tagged single values
pub const DEFAULT_FIELD_SUBJECTS: &str = "customfield_13747";

// =============================================================================
// SLA Defaults
// =============================================================================

/// Global SLA target in business hours
pub const DEFAULT_SLA_TARGET_HOURS: f64 = 40.0;

/// Business hours in one SLA day
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// Global SLA goal (percent of tickets within target)
pub const DEFAULT_SLA_GOAL_PERCENT: f64 = 96.0;

/// Per-project goal overrides
pub const DEFAULT_PROJECT_GOALS: &[(&str, f64)] = &[("TDS", 98.0)];

/// Milliseconds in one calendar day
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

// =============================================================================
// Extraction Defaults
// =============================================================================

/// Area label used when the area attribute is missing or malformed
pub const DEFAULT_UNSPECIFIED_AREA: &str = "Não especificado";

/// Status phrases (matched lower-case) meaning "awaiting product prioritization"
pub const DEFAULT_PRODUCT_STATUS_PHRASES: &[&str] =
    &["priorizar com produto", "priorizado com produto"];

/// Escalation attribute value meaning "escalated to tier 3"
pub const DEFAULT_ESCALATION_MARKER: &str = "Sim";

// =============================================================================
// Cache
// =============================================================================

/// Default maximum number of memoized fetch results
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 16;

/// Cache key version prefix
pub const CACHE_KEY_VERSION: &str = "v1";

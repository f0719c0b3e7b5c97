use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_CUTOFF_DATE, ENV_CUTOFF_DAYS, ENV_PAGE_SIZE, ENV_PROJECTS, ENV_SLA_GOAL_PERCENT,
    ENV_SLA_TARGET_HOURS, ENV_TIMEOUT_SECS, ENV_TRACKER_API_TOKEN, ENV_TRACKER_EMAIL,
    ENV_TRACKER_URL,
};
use crate::data::types::{BucketBy, MonthBucket};
use crate::utils::time::parse_iso_date;

#[derive(Parser)]
#[command(name = "ticketlens")]
#[command(version, about = "Support-ticket SLA reporting", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Tracker base URL (e.g. https://acme.atlassian.net)
    #[arg(long, global = true, env = ENV_TRACKER_URL)]
    pub tracker_url: Option<String>,

    /// Tracker account e-mail
    #[arg(long, global = true, env = ENV_TRACKER_EMAIL)]
    pub email: Option<String>,

    /// Tracker API token
    #[arg(long, global = true, env = ENV_TRACKER_API_TOKEN, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Results per search page
    #[arg(long, global = true, env = ENV_PAGE_SIZE)]
    pub page_size: Option<u32>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS)]
    pub timeout_secs: Option<u64>,

    /// Tracked projects, in report order (comma-separated)
    #[arg(long, global = true, env = ENV_PROJECTS, value_delimiter = ',')]
    pub projects: Option<Vec<String>>,

    /// Only fetch tickets created on or after this date (YYYY-MM-DD)
    #[arg(long, global = true, env = ENV_CUTOFF_DATE, value_parser = parse_cutoff_date)]
    pub cutoff: Option<NaiveDate>,

    /// Only fetch tickets created in the last N days (rolling window)
    #[arg(long, global = true, env = ENV_CUTOFF_DAYS, conflicts_with = "cutoff")]
    pub cutoff_days: Option<u32>,

    /// Global SLA target in business hours
    #[arg(long, global = true, env = ENV_SLA_TARGET_HOURS)]
    pub sla_target_hours: Option<f64>,

    /// Global SLA goal percentage
    #[arg(long, global = true, env = ENV_SLA_GOAL_PERCENT)]
    pub sla_goal: Option<f64>,
}

/// Parse the cutoff date from CLI/env string
fn parse_cutoff_date(s: &str) -> Result<NaiveDate, String> {
    parse_iso_date(s).ok_or_else(|| format!("Invalid cutoff date '{}'. Expected YYYY-MM-DD", s))
}

/// Parse a month selection from CLI string
fn parse_month(s: &str) -> Result<MonthBucket, String> {
    MonthBucket::parse(s)
        .ok_or_else(|| format!("Invalid month '{}'. Expected Mon/YYYY or YYYY-MM", s))
}

/// Parse the bucket selector from CLI string
fn parse_bucket(s: &str) -> Result<BucketBy, String> {
    match s.to_lowercase().as_str() {
        "created" | "creation" => Ok(BucketBy::Created),
        "resolved" | "resolution" => Ok(BucketBy::Resolved),
        _ => Err(format!(
            "Invalid bucket '{}'. Valid options: created, resolved",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fetch tickets and print the SLA report as JSON (default command)
    Report(ReportArgs),
    /// Print per-project fetch diagnostics as JSON
    Diagnose,
}

/// Report filters; an omitted filter selects every value
#[derive(Args, Clone, Debug, Default)]
pub struct ReportArgs {
    /// Creation month to include (repeatable, Jan/2024 or 2024-01)
    #[arg(long = "month", value_parser = parse_month)]
    pub months: Vec<MonthBucket>,

    /// Requesting area to include (repeatable)
    #[arg(long = "area")]
    pub areas: Vec<String>,

    /// Subject tag to include (repeatable)
    #[arg(long = "subject")]
    pub subjects: Vec<String>,

    /// Keep tickets with a subject containing this text (repeatable)
    #[arg(long = "subject-contains")]
    pub subject_keywords: Vec<String>,

    /// Project to include (repeatable)
    #[arg(long = "project")]
    pub projects: Vec<String>,

    /// Month used for SLA rows: created or resolved
    #[arg(long, value_parser = parse_bucket, default_value = "created")]
    pub bucket: BucketBy,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub tracker_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub projects: Option<Vec<String>>,
    pub cutoff: Option<NaiveDate>,
    pub cutoff_days: Option<u32>,
    pub sla_target_hours: Option<f64>,
    pub sla_goal: Option<f64>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            tracker_url: cli.tracker_url,
            email: cli.email,
            api_token: cli.api_token,
            page_size: cli.page_size,
            timeout_secs: cli.timeout_secs,
            projects: cli.projects,
            cutoff: cli.cutoff,
            cutoff_days: cli.cutoff_days,
            sla_target_hours: cli.sla_target_hours,
            sla_goal: cli.sla_goal,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> (CliConfig, Option<Commands>) {
        let mut cli = Cli::try_parse_from(args).unwrap();
        let command = cli.command.take();
        (cli.into(), command)
    }

    #[test]
    fn test_no_subcommand() {
        let (_, command) = parse_from(&["ticketlens"]);
        assert!(command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let (config, command) = parse_from(&[
            "ticketlens",
            "diagnose",
            "--tracker-url",
            "https://acme.atlassian.net",
            "--projects",
            "TDS,INT",
            "--cutoff",
            "2024-03-01",
        ]);
        assert!(matches!(command, Some(Commands::Diagnose)));
        assert_eq!(
            config.tracker_url.as_deref(),
            Some("https://acme.atlassian.net")
        );
        assert_eq!(
            config.projects,
            Some(vec!["TDS".to_string(), "INT".to_string()])
        );
        assert_eq!(config.cutoff, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_report_filters() {
        let (_, command) = parse_from(&[
            "ticketlens",
            "report",
            "--month",
            "Jan/2024",
            "--month",
            "2024-02",
            "--area",
            "Financeiro",
            "--subject-contains",
            "App NE",
            "--bucket",
            "resolved",
        ]);
        let Some(Commands::Report(args)) = command else {
            panic!("expected report command");
        };
        assert_eq!(
            args.months,
            vec![
                MonthBucket::new(2024, 1).unwrap(),
                MonthBucket::new(2024, 2).unwrap()
            ]
        );
        assert_eq!(args.areas, vec!["Financeiro".to_string()]);
        assert_eq!(args.subject_keywords, vec!["App NE".to_string()]);
        assert_eq!(args.bucket, BucketBy::Resolved);
    }

    #[test]
    fn test_cutoff_days() {
        let (config, _) = parse_from(&["ticketlens", "report", "--cutoff-days", "120"]);
        assert_eq!(config.cutoff_days, Some(120));
        assert!(config.cutoff.is_none());
    }

    #[test]
    fn test_cutoff_and_cutoff_days_conflict() {
        let result = Cli::try_parse_from([
            "ticketlens",
            "--cutoff",
            "2024-01-01",
            "--cutoff-days",
            "120",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_refresh_is_not_a_cli_flag() {
        assert!(Cli::try_parse_from(["ticketlens", "report", "--refresh"]).is_err());
        assert!(Cli::try_parse_from(["ticketlens", "diagnose", "--refresh"]).is_err());
    }

    #[test]
    fn test_report_defaults() {
        let (_, command) = parse_from(&["ticketlens", "report"]);
        let Some(Commands::Report(args)) = command else {
            panic!("expected report command");
        };
        assert!(args.months.is_empty());
        assert_eq!(args.bucket, BucketBy::Created);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["ticketlens", "--cutoff", "01/01/2024"]).is_err());
        assert!(Cli::try_parse_from(["ticketlens", "report", "--month", "2024"]).is_err());
        assert!(Cli::try_parse_from(["ticketlens", "report", "--bucket", "weekly"]).is_err());
    }

    #[test]
    fn test_parse_bucket() {
        assert_eq!(parse_bucket("Created").unwrap(), BucketBy::Created);
        assert_eq!(parse_bucket("resolution").unwrap(), BucketBy::Resolved);
        assert!(parse_bucket("").is_err());
    }
}

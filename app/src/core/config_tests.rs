use super::*;

use std::io::Write;

fn cli_with_url() -> CliConfig {
    CliConfig {
        tracker_url: Some("https://acme.atlassian.net".to_string()),
        ..Default::default()
    }
}

fn parse(json: &str) -> FileConfig {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_file_config_parse_full() {
    let config = parse(
        r#"{
            "tracker": {
                "base_url": "https://acme.atlassian.net",
                "email": "ops@acme.test",
                "api_token": "t0k3n",
                "page_size": 50,
                "timeout_secs": 10
            },
            "query": { "projects": ["TDS", "INT"], "cutoff_date": "2024-06-01" },
            "fields": { "subjects": "customfield_13610" },
            "sla": { "target_hours": 16, "project_goals": { "INT": 90 } },
            "extract": { "escalation_marker": "Yes" },
            "cache": { "max_entries": 4 }
        }"#,
    );

    let tracker = config.tracker.as_ref().unwrap();
    assert_eq!(tracker.page_size, Some(50));
    assert_eq!(tracker.api_token.as_deref(), Some("t0k3n"));
    let query = config.query.as_ref().unwrap();
    assert_eq!(
        query.projects,
        Some(vec!["TDS".to_string(), "INT".to_string()])
    );
    assert_eq!(
        config.fields.as_ref().unwrap().subjects.as_deref(),
        Some("customfield_13610")
    );
    assert_eq!(config.sla.as_ref().unwrap().target_hours, Some(16.0));
    assert_eq!(config.cache.as_ref().unwrap().max_entries, Some(4));
}

#[test]
fn test_file_config_parse_empty() {
    let config = parse("{}");
    assert!(config.tracker.is_none());
    assert!(config.query.is_none());
    assert!(config.sla.is_none());
}

#[test]
fn test_file_config_parse_extra_fields() {
    let config = parse(r#"{ "query": { "projects": ["TDS"] }, "trackr": { "base_url": "x" } }"#);
    assert!(config.query.is_some());
    assert!(config.tracker.is_none());
    assert!(config.extra.get("trackr").is_some());
}

#[test]
fn test_file_config_debug_redacts_token() {
    let config = parse(r#"{ "tracker": { "api_token": "super-secret" } }"#);
    let debug = format!("{:?}", config);
    assert!(!debug.contains("super-secret"));
}

#[test]
fn test_file_config_merge() {
    let mut base = parse(
        r#"{
            "tracker": { "base_url": "https://old.test", "email": "a@old.test" },
            "sla": { "goal_percent": 90, "project_goals": { "TDS": 97, "INT": 91 } }
        }"#,
    );
    let overlay = parse(
        r#"{
            "tracker": { "base_url": "https://new.test" },
            "sla": { "project_goals": { "INT": 95 } },
            "query": { "cutoff_date": "2023-01-01" }
        }"#,
    );

    base.merge(overlay);

    let tracker = base.tracker.as_ref().unwrap();
    assert_eq!(tracker.base_url.as_deref(), Some("https://new.test"));
    // Untouched by the overlay
    assert_eq!(tracker.email.as_deref(), Some("a@old.test"));

    let sla = base.sla.as_ref().unwrap();
    assert_eq!(sla.goal_percent, Some(90.0));
    let goals = sla.project_goals.as_ref().unwrap();
    assert_eq!(goals.get("TDS"), Some(&97.0));
    assert_eq!(goals.get("INT"), Some(&95.0));

    assert_eq!(
        base.query.as_ref().unwrap().cutoff_date.as_deref(),
        Some("2023-01-01")
    );
}

#[test]
fn test_resolve_defaults() {
    let config = AppConfig::resolve(FileConfig::default(), &cli_with_url()).unwrap();

    assert_eq!(config.tracker.base_url, "https://acme.atlassian.net");
    assert_eq!(config.tracker.page_size.get(), 100);
    assert_eq!(config.tracker.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.query.projects, vec!["TDS", "INT", "TINE", "INTEL"]);
    assert_eq!(
        config.query.cutoff_date,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
    assert_eq!(config.fields.sla, "customfield_13686");
    assert_eq!(config.fields.area, "customfield_13719");
    assert_eq!(config.fields.escalation, "customfield_13659");
    assert_eq!(config.fields.subjects, "customfield_13747");
    assert_eq!(config.sla.target_hours, 40.0);
    assert_eq!(config.sla.hours_per_day, 8.0);
    assert_eq!(config.sla.goal_percent, 96.0);
    assert_eq!(config.sla.project_goals.get("TDS"), Some(&98.0));
    assert!(config.sla.project_targets.is_empty());
    assert_eq!(config.extract.unspecified_area, "Não especificado");
    assert_eq!(config.extract.escalation_marker, "Sim");
    assert_eq!(config.extract.product_status_phrases.len(), 2);
}

#[test]
fn test_resolve_cli_overrides_file() {
    let file = parse(
        r#"{
            "tracker": { "base_url": "https://file.test", "page_size": 50 },
            "query": { "projects": ["TDS"], "cutoff_date": "2023-01-01" },
            "sla": { "goal_percent": 90, "project_goals": { "TDS": 99 } }
        }"#,
    );
    let cli = CliConfig {
        tracker_url: Some("https://cli.test".to_string()),
        projects: Some(vec!["INT".to_string(), " TINE ".to_string()]),
        cutoff: NaiveDate::from_ymd_opt(2024, 5, 1),
        sla_goal: Some(80.0),
        ..Default::default()
    };

    let config = AppConfig::resolve(file, &cli).unwrap();
    assert_eq!(config.tracker.base_url, "https://cli.test");
    assert_eq!(config.tracker.page_size.get(), 50);
    assert_eq!(config.query.projects, vec!["INT", "TINE"]);
    assert_eq!(
        config.query.cutoff_date,
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    );
    assert_eq!(config.sla.goal_percent, 80.0);
    assert_eq!(config.sla.project_goals.get("TDS"), Some(&99.0));
}

#[test]
fn test_resolve_rejects_invalid_cutoff() {
    let file = parse(r#"{ "query": { "cutoff_date": "2024-02-30" } }"#);
    let err = AppConfig::resolve(file, &cli_with_url()).unwrap_err();
    assert!(err.to_string().contains("query.cutoff_date"));
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn query_file(json: &str) -> QueryFileConfig {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_cutoff_days_rolling_window() {
    let today = date(2024, 6, 15);
    let file = query_file(r#"{ "cutoff_days": 120 }"#);
    let cutoff = resolve_cutoff(&CliConfig::default(), &file, today).unwrap();
    assert_eq!(cutoff, date(2024, 2, 16));

    let file = query_file(r#"{ "cutoff_days": 0 }"#);
    assert_eq!(resolve_cutoff(&CliConfig::default(), &file, today).unwrap(), today);
}

#[test]
fn test_cutoff_cli_wins_over_file() {
    let today = date(2024, 6, 15);
    let file = query_file(r#"{ "cutoff_date": "2023-01-01" }"#);

    let cli = CliConfig {
        cutoff_days: Some(15),
        ..Default::default()
    };
    assert_eq!(resolve_cutoff(&cli, &file, today).unwrap(), date(2024, 5, 31));

    let cli = CliConfig {
        cutoff: Some(date(2024, 3, 1)),
        ..Default::default()
    };
    let file = query_file(r#"{ "cutoff_days": 30 }"#);
    assert_eq!(resolve_cutoff(&cli, &file, today).unwrap(), date(2024, 3, 1));
}

#[test]
fn test_cutoff_date_and_days_exclusive_in_file() {
    let file = parse(r#"{ "query": { "cutoff_date": "2024-01-01", "cutoff_days": 120 } }"#);
    let err = AppConfig::resolve(file, &cli_with_url()).unwrap_err();
    assert!(err.to_string().contains("mutually exclusive"));
}

#[test]
fn test_cutoff_days_out_of_range() {
    let file = query_file(r#"{ "cutoff_days": 4000000000 }"#);
    let err = resolve_cutoff(&CliConfig::default(), &file, date(2024, 6, 15)).unwrap_err();
    assert!(err.to_string().contains("query.cutoff_days"));
}

#[test]
fn test_resolve_cutoff_days_relative_to_today() {
    let file = parse(r#"{ "query": { "cutoff_days": 120 } }"#);
    let config = AppConfig::resolve(file, &cli_with_url()).unwrap();
    let expected = Local::now().date_naive() - Days::new(120);
    assert!((config.query.cutoff_date - expected).num_days().abs() <= 1);
}

#[test]
fn test_merge_cutoff_form_replaces_lower_layer() {
    let mut base = parse(r#"{ "query": { "cutoff_date": "2023-01-01" } }"#);
    base.merge(parse(r#"{ "query": { "cutoff_days": 120 } }"#));

    let query = base.query.as_ref().unwrap();
    assert!(query.cutoff_date.is_none());
    assert_eq!(query.cutoff_days, Some(120));

    let config = AppConfig::resolve(base, &cli_with_url()).unwrap();
    assert!(config.query.cutoff_date > date(2024, 1, 1));
}

#[test]
fn test_resolve_rejects_zero_page_size() {
    let cli = CliConfig {
        page_size: Some(0),
        ..cli_with_url()
    };
    let err = AppConfig::resolve(FileConfig::default(), &cli).unwrap_err();
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn test_resolve_rejects_missing_base_url() {
    let err = AppConfig::resolve(FileConfig::default(), &CliConfig::default()).unwrap_err();
    assert!(err.to_string().contains("tracker.base_url"));
}

#[test]
fn test_resolve_rejects_empty_projects() {
    let file = parse(r#"{ "query": { "projects": [] } }"#);
    let err = AppConfig::resolve(file, &cli_with_url()).unwrap_err();
    assert!(err.to_string().contains("query.projects"));
}

#[test]
fn test_resolve_rejects_bad_sla_values() {
    let file = parse(r#"{ "sla": { "target_hours": 0 } }"#);
    assert!(AppConfig::resolve(file, &cli_with_url()).is_err());

    let file = parse(r#"{ "sla": { "project_targets": { "INT": -8 } } }"#);
    let err = AppConfig::resolve(file, &cli_with_url()).unwrap_err();
    assert!(err.to_string().contains("project_targets.INT"));

    let file = parse(r#"{ "sla": { "goal_percent": 101 } }"#);
    assert!(AppConfig::resolve(file, &cli_with_url()).is_err());

    let file = parse(r#"{ "sla": { "project_goals": { "TINE": -1 } } }"#);
    let err = AppConfig::resolve(file, &cli_with_url()).unwrap_err();
    assert!(err.to_string().contains("project_goals.TINE"));
}

#[test]
fn test_request_fields_dedup() {
    let file = parse(r#"{ "fields": { "area": "customfield_1", "escalation": "customfield_1" } }"#);
    let config = AppConfig::resolve(file, &cli_with_url()).unwrap();
    let fields = config.fields.request_fields();

    assert_eq!(
        fields,
        vec![
            "summary",
            "created",
            "resolutiondate",
            "status",
            "project",
            "customfield_13686",
            "customfield_1",
            "customfield_13747",
        ]
    );
}

#[test]
fn test_tracker_settings_and_debug() {
    let cli = CliConfig {
        api_token: Some("hunter2".to_string()),
        timeout_secs: Some(7),
        ..cli_with_url()
    };
    let config = AppConfig::resolve(FileConfig::default(), &cli).unwrap();
    let settings = config.tracker.settings();
    assert_eq!(settings.timeout, Duration::from_secs(7));
    assert_eq!(settings.api_token, "hunter2");
    assert!(!format!("{:?}", config.tracker).contains("hunter2"));
}

#[test]
fn test_load_from_cli_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "tracker": {{ "base_url": "https://tmp.test", "page_size": 25 }},
            "query": {{ "projects": ["INTEL"] }}
        }}"#
    )
    .unwrap();

    let cli = CliConfig {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = AppConfig::load(&cli).unwrap();
    assert_eq!(config.tracker.page_size.get(), 25);
    assert_eq!(config.query.projects, vec!["INTEL"]);
}

#[test]
fn test_load_missing_cli_path() {
    let cli = CliConfig {
        config: Some(PathBuf::from("/nonexistent/ticketlens.json")),
        ..cli_with_url()
    };
    let err = AppConfig::load(&cli).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_load_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let cli = CliConfig {
        config: Some(file.path().to_path_buf()),
        ..cli_with_url()
    };
    let err = AppConfig::load(&cli).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

//! Core application

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use ticketlens_tracker::TrackerClient;

use crate::core::cli::{self, Commands, ReportArgs};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_LOG};
use crate::data::types::{FetchState, FetchStatus};
use crate::domain::filter::Selection;
use crate::domain::{ReportPipeline, ReportRequest};

pub struct CoreApp {
    pub config: AppConfig,
    pub pipeline: ReportPipeline,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!(
            app = APP_NAME,
            version = env!("CARGO_PKG_VERSION"),
            "Application starting"
        );

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;
        let app = Self::init(config)?;

        match command {
            Some(Commands::Diagnose) => app.diagnose().await,
            Some(Commands::Report(args)) => app.report(args).await,
            None => app.report(ReportArgs::default()).await,
        }
    }

    fn init(config: AppConfig) -> Result<Self> {
        let client = TrackerClient::new(&config.tracker.settings())
            .context("Failed to initialize tracker client")?;
        let pipeline = ReportPipeline::new(&config, Arc::new(client));

        tracing::debug!(
            projects = ?config.query.projects,
            cutoff = %config.query.cutoff_date,
            "Report pipeline initialized"
        );

        Ok(Self { config, pipeline })
    }

    async fn report(&self, args: ReportArgs) -> Result<()> {
        let request = ReportRequest {
            selection: Selection::from_lists(
                args.months,
                args.areas,
                args.subjects,
                args.projects,
                args.subject_keywords,
            ),
            bucket: args.bucket,
            refresh: false,
        };

        let report = self.pipeline.build(&request).await;
        Self::warn_incomplete(&report.fetch);

        if report.empty {
            tracing::info!("No data for this query");
        }

        print_json(&report)
    }

    async fn diagnose(&self) -> Result<()> {
        let statuses = self.pipeline.diagnose(false).await;
        Self::warn_incomplete(&statuses);
        print_json(&statuses)
    }

    fn warn_incomplete(statuses: &[FetchStatus]) {
        for status in statuses.iter().filter(|s| s.state != FetchState::Complete) {
            tracing::warn!(
                project = %status.project,
                state = %status.state,
                tickets = status.tickets,
                error = status.error.as_deref().unwrap_or_default(),
                "Project fetch incomplete"
            );
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries the JSON output only
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}

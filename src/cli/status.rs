use std::time::Duration;
use tracing::{info, warn};

use crate::audit::{classify, LocalAuditCache};
use crate::cli::commands::Cli;
use crate::config::{
    expand_home, parse_config, CrlReportOptions, Environment, FileConfig, StatusConfig,
    DEFAULT_AUDIT_DIR, DEFAULT_TIMEOUT_SECS, PROD_BUCKET_URL, STAGE_BUCKET_URL,
};
use crate::errors::StatusError;
use crate::models::IssuerAuditSummary;
use crate::pipeline::{run_pipeline, PipelineReport, RunOutcome};
use crate::reporting::formatter::{crl_summary_table, failed_run_note, issuer_detail_table, run_table};
use crate::reporting::html::{write_detail_report, RunDetails};
use crate::reporting::json::JsonReport;
use crate::reporting::Table;
use crate::storage::GcsGateway;

/// Merge CLI flags over the optional config file and validate the result.
pub async fn build_config(cli: &Cli) -> Result<StatusConfig, StatusError> {
    let file = match &cli.config {
        Some(path) => parse_config(path).await?,
        None => FileConfig::default(),
    };

    let count = usize::try_from(cli.count)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| StatusError::Config(format!("Run count must be a positive integer, got {}", cli.count)))?;

    let environment = if cli.stage { Environment::Stage } else { Environment::Prod };
    let bucket_url = match environment {
        Environment::Stage => file.stage_bucket_url.unwrap_or_else(|| STAGE_BUCKET_URL.to_string()),
        Environment::Prod => cli
            .bucket_url
            .clone()
            .or(file.bucket_url)
            .unwrap_or_else(|| PROD_BUCKET_URL.to_string()),
    };

    let audit_dir = expand_home(
        cli.auditdb
            .as_deref()
            .or(file.auditdb.as_deref())
            .unwrap_or(DEFAULT_AUDIT_DIR),
    )?;

    let timeout_secs = cli.timeout.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);

    StatusConfig {
        count,
        bucket_url,
        environment,
        audit_dir,
        timeout: Duration::from_secs(timeout_secs),
        crl: CrlReportOptions {
            summarize: cli.crl,
            details_path: cli.crl_details.clone(),
            details_all: cli.crl_details_all,
        },
        json_output: cli.json,
    }
    .validate()
}

pub async fn handle_status(cli: Cli) -> Result<(), StatusError> {
    let config = build_config(&cli).await?;
    let cache = LocalAuditCache::open(&config.audit_dir).await?;
    let gateway = GcsGateway::new(&config.bucket_url, config.timeout)?;

    info!(
        environment = %config.environment,
        bucket = %config.bucket_url,
        count = config.count,
        auditdb = %cache.dir().display(),
        "Collecting run data"
    );

    let report = run_pipeline(&gateway, &cache, config.count).await?;
    if report.failed_count() > 0 {
        warn!(failed = report.failed_count(), "Some runs could not be aggregated");
    }

    render_report(&report, &config).await
}

/// Per-issuer summaries for every complete run, newest first.
pub fn summarize_runs(report: &PipelineReport) -> Vec<(&RunOutcome, Vec<IssuerAuditSummary>)> {
    report
        .newest_first()
        .map(|outcome| {
            let summaries = outcome.data().map(classify).unwrap_or_default();
            (outcome, summaries)
        })
        .collect()
}

pub async fn render_report(report: &PipelineReport, config: &StatusConfig) -> Result<(), StatusError> {
    let summaries = if config.crl.enabled() {
        summarize_runs(report)
    } else {
        Vec::new()
    };

    if config.json_output {
        let json = JsonReport::new(report).with_summaries(&summaries);
        println!("{}", json.render()?);
    } else {
        print!("{}", run_table(report).render_text());
    }

    if !config.crl.enabled() {
        return Ok(());
    }

    let mut summary_tables: Vec<Table> = Vec::new();
    let mut details: Vec<RunDetails> = Vec::new();

    for (outcome, issuers) in &summaries {
        let run = match outcome {
            RunOutcome::Complete(run) => run,
            RunOutcome::Failed { run_id, error, .. } => {
                let note = failed_run_note(run_id, error);
                if !config.json_output {
                    println!("{}", note);
                }
                details.push(RunDetails {
                    heading: format!("{} CRL Audit Entries", run_id),
                    note: Some(note),
                    issuer_tables: Vec::new(),
                });
                continue;
            }
        };

        let table = crl_summary_table(run, issuers);
        if !config.json_output {
            print!("\n{}", table.render_text());
        }
        summary_tables.push(table);

        details.push(RunDetails {
            heading: format!("{} CRL Audit Entries", run.run_id),
            note: None,
            issuer_tables: issuers
                .iter()
                .filter_map(|summary| issuer_detail_table(summary, config.crl.details_all))
                .collect(),
        });
    }

    if let Some(path) = &config.crl.details_path {
        write_detail_report(path, &details, &summary_tables).await?;
        if !config.json_output {
            println!("Wrote CRL details to {}", path.display());
        }
    }

    Ok(())
}

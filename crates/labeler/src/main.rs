// crates/labeler/src/main.rs
//! sentiment-pulse binary.
//!
//! Loads the config, opens the database and dispatches one subcommand.
//! `run` keeps ingestion and labeling on their schedules until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_pulse::cli::{Cli, Command};
use sentiment_pulse::{
    logging, Ingestor, LabelJob, LabelJobOutcome, RedditClient, RunOutcome, Scheduler,
};
use sentiment_pulse_core::{AppConfig, CompletionProvider, OpenRouterProvider};
use sentiment_pulse_db::{Database, SentimentStats};
use tokio_util::sync::CancellationToken;

/// Cancel `token` on the first Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested, stopping after the current item");
            token.cancel();
        }
    });
}

fn build_label_job(config: &AppConfig, db: &Database) -> Result<LabelJob> {
    let candidates = config.candidates()?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(
        OpenRouterProvider::from_config(&config.openrouter)
            .context("failed to configure the completion endpoint")?,
    );
    Ok(LabelJob::new(
        db.clone(),
        provider,
        candidates,
        config.pipeline.clone(),
    ))
}

fn print_stats(stats: &SentimentStats) {
    let name = stats.source.as_deref().unwrap_or("all sources");
    println!("{name}");
    for (label, share) in [
        ("POSITIVE", &stats.positive),
        ("NEUTRAL", &stats.neutral),
        ("NEGATIVE", &stats.negative),
    ] {
        println!("  {label:<9} {:>6.2}%  {} posts", share.percentage, share.count);
    }
    println!("  INVALID   {} posts, pending {}", stats.invalid, stats.pending);
}

async fn label_once(config: &AppConfig, db: &Database) -> Result<()> {
    let job = build_label_job(config, db)?;
    job.recover_interrupted().await?;
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    match job.run_once(&cancel).await? {
        LabelJobOutcome::Ran { run_id, report } => {
            println!(
                "run {run_id}: model {} (available: {}), processed {} of {} ({} labeled, {} invalid, {} skipped), {}",
                report.model.as_deref().unwrap_or("-"),
                report.model_available,
                report.processed,
                report.snapshot_size,
                report.labeled,
                report.invalid,
                report.skipped,
                report.outcome.tag(),
            );
            if let RunOutcome::Aborted(e) = &report.outcome {
                eprintln!("run aborted: {e}");
            }
        }
        LabelJobOutcome::Skipped(reason) => {
            println!("labeling skipped: {reason:?}");
        }
    }
    Ok(())
}

async fn ingest_once(config: &AppConfig, db: &Database, subreddit: Option<String>) -> Result<()> {
    let client = RedditClient::new(&config.ingest)?;
    let ingestor = Ingestor::new(&client, db, config.ingest.insert_delay());
    let subreddits = match subreddit {
        Some(s) => vec![s],
        None => config.ingest.subreddits.clone(),
    };
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let mut failed = 0usize;
    for result in ingestor.ingest_all(&subreddits, &cancel).await {
        match result {
            Ok(r) => println!("r/{}: {} seen, {} new", r.subreddit, r.seen, r.inserted),
            Err(e) => {
                eprintln!("{e}");
                failed += 1;
            }
        }
    }
    if failed == subreddits.len() && failed > 0 {
        anyhow::bail!("ingestion failed for every subreddit");
    }
    Ok(())
}

async fn show_stats(db: &Database, source: Option<String>) -> Result<()> {
    match source {
        Some(source) => print_stats(&db.sentiment_stats(Some(&source)).await?),
        None => {
            for source in db.list_sources().await? {
                print_stats(&db.sentiment_stats(Some(&source)).await?);
            }
            print_stats(&db.sentiment_stats(None).await?);
        }
    }
    Ok(())
}

async fn show_runs(db: &Database, limit: i64) -> Result<()> {
    for run in db.recent_label_runs(limit).await? {
        println!(
            "#{:<5} {}  {:<9} {:<40} {}/{} labeled={} invalid={} {}",
            run.id,
            run.started_at,
            run.status.as_str(),
            run.model.as_deref().unwrap_or("-"),
            run.processed,
            run.snapshot_size,
            run.labeled,
            run.invalid,
            run.error_message
                .as_deref()
                .or(run.outcome.as_deref())
                .unwrap_or(""),
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    let _log_guard = logging::init(&config.logging, cli.verbose)?;

    let db_path = config.database_path()?;
    let db = Database::new(&db_path)
        .await
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    match cli.command() {
        Command::Run => {
            let label = build_label_job(&config, &db)?;
            let reddit = RedditClient::new(&config.ingest)?;
            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());
            Scheduler::new(
                db.clone(),
                label,
                reddit,
                config.ingest.clone(),
                config.schedule.clone(),
            )
            .run(cancel)
            .await?;
        }
        Command::Label => label_once(&config, &db).await?,
        Command::Ingest { subreddit } => ingest_once(&config, &db, subreddit).await?,
        Command::Stats { source } => show_stats(&db, source).await?,
        Command::Runs { limit } => show_runs(&db, limit).await?,
    }

    db.pool().close().await;
    Ok(())
}

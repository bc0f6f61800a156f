//! End-to-end test of the scheduler: ingestion feeds labeling until shutdown.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{fast_config, model, ScriptedProvider};
use mockito::Matcher;
use sentiment_pulse::{LabelJob, RedditClient, Scheduler};
use sentiment_pulse_core::{IngestConfig, ScheduleConfig, Sentiment};
use sentiment_pulse_db::{Database, LabelRunStatus};
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_scheduler_ingests_then_labels_and_stops_on_cancel() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/bitcoin/new.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"data": {"after": null, "children": [
                {"data": {"id": "p1", "title": "moon", "selftext": "", "created_utc": 1700000000.0}},
                {"data": {"id": "p2", "title": "crash", "selftext": "", "created_utc": 1700000001.0}}
            ]}})
            .to_string(),
        )
        .create_async()
        .await;

    let db = Database::new_in_memory().await.unwrap();
    // A run left behind by a process that died moments ago
    db.begin_label_run().await.unwrap().unwrap();

    let ingest = IngestConfig {
        base_url: server.url(),
        subreddits: vec!["bitcoin".into()],
        request_delay_ms: 0,
        insert_delay_ms: 0,
        ..IngestConfig::default()
    };
    let schedule = ScheduleConfig {
        ingest_every_secs: 1,
        label_every_secs: 1,
        label_offset_secs: 1,
    };
    let label = LabelJob::new(
        db.clone(),
        Arc::new(ScriptedProvider::answering("POSITIVE")),
        vec![model("meta-llama/llama-4-scout:free")],
        fast_config(),
    );
    let reddit = RedditClient::new(&ingest).unwrap();

    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(db.clone(), label, reddit, ingest, schedule);
    let handle = tokio::spawn(scheduler.run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler should stop after cancel")
        .unwrap()
        .unwrap();

    assert_eq!(db.count_posts().await.unwrap(), 2);
    assert!(db.get_pending_post_ids().await.unwrap().is_empty());
    let (label, _) = db.get_post_sentiment("p1").await.unwrap().unwrap();
    assert_eq!(label, Sentiment::Positive);

    let runs = db.recent_label_runs(10).await.unwrap();
    assert!(runs
        .iter()
        .all(|r| r.status != LabelRunStatus::Running));
    assert!(runs
        .iter()
        .any(|r| r.status == LabelRunStatus::Completed && r.labeled == 2));
    // The leftover run was released at startup
    assert_eq!(runs.last().unwrap().status, LabelRunStatus::Failed);
}

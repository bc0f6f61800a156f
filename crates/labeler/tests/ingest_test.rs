//! Integration tests for Reddit ingestion against a mocked listing endpoint.

use mockito::Matcher;
use sentiment_pulse::{IngestError, Ingestor, RedditClient};
use sentiment_pulse_core::IngestConfig;
use sentiment_pulse_db::Database;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config(server: &mockito::ServerGuard, post_limit: u32, page_size: u32) -> IngestConfig {
    IngestConfig {
        base_url: server.url(),
        user_agent: "sentiment-pulse-test/0.1".into(),
        subreddits: vec!["bitcoin".into()],
        post_limit,
        page_size,
        request_delay_ms: 0,
        insert_delay_ms: 0,
        timeout_secs: 5,
    }
}

fn listing(ids: &[&str], after: Option<&str>) -> String {
    let children: Vec<_> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "kind": "t3",
                "data": {
                    "id": id,
                    "title": format!("title {id}"),
                    "selftext": format!("body {id}"),
                    "created_utc": 1_700_000_000.0 + i as f64,
                    "subreddit": "Bitcoin"
                }
            })
        })
        .collect();
    json!({"kind": "Listing", "data": {"after": after, "children": children}}).to_string()
}

#[tokio::test]
async fn test_new_posts_are_stored_and_existing_skipped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/r/bitcoin/new.json")
        .match_query(Matcher::UrlEncoded("limit".into(), "25".into()))
        .match_header("user-agent", "sentiment-pulse-test/0.1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing(&["a", "b", "c"], None))
        .create_async()
        .await;

    let db = Database::new_in_memory().await.unwrap();
    db.add_post(&sentiment_pulse_core::NewPost {
        post_id: "b".into(),
        created_at: chrono::Utc::now(),
        source: "Bitcoin".into(),
        title: "old".into(),
        body: String::new(),
    })
    .await
    .unwrap();

    let client = RedditClient::new(&config(&server, 25, 25)).unwrap();
    let report = Ingestor::new(&client, &db, Duration::ZERO)
        .ingest_subreddit("bitcoin")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(report.subreddit, "bitcoin");
    assert_eq!(report.seen, 3);
    assert_eq!(report.inserted, 2);
    assert_eq!(db.count_posts().await.unwrap(), 3);

    let fields = db.get_post_fields("c").await.unwrap().unwrap();
    assert_eq!(fields.title.as_deref(), Some("title c"));
    assert_eq!(fields.body.as_deref(), Some("body c"));
    assert_eq!(fields.source.as_deref(), Some("Bitcoin"));
    // Existing row untouched
    let old = db.get_post_fields("b").await.unwrap().unwrap();
    assert_eq!(old.title.as_deref(), Some("old"));
}

#[tokio::test]
async fn test_pagination_follows_after_cursor_up_to_limit() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/r/bitcoin/new.json")
        .match_query(Matcher::Regex("^limit=2&raw_json=1$".into()))
        .with_status(200)
        .with_body(listing(&["a", "b"], Some("t3_b")))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/r/bitcoin/new.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("after".into(), "t3_b".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(listing(&["c"], Some("t3_c")))
        .create_async()
        .await;

    let client = RedditClient::new(&config(&server, 3, 2)).unwrap();
    let posts = client.fetch_new("bitcoin").await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_listing_without_cursor_ends_pagination() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/r/bitcoin/new.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing(&["a"], None))
        .expect(1)
        .create_async()
        .await;

    let client = RedditClient::new(&config(&server, 50, 25)).unwrap();
    let posts = client.fetch_new("bitcoin").await.unwrap();

    mock.assert_async().await;
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/private/new.json")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let client = RedditClient::new(&config(&server, 25, 25)).unwrap();
    let err = client.fetch_new("private").await.unwrap_err();
    assert!(matches!(
        err,
        IngestError::Status { ref subreddit, status: 403 } if subreddit == "private"
    ));
}

#[tokio::test]
async fn test_undecodable_listing_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/bitcoin/new.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>rate limited</html>")
        .create_async()
        .await;

    let client = RedditClient::new(&config(&server, 25, 25)).unwrap();
    let err = client.fetch_new("bitcoin").await.unwrap_err();
    assert!(matches!(err, IngestError::Decode { .. }));
}

#[tokio::test]
async fn test_failing_subreddit_does_not_stop_others() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/broken/new.json")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/r/bitcoin/new.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing(&["a", "b"], None))
        .create_async()
        .await;

    let db = Database::new_in_memory().await.unwrap();
    let client = RedditClient::new(&config(&server, 25, 25)).unwrap();
    let results = Ingestor::new(&client, &db, Duration::ZERO)
        .ingest_all(
            &["broken".to_string(), "bitcoin".to_string()],
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_err());
    assert_eq!(results[1].as_ref().unwrap().inserted, 2);
    assert_eq!(db.count_posts().await.unwrap(), 2);
}

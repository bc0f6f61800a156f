/// Inline SQL migrations for the sentiment-pulse database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: posts table
    r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL,
    subreddit TEXT,
    title TEXT,
    content TEXT,
    sentiment TEXT,
    model_version TEXT
);
"#,
    // Migration 2: pending lookups
    r#"CREATE INDEX IF NOT EXISTS idx_posts_sentiment ON posts(sentiment);"#,
    // Migration 3: when a label was written, for health-check probe selection
    r#"ALTER TABLE posts ADD COLUMN labeled_at TEXT;"#,
    r#"CREATE INDEX IF NOT EXISTS idx_posts_labeled_at ON posts(labeled_at DESC);"#,
    // Migration 4: label run ledger
    r#"
CREATE TABLE IF NOT EXISTS label_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    completed_at TEXT,
    status TEXT NOT NULL DEFAULT 'running',
    model TEXT,
    snapshot_size INTEGER NOT NULL DEFAULT 0,
    processed INTEGER NOT NULL DEFAULT 0,
    labeled INTEGER NOT NULL DEFAULT 0,
    invalid INTEGER NOT NULL DEFAULT 0,
    outcome TEXT,
    error_message TEXT
);
"#,
    // At most one running row: this is the cross-process run lock.
    r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_label_runs_single_running ON label_runs(status) WHERE status = 'running';"#,
    r#"CREATE INDEX IF NOT EXISTS idx_label_runs_started ON label_runs(started_at DESC);"#,
];

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::{info, warn};

use crate::models::{ParlayTotals, RiskLevel, SavedParlay, Selection};

/// SQLite log of every parlay the user saved
pub struct ParlayHistory {
    pool: Pool<Sqlite>,
}

impl ParlayHistory {
    /// Open the history database, creating file and schema if needed
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let history = Self { pool };
        history.init_schema().await?;

        info!("Parlay history initialized");
        Ok(history)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS saved_parlays (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                remote_id TEXT,
                selections TEXT NOT NULL,
                selection_count INTEGER NOT NULL,
                stake REAL NOT NULL,
                total_odds REAL NOT NULL,
                probability REAL NOT NULL,
                potential_return REAL NOT NULL,
                risk TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create saved_parlays table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_saved_parlays_created
            ON saved_parlays (created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a saved parlay, returning its row id
    pub async fn record(&self, parlay: &SavedParlay) -> Result<i64> {
        let selections =
            serde_json::to_string(&parlay.selections).context("Failed to encode selections")?;

        let result = sqlx::query(
            r#"
            INSERT INTO saved_parlays (
                remote_id,
                selections,
                selection_count,
                stake,
                total_odds,
                probability,
                potential_return,
                risk,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&parlay.remote_id)
        .bind(selections)
        .bind(parlay.selections.len() as i64)
        .bind(parlay.stake)
        .bind(parlay.totals.total_odds)
        .bind(parlay.totals.probability)
        .bind(parlay.totals.potential_return)
        .bind(parlay.totals.risk.as_str())
        .bind(parlay.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert saved parlay")?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent saved parlays first
    pub async fn recent(&self, limit: i64) -> Result<Vec<SavedParlay>> {
        let rows = sqlx::query_as::<_, SavedParlayRow>(
            r#"
            SELECT * FROM saved_parlays
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch saved parlays")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Number of saved parlays
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM saved_parlays")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count saved parlays")?;

        Ok(row.0)
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct SavedParlayRow {
    id: i64,
    remote_id: Option<String>,
    selections: String,
    #[allow(dead_code)]
    selection_count: i64,
    stake: f64,
    total_odds: f64,
    probability: f64,
    potential_return: f64,
    risk: String,
    created_at: String,
}

impl From<SavedParlayRow> for SavedParlay {
    fn from(row: SavedParlayRow) -> Self {
        let selections: Vec<Selection> = serde_json::from_str(&row.selections).unwrap_or_else(|e| {
            warn!("Saved parlay {} has unreadable selections: {}", row.id, e);
            Vec::new()
        });

        SavedParlay {
            id: Some(row.id),
            remote_id: row.remote_id,
            selections,
            stake: row.stake,
            totals: ParlayTotals {
                total_odds: row.total_odds,
                potential_return: row.potential_return,
                probability: row.probability,
                risk: parse_risk(row.id, &row.risk),
            },
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        }
    }
}

fn parse_risk(id: i64, s: &str) -> RiskLevel {
    s.parse().unwrap_or_else(|e| {
        warn!("Saved parlay {} has unreadable risk, treating as HIGH: {}", id, e);
        RiskLevel::High
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parlay::{compute_totals, normalize};
    use chrono::Duration;
    use serde_json::json;

    fn saved(prices: &[f64], stake: f64, created_at: DateTime<Utc>) -> SavedParlay {
        let selections: Vec<Selection> = prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                normalize(&json!({
                    "match_id": format!("fd_{}", i),
                    "home_team": "Home FC",
                    "away_team": "Away FC",
                    "selection_name": "Home",
                    "price": price
                }))
            })
            .collect();
        let totals = compute_totals(&selections, stake);

        SavedParlay {
            id: None,
            remote_id: None,
            selections,
            stake,
            totals,
            created_at,
        }
    }

    async fn open_history(dir: &tempfile::TempDir) -> ParlayHistory {
        let url = format!("sqlite:{}", dir.path().join("db/parlays.db").display());
        ParlayHistory::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let history = open_history(&dir).await;
        assert_eq!(history.count().await.unwrap(), 0);

        let mut parlay = saved(&[2.0, 1.5, 3.0], 10.0, Utc::now());
        parlay.remote_id = Some("abc-123".to_string());
        let id = history.record(&parlay).await.unwrap();

        let recent = history.recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);

        let stored = &recent[0];
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.remote_id.as_deref(), Some("abc-123"));
        assert_eq!(stored.selections, parlay.selections);
        assert_eq!(stored.totals, parlay.totals);
        assert_eq!(stored.totals.risk, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        let history = open_history(&dir).await;

        let now = Utc::now();
        history.record(&saved(&[1.5], 10.0, now - Duration::hours(2))).await.unwrap();
        history.record(&saved(&[2.5], 10.0, now)).await.unwrap();
        history.record(&saved(&[3.5], 10.0, now - Duration::hours(1))).await.unwrap();

        assert_eq!(history.count().await.unwrap(), 3);

        let recent = history.recent(2).await.unwrap();
        let odds: Vec<f64> = recent.iter().map(|p| p.totals.total_odds).collect();
        assert_eq!(odds, vec![2.5, 3.5]);
    }

    #[test]
    fn test_parse_risk() {
        assert_eq!(parse_risk(1, "LOW"), RiskLevel::Low);
        assert_eq!(parse_risk(1, "MEDIUM"), RiskLevel::Medium);
        assert_eq!(parse_risk(1, "HIGH"), RiskLevel::High);
        assert_eq!(parse_risk(1, "???"), RiskLevel::High);
    }
}

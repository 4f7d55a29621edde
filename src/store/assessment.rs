use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    FromRow, Row,
};

use crate::domain::{RiskAssessment, Score};

/// Single-slot cache of the most recent assessment. The slot is shared
/// across all tabs: two tabs navigating concurrently overwrite each other's
/// result, and a consumer must compare `url` before trusting the slot for a
/// different navigation.
#[derive(Clone)]
pub struct AssessmentCache {
    pool: SqlitePool,
}

#[derive(Debug, Clone)]
pub struct CachedAssessment {
    pub url: String,
    pub score: Score,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn current(&self) -> Result<Option<CachedAssessment>> {
        let row = sqlx::query_as::<_, CachedAssessment>(
            r#"SELECT url, score, updated_at FROM assessment WHERE id = 1"#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// The slot only counts for a consumer when its URL matches exactly.
    pub async fn lookup(&self, url: &str) -> Result<Option<CachedAssessment>> {
        Ok(self.current().await?.filter(|cached| cached.url == url))
    }

    /// Last write wins; a stale response arriving late still lands here.
    pub async fn commit(&self, assessment: &RiskAssessment) -> Result<()> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO assessment (id, url, score, updated_at)
                VALUES (1, ?1, ?2, CURRENT_TIMESTAMP)"#,
        )
        .bind(&assessment.url)
        .bind(assessment.score.as_persisted())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl<'r> FromRow<'r, SqliteRow> for CachedAssessment {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let raw_score: i64 = row.try_get("score")?;
        Ok(Self {
            url: row.try_get("url")?,
            score: Score::from_persisted(raw_score),
            updated_at: row.try_get("updated_at")?,
        })
    }
}

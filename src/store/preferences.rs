use std::collections::BTreeSet;

use anyhow::Result;
use sqlx::{sqlite::SqlitePool, Row};

use crate::domain::{Preferences, DEFAULT_THRESHOLD};

#[derive(Clone)]
pub struct PreferenceStore {
    pool: SqlitePool,
}

impl PreferenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn load(&self) -> Result<Preferences> {
        let row = sqlx::query("SELECT threshold, safe_domains FROM preferences WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let threshold: i64 = row.try_get("threshold")?;
                let raw: String = row.try_get("safe_domains")?;
                let safe_domains: BTreeSet<String> =
                    serde_json::from_str(&raw).unwrap_or_default();
                Ok(Preferences {
                    threshold: normalize_threshold(threshold),
                    safe_domains,
                })
            }
            None => Ok(Preferences::default()),
        }
    }

    pub async fn set_threshold(&self, value: i64) -> Result<u8> {
        let clamped = value.clamp(0, 100) as u8;
        let current = self.load().await?;
        self.persist(clamped, &current.safe_domains).await?;
        Ok(clamped)
    }

    /// Stepper path: ±1 relative to the currently effective threshold.
    pub async fn adjust_threshold(&self, delta: i64) -> Result<u8> {
        let current = self.load().await?;
        let adjusted = (i64::from(current.threshold) + delta).clamp(0, 100) as u8;
        self.persist(adjusted, &current.safe_domains).await?;
        Ok(adjusted)
    }

    /// Read-modify-write against the shared record; concurrent popups race
    /// and the last write wins.
    pub async fn set_domain_safe(&self, hostname: &str, safe: bool) -> Result<()> {
        let mut current = self.load().await?;
        if safe {
            current.safe_domains.insert(hostname.to_string());
        } else {
            current.safe_domains.remove(hostname);
        }
        self.persist(current.threshold, &current.safe_domains).await
    }

    async fn persist(&self, threshold: u8, safe_domains: &BTreeSet<String>) -> Result<()> {
        let encoded = serde_json::to_string(safe_domains)?;
        sqlx::query(
            r#"INSERT OR REPLACE INTO preferences (id, threshold, safe_domains)
                VALUES (1, ?1, ?2)"#,
        )
        .bind(i64::from(threshold))
        .bind(encoded)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// A stored zero reads back as the default, matching the original
// `threshold || 50` behavior the popup relies on.
fn normalize_threshold(raw: i64) -> u8 {
    if (1..=100).contains(&raw) {
        raw as u8
    } else {
        DEFAULT_THRESHOLD
    }
}

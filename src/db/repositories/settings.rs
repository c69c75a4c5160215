use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::db::connection::Database;

impl Database {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .context("failed to write setting")?;
            Ok(())
        })
        .await
    }

    pub async fn all_settings(&self) -> Result<Vec<(String, String)>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
            let mut rows = stmt.query([])?;
            let mut settings = Vec::new();
            while let Some(row) = rows.next()? {
                settings.push((row.get(0)?, row.get(1)?));
            }
            Ok(settings)
        })
        .await
    }
}

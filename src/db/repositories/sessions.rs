use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::ToSql, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{from_millis, parse_kind, parse_optional_provider, to_millis},
    models::{SessionPatch, SessionRecord},
};

const SESSION_COLUMNS: &str = "id, kind, app_name, process_id, window_title, url, domain, \
     call_provider, start_ts, end_ts, active_seconds, privacy_redacted";

fn row_to_session(row: &Row) -> Result<SessionRecord> {
    let kind: String = row.get("kind")?;
    let call_provider: Option<String> = row.get("call_provider")?;
    let start_ts: i64 = row.get("start_ts")?;
    let end_ts: i64 = row.get("end_ts")?;

    Ok(SessionRecord {
        id: row.get("id")?,
        kind: parse_kind(&kind)?,
        app_name: row.get("app_name")?,
        process_id: row.get("process_id")?,
        window_title: row.get("window_title")?,
        url: row.get("url")?,
        domain: row.get("domain")?,
        call_provider: parse_optional_provider(call_provider)?,
        start_ts: from_millis(start_ts, "start_ts")?,
        end_ts: from_millis(end_ts, "end_ts")?,
        active_seconds: row.get("active_seconds")?,
        privacy_redacted: row.get("privacy_redacted")?,
    })
}

impl Database {
    pub async fn insert_session(&self, session: &SessionRecord) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, kind, app_name, process_id, window_title, url, domain, call_provider, start_ts, end_ts, active_seconds, privacy_redacted)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.id,
                    record.kind.as_str(),
                    record.app_name,
                    record.process_id,
                    record.window_title,
                    record.url,
                    record.domain,
                    record.call_provider.map(|p| p.as_str()),
                    to_millis(record.start_ts),
                    to_millis(record.end_ts),
                    record.active_seconds,
                    record.privacy_redacted,
                ],
            )
            .context("failed to insert session")?;
            Ok(())
        })
        .await
    }

    /// Applies only the fields present in the patch. A patch with no fields
    /// set is a no-op.
    pub async fn update_session(&self, session_id: &str, patch: SessionPatch) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut fields: Vec<&'static str> = Vec::new();
            let mut values: Vec<Box<dyn ToSql>> = Vec::new();

            if let Some(window_title) = patch.window_title {
                fields.push("window_title = ?");
                values.push(Box::new(window_title));
            }
            if let Some(end_ts) = patch.end_ts {
                fields.push("end_ts = ?");
                values.push(Box::new(to_millis(end_ts)));
            }
            if let Some(active_seconds) = patch.active_seconds {
                fields.push("active_seconds = ?");
                values.push(Box::new(active_seconds));
            }
            if let Some(kind) = patch.kind {
                fields.push("kind = ?");
                values.push(Box::new(kind.as_str()));
            }
            if let Some(call_provider) = patch.call_provider {
                fields.push("call_provider = ?");
                values.push(Box::new(call_provider.as_str()));
            }

            if fields.is_empty() {
                return Ok(());
            }

            let sql = format!("UPDATE sessions SET {} WHERE id = ?", fields.join(", "));
            values.push(Box::new(session_id));
            let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
            conn.execute(&sql, &params[..])
                .context("failed to update session")?;
            Ok(())
        })
        .await
    }

    pub async fn session_by_id(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let row = stmt
                .query_row(params![session_id], |row| Ok(row_to_session(row)))
                .optional()?;
            row.transpose()
        })
        .await
    }

    /// Sessions whose start falls in `[start, end)`, oldest first.
    pub async fn sessions_started_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>> {
        self.execute(move |conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE start_ts >= ?1 AND start_ts < ?2
                 ORDER BY start_ts ASC"
            );
            let mut stmt = conn.prepare(&sql)?;

            let mut rows = stmt.query(params![to_millis(start), to_millis(end)])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }
            Ok(sessions)
        })
        .await
    }
}

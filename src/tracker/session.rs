use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::models::{
    active_seconds_between, CallProvider, SessionKind, SessionPatch, SessionRecord,
};
use crate::db::Database;
use crate::observer::WindowObservation;
use crate::{log_error, log_info};

use super::{calls, domain, policy, privacy};

const ENABLE_LOGS: bool = true;

/// The one session currently being extended. Identity fields are fixed at
/// creation; only the title and the end timestamp move.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub record_id: String,
    pub kind: SessionKind,
    pub app_name: String,
    pub process_id: i64,
    pub window_title: String,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub call_provider: Option<CallProvider>,
    pub started_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub privacy_redacted: bool,
    /// False while the initial insert has not landed; the next matching
    /// tick retries the full row instead of issuing updates against a row
    /// that does not exist.
    pub persisted: bool,
}

impl ActiveSession {
    fn to_record(&self) -> SessionRecord {
        SessionRecord {
            id: self.record_id.clone(),
            kind: self.kind,
            app_name: self.app_name.clone(),
            process_id: self.process_id,
            window_title: self.window_title.clone(),
            url: self.url.clone(),
            domain: self.domain.clone(),
            call_provider: self.call_provider,
            start_ts: self.started_at,
            end_ts: self.last_seen_at,
            active_seconds: active_seconds_between(self.started_at, self.last_seen_at),
            privacy_redacted: self.privacy_redacted,
        }
    }
}

/// Owns the open-session state and writes every transition through to the
/// database. Persistence failures are logged, never propagated: the
/// in-memory state stays authoritative and the next tick's write repairs
/// the store.
pub struct SessionManager {
    db: Database,
    privacy_mode: bool,
    current: Option<ActiveSession>,
}

impl SessionManager {
    pub fn new(db: Database, privacy_mode: bool) -> Self {
        Self {
            db,
            privacy_mode,
            current: None,
        }
    }

    pub fn open_session(&self) -> Option<&ActiveSession> {
        self.current.as_ref()
    }

    pub async fn handle_observation(&mut self, observation: &WindowObservation) {
        let title = if self.privacy_mode {
            privacy::redact_title(&observation.title)
        } else {
            observation.title.clone()
        };

        let continues = self
            .current
            .as_ref()
            .map(|current| {
                policy::continues(current, &observation.app_name, observation.process_id, &title)
            })
            .unwrap_or(false);

        if continues {
            self.extend_current(title, observation.captured_at).await;
        } else {
            self.end_current_session(observation.captured_at).await;
            self.start_session(observation, title).await;
        }
    }

    pub async fn handle_idle(&mut self, at: DateTime<Utc>) {
        self.end_current_session(at).await;
    }

    pub async fn shutdown(&mut self, at: DateTime<Utc>) {
        self.end_current_session(at).await;
    }

    async fn start_session(&mut self, observation: &WindowObservation, title: String) {
        let site = observation.url.as_deref().and_then(domain::host_of);
        let provider = calls::classify(
            &observation.app_name,
            &title,
            site.as_deref(),
            observation.url.as_deref(),
        );
        let kind = if provider.is_some() {
            SessionKind::Call
        } else if observation.url.is_some() {
            SessionKind::Web
        } else {
            SessionKind::App
        };

        let mut session = ActiveSession {
            record_id: Uuid::new_v4().to_string(),
            kind,
            app_name: observation.app_name.clone(),
            process_id: observation.process_id,
            window_title: title,
            url: observation.url.clone(),
            domain: site,
            call_provider: provider,
            started_at: observation.captured_at,
            last_seen_at: observation.captured_at,
            privacy_redacted: self.privacy_mode,
            persisted: false,
        };

        match self.db.insert_session(&session.to_record()).await {
            Ok(()) => session.persisted = true,
            Err(err) => log_error!("Failed to insert session {}: {err:?}", session.record_id),
        }

        log_info!(
            "Started {} session: {} - {}",
            session.kind.as_str(),
            session.app_name,
            session.window_title
        );
        self.current = Some(session);
    }

    async fn extend_current(&mut self, title: String, now: DateTime<Utc>) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        current.window_title = title.clone();
        current.last_seen_at = now;

        if !current.persisted {
            // the initial insert failed on an earlier tick; retry the full row
            let record = current.to_record();
            match self.db.insert_session(&record).await {
                Ok(()) => current.persisted = true,
                Err(err) => {
                    log_error!("Failed to re-insert session {}: {err:?}", current.record_id)
                }
            }
            return;
        }

        let patch = SessionPatch {
            window_title: Some(title),
            end_ts: Some(now),
            active_seconds: Some(active_seconds_between(current.started_at, now)),
            ..SessionPatch::default()
        };
        if let Err(err) = self.db.update_session(&current.record_id, patch).await {
            log_error!("Failed to update session {}: {err:?}", current.record_id);
        }
    }

    async fn end_current_session(&mut self, at: DateTime<Utc>) {
        let Some(mut current) = self.current.take() else {
            return;
        };
        current.last_seen_at = at;
        let active_seconds = active_seconds_between(current.started_at, at);

        let result = if current.persisted {
            self.db
                .update_session(
                    &current.record_id,
                    SessionPatch {
                        end_ts: Some(at),
                        active_seconds: Some(active_seconds),
                        ..SessionPatch::default()
                    },
                )
                .await
        } else {
            self.db.insert_session(&current.to_record()).await
        };

        match result {
            Ok(()) => log_info!("Ended session: {} ({active_seconds}s)", current.app_name),
            Err(err) => log_error!("Failed to finalize session {}: {err:?}", current.record_id),
        }
    }
}

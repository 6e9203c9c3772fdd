//! WebSocket event types for live dashboard refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DerivedStatus, JobKind};

/// Event sent to connected dashboard clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum WsEvent {
    /// A new job was created.
    JobCreated(JobCreatedPayload),
    /// A job's settings changed (deadline, loan date, target).
    JobUpdated(JobUpdatedPayload),
    /// A history entry was appended and the job progress recomputed.
    HistoryAppended(HistoryChangedPayload),
    /// A history entry was deleted and the job progress recomputed.
    HistoryDeleted(HistoryChangedPayload),
}

/// Payload for job_created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreatedPayload {
    pub job_id: Uuid,
    pub kind: JobKind,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for job_updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobUpdatedPayload {
    pub job_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

/// Payload for history_appended / history_deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryChangedPayload {
    pub job_id: Uuid,
    pub entry_id: Uuid,
    /// Recomputed cached progress after the change.
    pub progress: i32,
    /// Recomputed status after the change.
    pub status: DerivedStatus,
}

/// Wrapper that stamps every event with a send timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEventMessage {
    #[serde(flatten)]
    pub event: WsEvent,
    pub timestamp: DateTime<Utc>,
}

impl WsEventMessage {
    /// Create a new event message with the current timestamp.
    pub fn new(event: WsEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

impl WsEvent {
    pub fn job_created(job_id: Uuid, kind: JobKind, owner_id: String) -> Self {
        WsEvent::JobCreated(JobCreatedPayload {
            job_id,
            kind,
            owner_id,
            created_at: Utc::now(),
        })
    }

    pub fn job_updated(job_id: Uuid) -> Self {
        WsEvent::JobUpdated(JobUpdatedPayload {
            job_id,
            updated_at: Utc::now(),
        })
    }

    pub fn history_appended(
        job_id: Uuid,
        entry_id: Uuid,
        progress: i32,
        status: DerivedStatus,
    ) -> Self {
        WsEvent::HistoryAppended(HistoryChangedPayload {
            job_id,
            entry_id,
            progress,
            status,
        })
    }

    pub fn history_deleted(
        job_id: Uuid,
        entry_id: Uuid,
        progress: i32,
        status: DerivedStatus,
    ) -> Self {
        WsEvent::HistoryDeleted(HistoryChangedPayload {
            job_id,
            entry_id,
            progress,
            status,
        })
    }
}

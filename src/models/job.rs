//! Job models for the pipeline job API.
//!
//! Jobs are owned by the backend orchestration service. The frontend only
//! ever reads them; the single write operation (cancellation) is a
//! side-effecting request, not a local mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a pipeline job.
///
/// A poll may observe any status, including a skip straight to a terminal
/// one; consumers must not assume they see every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Downloading,
    Running,
    ClassificationPending,
    ClassificationComplete,
    Uploading,
    CancellationRequested,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Downloading => "downloading",
            Self::Running => "running",
            Self::ClassificationPending => "classification_pending",
            Self::ClassificationComplete => "classification_complete",
            Self::Uploading => "uploading",
            Self::CancellationRequested => "cancellation_requested",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "downloading" => Some(Self::Downloading),
            "running" => Some(Self::Running),
            "classification_pending" => Some(Self::ClassificationPending),
            "classification_complete" => Some(Self::ClassificationComplete),
            "uploading" => Some(Self::Uploading),
            "cancellation_requested" => Some(Self::CancellationRequested),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether this status stops an active poll loop.
    ///
    /// `classification_complete` is not in this set: human review has
    /// finished but integration is still pending, so further transitions
    /// will arrive and polling must continue.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether final results can be fetched for a job in this status.
    pub fn results_available(&self) -> bool {
        matches!(self, Self::Completed | Self::ClassificationComplete)
    }

    /// Whether a cancellation request makes sense for this status.
    pub fn is_cancellable(&self) -> bool {
        !self.is_terminal() && !matches!(self, Self::CancellationRequested)
    }
}

/// A pipeline job as reported by `GET /api/jobs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Opaque identifier assigned by the backend at creation time.
    pub id: String,
    pub status: JobStatus,
    pub doc_name: String,
    /// Fine-grained stage label reported by the backend, when it has one.
    pub current_stage: Option<String>,
    /// Server-reported progress, 0-100.
    #[serde(default)]
    pub progress_percent: u8,
    /// Free-text human-readable status message.
    #[serde(default)]
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// URL of the results manifest, present once results exist.
    pub manifest_url: Option<String>,
    pub error_message: Option<String>,
}

impl Job {
    /// Elapsed wall-clock time, using completion time when the job is done.
    pub fn elapsed(&self) -> chrono::Duration {
        let start = self.started_at.unwrap_or(self.created_at);
        let end = self.completed_at.unwrap_or_else(Utc::now);
        end - start
    }
}

/// Body for `POST /api/jobs/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreateRequest {
    pub job_id: String,
    pub input_url: String,
    pub doc_name: String,
    #[serde(default)]
    pub config_overrides: serde_json::Value,
}

impl JobCreateRequest {
    /// Create a request with a fresh job id.
    pub fn new(input_url: String, doc_name: String, config_overrides: serde_json::Value) -> Self {
        Self {
            job_id: uuid::Uuid::new_v4().to_string(),
            input_url,
            doc_name,
            config_overrides,
        }
    }
}

/// Body of a successful `POST /api/jobs/{id}/cancel`.
///
/// Older backends report the job id as `run_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelResponse {
    #[serde(alias = "run_id")]
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [JobStatus; 10] = [
        JobStatus::Pending,
        JobStatus::Downloading,
        JobStatus::Running,
        JobStatus::ClassificationPending,
        JobStatus::ClassificationComplete,
        JobStatus::Uploading,
        JobStatus::CancellationRequested,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ];

    #[test]
    fn test_status_roundtrip() {
        for status in ALL_STATUSES {
            let s = status.as_str();
            assert_eq!(JobStatus::from_str(s), Some(status));
        }
    }

    #[test]
    fn test_status_from_invalid() {
        assert_eq!(JobStatus::from_str("unknown"), None);
        assert_eq!(JobStatus::from_str(""), None);
    }

    #[test]
    fn test_terminal_set() {
        let terminal: Vec<_> = ALL_STATUSES.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![&JobStatus::Completed, &JobStatus::Failed, &JobStatus::Cancelled]
        );
    }

    #[test]
    fn test_classification_complete_is_not_poll_terminal() {
        assert!(!JobStatus::ClassificationComplete.is_terminal());
        assert!(JobStatus::ClassificationComplete.results_available());
    }

    #[test]
    fn test_results_available() {
        assert!(JobStatus::Completed.results_available());
        assert!(!JobStatus::Failed.results_available());
        assert!(!JobStatus::Running.results_available());
    }

    #[test]
    fn test_is_cancellable() {
        assert!(JobStatus::Running.is_cancellable());
        assert!(JobStatus::Pending.is_cancellable());
        assert!(!JobStatus::CancellationRequested.is_cancellable());
        assert!(!JobStatus::Completed.is_cancellable());
        assert!(!JobStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&JobStatus::ClassificationPending).unwrap();
        assert_eq!(json, "\"classification_pending\"");
        let parsed: JobStatus = serde_json::from_str("\"cancellation_requested\"").unwrap();
        assert_eq!(parsed, JobStatus::CancellationRequested);
    }

    #[test]
    fn test_job_decode_wire_shape() {
        let json = r#"{
            "id": "j-123",
            "status": "running",
            "doc_name": "report.pdf",
            "current_stage": "enrichment",
            "progress_percent": 40,
            "message": "Enriching tables",
            "created_at": "2025-06-01T10:00:00Z",
            "started_at": "2025-06-01T10:00:05Z",
            "completed_at": null,
            "manifest_url": null,
            "error_message": null
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, "j-123");
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.current_stage.as_deref(), Some("enrichment"));
        assert_eq!(job.progress_percent, 40);
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_job_decode_missing_optional_fields() {
        let json = r#"{
            "id": "j-1",
            "status": "pending",
            "doc_name": "a.pdf",
            "current_stage": null,
            "created_at": "2025-06-01T10:00:00Z",
            "started_at": null,
            "completed_at": null,
            "manifest_url": null,
            "error_message": null
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.progress_percent, 0);
        assert_eq!(job.message, "");
    }

    #[test]
    fn test_cancel_response_run_id_alias() {
        let json = r#"{"run_id": "j-9", "status": "cancellation_requested", "message": "ok"}"#;
        let resp: CancelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, "j-9");
        assert_eq!(resp.status, JobStatus::CancellationRequested);

        let json = r#"{"id": "j-9", "status": "cancelled"}"#;
        let resp: CancelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, "j-9");
        assert_eq!(resp.message, "");
    }

    #[test]
    fn test_create_request_generates_unique_ids() {
        let a = JobCreateRequest::new("u".into(), "d".into(), serde_json::json!({}));
        let b = JobCreateRequest::new("u".into(), "d".into(), serde_json::json!({}));
        assert_ne!(a.job_id, b.job_id);
    }
}

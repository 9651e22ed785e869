//! Stage projection for pipeline progress display.
//!
//! Maps a job's status (and the backend's optional fine-grained stage label)
//! onto a fixed ordered catalogue of display stages. Projection is a pure
//! function of its input: no I/O, no mutable state. The pipeline drives all
//! transitions; this module only labels the currently reported one.

use serde::{Deserialize, Serialize};

use crate::models::{Job, JobStatus};

/// Ordered display stages. The canonical catalogue includes the transfer
/// stages (downloading/uploading) at both ends; progress arithmetic is
/// anchored so queued shows 0 and complete shows exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Queued,
    Downloading,
    Detection,
    Intake,
    Classification,
    Enrichment,
    Integration,
    Uploading,
    Complete,
}

/// The stage catalogue in pipeline order.
pub const STAGES: [Stage; 9] = [
    Stage::Queued,
    Stage::Downloading,
    Stage::Detection,
    Stage::Intake,
    Stage::Classification,
    Stage::Enrichment,
    Stage::Integration,
    Stage::Uploading,
    Stage::Complete,
];

impl Stage {
    /// Zero-based position in the catalogue.
    pub fn order(&self) -> usize {
        STAGES.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Stable key matching the backend's fine-grained stage labels.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Downloading => "downloading",
            Self::Detection => "detection",
            Self::Intake => "intake",
            Self::Classification => "classification",
            Self::Enrichment => "enrichment",
            Self::Integration => "integration",
            Self::Uploading => "uploading",
            Self::Complete => "complete",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Downloading => "Downloading",
            Self::Detection => "Detection",
            Self::Intake => "Intake",
            Self::Classification => "Classification",
            Self::Enrichment => "Enrichment",
            Self::Integration => "Integration",
            Self::Uploading => "Uploading",
            Self::Complete => "Complete",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        STAGES.iter().copied().find(|s| s.key() == key)
    }
}

/// Derived view of a job's pipeline position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageProjection {
    pub current: Stage,
    pub label: &'static str,
    /// 0-100, anchored to the catalogue bounds.
    pub progress: u8,
    /// True iff integration JSON is guaranteed present (status `completed`
    /// exactly; `classification_complete` does not qualify).
    pub json_ready: bool,
    pub message: String,
    pub completed: Vec<Stage>,
    pub upcoming: Vec<Stage>,
    pub complete: bool,
}

/// Progress percentage for a stage index within a catalogue of `len`
/// entries: `round(index / (len - 1) * 100)`. The first entry is exactly 0
/// and the last exactly 100 for any catalogue of length >= 2.
fn progress_between(index: usize, len: usize) -> u8 {
    debug_assert!(len >= 2 && index < len);
    ((index as f64 / (len - 1) as f64) * 100.0).round() as u8
}

/// Coarse fallback when the backend reports no usable fine-grained stage.
///
/// Failed and cancelled fold onto the detection label here; the fine-grained
/// stage takes precedence whenever the backend reports one, so this entry
/// only shows for jobs that died before reporting any stage.
fn stage_for_status(status: JobStatus) -> Stage {
    match status {
        JobStatus::Pending => Stage::Queued,
        JobStatus::Downloading => Stage::Downloading,
        JobStatus::Running => Stage::Detection,
        JobStatus::ClassificationPending => Stage::Classification,
        JobStatus::ClassificationComplete => Stage::Enrichment,
        JobStatus::Uploading => Stage::Uploading,
        JobStatus::Completed => Stage::Complete,
        JobStatus::CancellationRequested | JobStatus::Failed | JobStatus::Cancelled => {
            Stage::Detection
        }
    }
}

fn default_message(stage: Stage) -> String {
    match stage {
        Stage::Queued => "Waiting for the pipeline to pick up the job".to_string(),
        Stage::Complete => "Processing complete".to_string(),
        _ => format!("{} in progress", stage.label()),
    }
}

/// Project a job (or its absence) onto the stage catalogue.
pub fn project(job: Option<&Job>) -> StageProjection {
    let Some(job) = job else {
        return projection_for(Stage::Queued, None, default_message(Stage::Queued), false);
    };

    let current = job
        .current_stage
        .as_deref()
        .and_then(Stage::from_key)
        .unwrap_or_else(|| stage_for_status(job.status));

    let message = match (&job.error_message, job.message.is_empty()) {
        (Some(err), _) if job.status == JobStatus::Failed => err.clone(),
        (_, false) => job.message.clone(),
        _ => default_message(current),
    };

    projection_for(current, Some(job.status), message, job.status == JobStatus::Completed)
}

fn projection_for(
    current: Stage,
    status: Option<JobStatus>,
    message: String,
    complete: bool,
) -> StageProjection {
    let order = current.order();
    StageProjection {
        current,
        label: current.label(),
        progress: progress_between(order, STAGES.len()),
        json_ready: status == Some(JobStatus::Completed),
        message,
        completed: STAGES.iter().copied().filter(|s| s.order() < order).collect(),
        upcoming: STAGES.iter().copied().filter(|s| s.order() > order).collect(),
        complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(status: JobStatus) -> Job {
        Job {
            id: "j-1".to_string(),
            status,
            doc_name: "report.pdf".to_string(),
            current_stage: None,
            progress_percent: 0,
            message: String::new(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            manifest_url: None,
            error_message: None,
        }
    }

    #[test]
    fn test_null_input_queued_projection() {
        let p = project(None);
        assert_eq!(p.current, Stage::Queued);
        assert_eq!(p.progress, 0);
        assert!(!p.complete);
        assert!(!p.json_ready);
        assert!(p.completed.is_empty());
        assert_eq!(p.upcoming.len(), STAGES.len() - 1);
    }

    #[test]
    fn test_progress_anchoring() {
        assert_eq!(progress_between(0, STAGES.len()), 0);
        assert_eq!(progress_between(STAGES.len() - 1, STAGES.len()), 100);
    }

    #[test]
    fn test_progress_anchoring_any_catalogue_length() {
        for len in 2..12 {
            assert_eq!(progress_between(0, len), 0, "len {}", len);
            assert_eq!(progress_between(len - 1, len), 100, "len {}", len);
        }
    }

    #[test]
    fn test_progress_monotonic() {
        let mut last = 0;
        for (i, _) in STAGES.iter().enumerate().skip(1) {
            let p = progress_between(i, STAGES.len());
            assert!(p > last);
            last = p;
        }
    }

    #[test]
    fn test_fine_grained_stage_wins_over_status() {
        let mut j = job(JobStatus::Running);
        j.current_stage = Some("enrichment".to_string());
        let p = project(Some(&j));
        assert_eq!(p.current, Stage::Enrichment);
    }

    #[test]
    fn test_unknown_stage_label_falls_back_to_status() {
        let mut j = job(JobStatus::ClassificationPending);
        j.current_stage = Some("warp_drive".to_string());
        let p = project(Some(&j));
        assert_eq!(p.current, Stage::Classification);
    }

    #[test]
    fn test_status_fallback_table() {
        let cases = [
            (JobStatus::Pending, Stage::Queued),
            (JobStatus::Downloading, Stage::Downloading),
            (JobStatus::Running, Stage::Detection),
            (JobStatus::ClassificationPending, Stage::Classification),
            (JobStatus::ClassificationComplete, Stage::Enrichment),
            (JobStatus::Uploading, Stage::Uploading),
            (JobStatus::Completed, Stage::Complete),
            (JobStatus::Failed, Stage::Detection),
            (JobStatus::Cancelled, Stage::Detection),
            (JobStatus::CancellationRequested, Stage::Detection),
        ];
        for (status, expected) in cases {
            let p = project(Some(&job(status)));
            assert_eq!(p.current, expected, "status {:?}", status);
        }
    }

    #[test]
    fn test_json_ready_only_for_completed() {
        assert!(project(Some(&job(JobStatus::Completed))).json_ready);
        assert!(!project(Some(&job(JobStatus::ClassificationComplete))).json_ready);
        assert!(!project(Some(&job(JobStatus::Failed))).json_ready);
        assert!(!project(None).json_ready);
    }

    #[test]
    fn test_completed_and_upcoming_exclude_current() {
        let mut j = job(JobStatus::Running);
        j.current_stage = Some("classification".to_string());
        let p = project(Some(&j));
        assert!(!p.completed.contains(&Stage::Classification));
        assert!(!p.upcoming.contains(&Stage::Classification));
        assert_eq!(p.completed.len() + p.upcoming.len(), STAGES.len() - 1);
        assert!(p.completed.iter().all(|s| s.order() < Stage::Classification.order()));
        assert!(p.upcoming.iter().all(|s| s.order() > Stage::Classification.order()));
    }

    #[test]
    fn test_completed_job_reaches_exactly_100() {
        let p = project(Some(&job(JobStatus::Completed)));
        assert_eq!(p.progress, 100);
        assert!(p.complete);
        assert!(p.upcoming.is_empty());
    }

    #[test]
    fn test_purity_identical_input_identical_output() {
        let j = job(JobStatus::Running);
        assert_eq!(project(Some(&j)), project(Some(&j)));
        assert_eq!(project(None), project(None));
    }

    #[test]
    fn test_error_message_preferred_for_failed_jobs() {
        let mut j = job(JobStatus::Failed);
        j.error_message = Some("detector crashed on page 4".to_string());
        j.message = "running".to_string();
        let p = project(Some(&j));
        assert_eq!(p.message, "detector crashed on page 4");
        assert!(!p.complete);
    }

    #[test]
    fn test_backend_message_passes_through() {
        let mut j = job(JobStatus::Running);
        j.message = "Detecting figures".to_string();
        let p = project(Some(&j));
        assert_eq!(p.message, "Detecting figures");
    }

    #[test]
    fn test_stage_key_roundtrip() {
        for stage in STAGES {
            assert_eq!(Stage::from_key(stage.key()), Some(stage));
        }
        assert_eq!(Stage::from_key("nope"), None);
    }
}

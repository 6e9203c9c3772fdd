//! Report assembler: turns selected jobs and their derived state into a
//! printable document structure.
//!
//! Consumes only progress-calculator and analytics outputs; rendering to
//! HTML/PDF belongs to the presentation layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::job;
use crate::models::{DerivedStatus, JobKind};
use crate::services::analytics::{self, QcTrend, TeachTrend};
use crate::services::progress;

/// One job's section in an assembled report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobReportSection {
    pub job_id: Uuid,
    pub kind: JobKind,
    pub owner_name: String,
    pub machine: String,
    pub model: String,
    pub part_number: String,
    pub deadline: NaiveDate,
    pub progress: i32,
    pub status: DerivedStatus,
    /// Field map of the most recent history entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_fields: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_trend: Option<QcTrend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teach_trend: Option<TeachTrend>,
}

/// Assembled report document.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    pub jobs: Vec<JobReportSection>,
}

/// Build one job's report section from its row and ascending history.
pub fn job_section(model: &job::Model, entries_asc: &[JsonValue]) -> Option<JobReportSection> {
    let kind = JobKind::parse(&model.kind)?;
    let latest = entries_asc.last();
    let summary = progress::compute_job_progress(kind, latest, model.target_percentage);
    let target = model
        .target_percentage
        .unwrap_or(progress::DEFAULT_TARGET_PERCENTAGE);

    let (qc_trend, teach_trend) = match kind {
        JobKind::TeachAssembly => (None, Some(analytics::analyze_teach(entries_asc))),
        _ => (Some(analytics::analyze_qc(entries_asc, target)), None),
    };

    Some(JobReportSection {
        job_id: model.id,
        kind,
        owner_name: model.owner_name.clone(),
        machine: model.machine.clone(),
        model: model.model.clone(),
        part_number: model.part_number.clone(),
        deadline: model.deadline,
        progress: summary.progress,
        status: summary.status,
        latest_fields: latest.cloned(),
        qc_trend,
        teach_trend,
    })
}

/// Assemble the report for a selection of jobs.
pub fn assemble(
    jobs: Vec<(job::Model, Vec<JsonValue>)>,
    generated_by: String,
    now: DateTime<Utc>,
) -> ReportDocument {
    let sections = jobs
        .iter()
        .filter_map(|(model, entries)| job_section(model, entries))
        .collect();

    ReportDocument {
        generated_at: now,
        generated_by,
        jobs: sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn qc_job() -> job::Model {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
        job::Model {
            id: Uuid::now_v7(),
            kind: "qc_assembly".to_string(),
            owner_id: "e1".to_string(),
            owner_name: "A. Vargas".to_string(),
            machine: "Press 4".to_string(),
            model: "MX-210".to_string(),
            part_number: "P-1044".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            loan_date: None,
            target_percentage: Some(97.0),
            progress: 98,
            last_updated: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_qc_section_carries_trend_and_latest() {
        let entries = vec![
            json!({"percentage_obtained": 90.0}),
            json!({"percentage_obtained": 98.0}),
        ];
        let section = job_section(&qc_job(), &entries).unwrap();

        assert_eq!(section.progress, 98);
        assert_eq!(section.status, DerivedStatus::Ok);
        assert!(section.teach_trend.is_none());
        let trend = section.qc_trend.unwrap();
        assert_eq!(trend.improvement, Some(8.0));
        assert_eq!(
            section.latest_fields,
            Some(json!({"percentage_obtained": 98.0}))
        );
    }

    #[test]
    fn test_section_for_empty_history() {
        let section = job_section(&qc_job(), &[]).unwrap();
        assert_eq!(section.progress, 0);
        assert_eq!(section.status, DerivedStatus::Pending);
        assert!(section.latest_fields.is_none());
    }

    #[test]
    fn test_assemble_skips_unknown_kind_rows() {
        let mut bad = qc_job();
        bad.kind = "legacy".to_string();
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
        let doc = assemble(
            vec![(qc_job(), vec![]), (bad, vec![])],
            "supervisor".to_string(),
            now,
        );
        assert_eq!(doc.jobs.len(), 1);
        assert_eq!(doc.generated_at, now);
    }
}

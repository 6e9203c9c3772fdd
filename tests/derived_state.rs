//! End-to-end tests for the derived-state pipeline: entry derivation,
//! progress computation, and the job lifecycle driven purely by history
//! changes.

use serde_json::{Value as JsonValue, json};

use assembly_tracker_lib::models::{DerivedStatus, JobKind, JobState};
use assembly_tracker_lib::services::progress::{
    ProgressSummary, compute_job_progress, derive_entry_fields,
};

/// Simulates the append/delete reconciliation flow over an in-memory history
/// log: every mutation recomputes the cached progress from the new latest
/// entry, exactly like the API handlers do against the store.
struct HistoryLog {
    kind: JobKind,
    target: Option<f64>,
    entries: Vec<JsonValue>,
    cached: ProgressSummary,
}

impl HistoryLog {
    fn new(kind: JobKind, target: Option<f64>) -> Self {
        HistoryLog {
            kind,
            target,
            entries: Vec::new(),
            cached: compute_job_progress(kind, None, target),
        }
    }

    fn append(&mut self, raw: JsonValue) {
        let previous = self.entries.last().cloned();
        let fields = derive_entry_fields(
            self.kind,
            &raw,
            previous.as_ref(),
            self.target.unwrap_or(97.0),
        );
        self.entries.push(fields);
        self.recompute();
    }

    fn delete_latest(&mut self) {
        self.entries.pop();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.cached = compute_job_progress(self.kind, self.entries.last(), self.target);
    }

    fn state(&self) -> JobState {
        JobState::from_progress(self.cached.progress, !self.entries.is_empty())
    }
}

#[test]
fn qc_job_walks_through_lifecycle_states() {
    let mut log = HistoryLog::new(JobKind::QcAssembly, Some(97.0));
    assert_eq!(log.state(), JobState::NoHistory);
    assert_eq!(log.cached.progress, 0);
    assert_eq!(log.cached.status, DerivedStatus::Pending);

    log.append(json!({"percentage_obtained": 90.0}));
    assert_eq!(log.state(), JobState::InProgress);
    assert_eq!(log.cached.progress, 90);
    assert_eq!(log.cached.status, DerivedStatus::Ng);

    log.append(json!({"percentage_obtained": 100.0}));
    assert_eq!(log.state(), JobState::Complete);
    assert_eq!(log.cached.status, DerivedStatus::Ok);
}

#[test]
fn deleting_entries_moves_job_backward() {
    let mut log = HistoryLog::new(JobKind::QcAssembly, Some(97.0));
    log.append(json!({"percentage_obtained": 95.0}));
    log.append(json!({"percentage_obtained": 100.0}));
    assert_eq!(log.state(), JobState::Complete);

    // Dropping the completing entry falls back to the previous snapshot.
    log.delete_latest();
    assert_eq!(log.state(), JobState::InProgress);
    assert_eq!(log.cached.progress, 95);

    // Deleting the only remaining entry resets to the initial state.
    log.delete_latest();
    assert_eq!(log.state(), JobState::NoHistory);
    assert_eq!(log.cached, ProgressSummary::initial());
}

#[test]
fn hotpress_checks_accumulate_across_form_snapshots() {
    let mut log = HistoryLog::new(JobKind::QcHotpress, None);

    log.append(json!({"fit_check": "OK", "fit_percentage": 98}));
    assert_eq!(log.cached.progress, 33);
    assert_eq!(log.cached.status, DerivedStatus::Pending);

    // Each later snapshot carries the earlier sub-checks forward.
    log.append(json!({"seating_check": "OK", "seating_percentage": 97}));
    assert_eq!(log.cached.progress, 67);
    assert_eq!(log.cached.status, DerivedStatus::Pending);

    log.append(json!({"extra_adjustments_check": "OK", "extra_adjustments_percentage": 99}));
    assert_eq!(log.cached.progress, 100);
    assert_eq!(log.cached.status, DerivedStatus::Ok);
    assert_eq!(log.entries.last().unwrap().get("status"), Some(&json!("OK")));
}

#[test]
fn teach_job_completes_by_filling_every_field() {
    let mut log = HistoryLog::new(JobKind::TeachAssembly, None);

    log.append(json!({
        "time_baseline_jig1": 12.0,
        "time_achieved_jig1": 9.0,
        "destructive_parts_jig1": 3,
        "destructive_result_jig1": "OK",
    }));
    assert_eq!(log.cached.progress, 50);
    // TEACH never produces a unified pass/fail.
    assert_eq!(log.cached.status, DerivedStatus::Pending);

    log.append(json!({
        "time_baseline_jig1": 12.0,
        "time_achieved_jig1": 9.0,
        "destructive_parts_jig1": 3,
        "destructive_result_jig1": "OK",
        "time_baseline_jig2": 8.0,
        "time_achieved_jig2": 6.0,
        "destructive_parts_jig2": 2,
        "destructive_result_jig2": "NG",
    }));
    assert_eq!(log.cached.progress, 100);
    assert_eq!(log.state(), JobState::Complete);

    // Derived improvements landed on the stored entry.
    let latest = log.entries.last().unwrap();
    assert_eq!(latest.get("improvement_pct_jig1"), Some(&json!(25.0)));
    assert_eq!(latest.get("improvement_pct_jig2"), Some(&json!(25.0)));
}

#[test]
fn teach_zero_baseline_never_yields_non_finite_improvement() {
    let mut log = HistoryLog::new(JobKind::TeachAssembly, None);
    log.append(json!({"time_baseline_jig1": 0, "time_achieved_jig1": 5}));

    let latest = log.entries.last().unwrap();
    assert!(latest.get("improvement_pct_jig1").is_none());
    // The inputs still count toward fill-ratio progress.
    assert_eq!(log.cached.progress, 25);
}

#[test]
fn target_change_reclassifies_on_read_without_touching_entries() {
    let mut log = HistoryLog::new(JobKind::QcAssembly, Some(97.0));
    log.append(json!({"percentage_obtained": 95.0}));
    assert_eq!(log.cached.status, DerivedStatus::Ng);
    // Entry snapshot keeps the classification from save time.
    assert_eq!(log.entries.last().unwrap().get("status"), Some(&json!("NG")));

    // Lowering the target flips the displayed status on the next read.
    log.target = Some(90.0);
    log.recompute();
    assert_eq!(log.cached.status, DerivedStatus::Ok);
    assert_eq!(log.entries.last().unwrap().get("status"), Some(&json!("NG")));
}

#[test]
fn laser_hotpress_follows_assembly_test_verdict() {
    let mut log = HistoryLog::new(JobKind::LaserHotpress, None);

    log.append(json!({"percentage_obtained": 85, "punch_change_point": "P-77"}));
    assert_eq!(log.cached.progress, 85);
    assert_eq!(log.cached.status, DerivedStatus::Pending);

    log.append(json!({"percentage_obtained": 100, "assembly_test": "NG"}));
    assert_eq!(log.cached.progress, 100);
    assert_eq!(log.cached.status, DerivedStatus::Ng);
}

//! History analytics: trend statistics over a job's full ordered history.
//!
//! All functions take entry field maps in ascending creation order and never
//! fail on missing or malformed data: each derived value is independently
//! optional and simply omitted when its inputs are incomplete.

use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::models::{DerivedStatus, JobKind};
use crate::services::progress::{check_field, numeric_field};

/// Trend statistics for percentage-driven (QC) histories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct QcTrend {
    /// Every entry in the history, including non-numeric ones.
    pub total_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Mean percentage, rounded to 2 decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    /// last - first, sign preserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement: Option<f64>,
    /// Whether the latest percentage meets the job's target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reached_goal: Option<bool>,
}

/// Trend statistics for one TEACH jig's improvement series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct JigTrend {
    /// Entries carrying an improvement value for this jig.
    pub samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    /// Improvement from the most recent entry that has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_improvement: Option<f64>,
}

/// Destructive-test tallies across both jigs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DestructiveTestSummary {
    pub ok: usize,
    pub ng: usize,
    /// Counted results (each entry contributes 0, 1, or 2).
    pub total: usize,
    /// ok / (ok + ng) * 100, rounded to 1 decimal; 0 when total is 0.
    pub success_rate: f64,
}

/// Full TEACH trend report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct TeachTrend {
    pub total_records: usize,
    pub jig1: JigTrend,
    pub jig2: JigTrend,
    pub destructive_tests: DestructiveTestSummary,
}

/// Percentage variation between one history row and its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct VariationDelta {
    pub delta: f64,
    pub improved: bool,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Series statistics for QC histories.
///
/// Percentages are parsed as floats; entries without a parsable
/// `percentage_obtained` are excluded from every statistic but still counted
/// in `total_records`. `reached_goal` compares the latest percentage against
/// the job's configurable target.
pub fn analyze_qc(entries_asc: &[JsonValue], target: f64) -> QcTrend {
    let values: Vec<f64> = entries_asc
        .iter()
        .filter_map(|fields| numeric_field(fields, "percentage_obtained"))
        .collect();

    let mut trend = QcTrend {
        total_records: entries_asc.len(),
        ..QcTrend::default()
    };

    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return trend;
    };

    trend.first = Some(*first);
    trend.last = Some(*last);
    trend.min = values.iter().copied().reduce(f64::min);
    trend.max = values.iter().copied().reduce(f64::max);
    trend.avg = Some(round2(values.iter().sum::<f64>() / values.len() as f64));
    trend.improvement = Some(round2(last - first));
    trend.reached_goal = Some(*last >= target);
    trend
}

fn jig_trend(entries_asc: &[JsonValue], jig: &str) -> JigTrend {
    let field = format!("improvement_pct_{}", jig);
    let values: Vec<f64> = entries_asc
        .iter()
        .filter_map(|fields| numeric_field(fields, &field))
        .collect();

    JigTrend {
        samples: values.len(),
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
        avg: (!values.is_empty())
            .then(|| round2(values.iter().sum::<f64>() / values.len() as f64)),
        last_improvement: values.last().copied(),
    }
}

fn destructive_tests(entries_asc: &[JsonValue]) -> DestructiveTestSummary {
    let mut ok = 0;
    let mut ng = 0;

    // Each entry's jig1 and jig2 results are counted independently.
    for fields in entries_asc {
        for field in ["destructive_result_jig1", "destructive_result_jig2"] {
            match check_field(fields, field) {
                Some(DerivedStatus::Ok) => ok += 1,
                Some(DerivedStatus::Ng) => ng += 1,
                _ => {}
            }
        }
    }

    let total = ok + ng;
    let success_rate = if total == 0 {
        0.0
    } else {
        round1(ok as f64 / total as f64 * 100.0)
    };

    DestructiveTestSummary {
        ok,
        ng,
        total,
        success_rate,
    }
}

/// Per-jig improvement statistics plus destructive-test pass rates.
pub fn analyze_teach(entries_asc: &[JsonValue]) -> TeachTrend {
    TeachTrend {
        total_records: entries_asc.len(),
        jig1: jig_trend(entries_asc, "jig1"),
        jig2: jig_trend(entries_asc, "jig2"),
        destructive_tests: destructive_tests(entries_asc),
    }
}

/// "Variation vs previous" indicator for one history row.
///
/// Defined only for QC assembly entries where both rows carry a numeric
/// percentage; callers omit the indicator otherwise.
pub fn consecutive_delta(
    kind: JobKind,
    current: &JsonValue,
    previous: &JsonValue,
) -> Option<VariationDelta> {
    if kind != JobKind::QcAssembly {
        return None;
    }
    let current = numeric_field(current, "percentage_obtained")?;
    let previous = numeric_field(previous, "percentage_obtained")?;
    let delta = round2(current - previous);
    Some(VariationDelta {
        delta,
        improved: delta > 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn qc_entry(pct: f64) -> JsonValue {
        json!({"percentage_obtained": pct})
    }

    #[test]
    fn test_qc_trend_scenario() {
        // Oldest to newest: 90, 95, 98 against a target of 97.
        let entries = vec![qc_entry(90.0), qc_entry(95.0), qc_entry(98.0)];
        let trend = analyze_qc(&entries, 97.0);

        assert_eq!(trend.total_records, 3);
        assert_eq!(trend.first, Some(90.0));
        assert_eq!(trend.last, Some(98.0));
        assert_eq!(trend.min, Some(90.0));
        assert_eq!(trend.max, Some(98.0));
        assert_eq!(trend.avg, Some(94.33));
        assert_eq!(trend.improvement, Some(8.0));
        assert_eq!(trend.reached_goal, Some(true));
    }

    #[test]
    fn test_qc_trend_negative_improvement_keeps_sign() {
        let entries = vec![qc_entry(95.0), qc_entry(91.5)];
        let trend = analyze_qc(&entries, 97.0);
        assert_eq!(trend.improvement, Some(-3.5));
        assert_eq!(trend.reached_goal, Some(false));
    }

    #[test]
    fn test_qc_trend_excludes_non_numeric_but_counts_them() {
        let entries = vec![
            qc_entry(90.0),
            json!({"percentage_obtained": "pending rework"}),
            qc_entry(96.0),
        ];
        let trend = analyze_qc(&entries, 97.0);
        assert_eq!(trend.total_records, 3);
        assert_eq!(trend.avg, Some(93.0));
        assert_eq!(trend.min, Some(90.0));
        assert_eq!(trend.max, Some(96.0));
    }

    #[test]
    fn test_qc_trend_empty_history() {
        let trend = analyze_qc(&[], 97.0);
        assert_eq!(trend.total_records, 0);
        assert_eq!(trend.first, None);
        assert_eq!(trend.improvement, None);
        assert_eq!(trend.reached_goal, None);
    }

    #[test]
    fn test_teach_jig_stats_only_over_entries_with_improvement() {
        let entries = vec![
            json!({"improvement_pct_jig1": 10.0}),
            json!({"destructive_result_jig1": "OK"}),
            json!({"improvement_pct_jig1": 20.0}),
        ];
        let trend = analyze_teach(&entries);
        assert_eq!(trend.jig1.samples, 2);
        assert_eq!(trend.jig1.min, Some(10.0));
        assert_eq!(trend.jig1.max, Some(20.0));
        assert_eq!(trend.jig1.avg, Some(15.0));
        assert_eq!(trend.jig1.last_improvement, Some(20.0));
        assert_eq!(trend.jig2.samples, 0);
        assert_eq!(trend.jig2.last_improvement, None);
    }

    #[test]
    fn test_teach_last_improvement_from_most_recent_entry_with_one() {
        let entries = vec![
            json!({"improvement_pct_jig1": 12.5}),
            json!({"destructive_result_jig1": "NG"}), // literal last entry has none
        ];
        let trend = analyze_teach(&entries);
        assert_eq!(trend.jig1.last_improvement, Some(12.5));
    }

    #[test]
    fn test_destructive_tests_counted_independently() {
        let entries = vec![
            json!({"destructive_result_jig1": "OK", "destructive_result_jig2": "NG"}),
            json!({"destructive_result_jig1": "OK"}),
            json!({"comments": "no tests this round"}),
        ];
        let summary = analyze_teach(&entries).destructive_tests;
        assert_eq!(summary.ok, 2);
        assert_eq!(summary.ng, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success_rate, 66.7);
    }

    #[test]
    fn test_destructive_rate_zero_when_no_tests() {
        let summary = analyze_teach(&[json!({})]).destructive_tests;
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn test_consecutive_delta_qc_only() {
        let delta = consecutive_delta(JobKind::QcAssembly, &qc_entry(95.0), &qc_entry(90.0));
        assert_eq!(
            delta,
            Some(VariationDelta {
                delta: 5.0,
                improved: true
            })
        );

        let delta = consecutive_delta(JobKind::QcAssembly, &qc_entry(90.0), &qc_entry(95.0));
        assert_eq!(
            delta,
            Some(VariationDelta {
                delta: -5.0,
                improved: false
            })
        );

        assert_eq!(
            consecutive_delta(JobKind::TeachAssembly, &qc_entry(95.0), &qc_entry(90.0)),
            None
        );
    }

    #[test]
    fn test_consecutive_delta_undefined_without_both_values() {
        let delta = consecutive_delta(
            JobKind::QcAssembly,
            &qc_entry(95.0),
            &json!({"comments": "no measurement"}),
        );
        assert_eq!(delta, None);
    }
}

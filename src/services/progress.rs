//! Progress calculator: derives entry fields at save time and the cached
//! progress/status of a job from its latest history entry.
//!
//! Everything here is a pure function over plain JSON field maps. Malformed
//! numeric input is treated as absent, never as zero, so a typo can't drag a
//! job's progress down.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;

use crate::models::field_schema::{self, HOTPRESS_CHECKS};
use crate::models::{DerivedStatus, JobKind};

/// Default target percentage for QC kinds when the job carries none.
pub const DEFAULT_TARGET_PERCENTAGE: f64 = 97.0;

/// Result of recomputing a job from its latest entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ProgressSummary {
    /// 0-100 completion percentage.
    pub progress: i32,
    /// Pass/fail/pending classification of the latest entry.
    pub status: DerivedStatus,
}

impl ProgressSummary {
    /// State of a job with no history.
    pub fn initial() -> Self {
        ProgressSummary {
            progress: 0,
            status: DerivedStatus::Pending,
        }
    }
}

/// Read a numeric field, accepting JSON numbers and numeric strings.
///
/// Non-numeric or non-finite values count as absent.
pub fn numeric_field(fields: &JsonValue, name: &str) -> Option<f64> {
    match fields.get(name)? {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Read a tri-state check field: Some(Ok) / Some(Ng) when decided, None when
/// empty, absent, or unrecognized.
pub fn check_field(fields: &JsonValue, name: &str) -> Option<DerivedStatus> {
    let value = fields.get(name)?.as_str()?.trim();
    if value.eq_ignore_ascii_case("OK") {
        Some(DerivedStatus::Ok)
    } else if value.eq_ignore_ascii_case("NG") {
        Some(DerivedStatus::Ng)
    } else {
        None
    }
}

/// Whether a field holds a non-empty value.
fn is_filled(fields: &JsonValue, name: &str) -> bool {
    match fields.get(name) {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn pct_to_progress(pct: f64) -> i32 {
    pct.clamp(0.0, 100.0).round() as i32
}

/// Complete an entry's field map at save time.
///
/// Every schema input field ends up present (absent inputs become empty
/// strings, unknown keys are dropped) and derived fields are added when their
/// inputs allow. For hot-press QC, sub-check values missing from `raw` fall
/// back to `previous` so a single changed check is evaluated together with
/// the other two fields' last-known form state.
pub fn derive_entry_fields(
    kind: JobKind,
    raw: &JsonValue,
    previous: Option<&JsonValue>,
    target: f64,
) -> JsonValue {
    let mut out = Map::new();

    for spec in field_schema::input_fields(kind) {
        let mut value = raw.get(spec.name).filter(|v| !v.is_null()).cloned();

        if value.is_none() && kind == JobKind::QcHotpress {
            value = previous
                .and_then(|p| p.get(spec.name))
                .filter(|v| !v.is_null())
                .cloned();
        }

        out.insert(
            spec.name.to_string(),
            value.unwrap_or_else(|| JsonValue::String(String::new())),
        );
    }

    match kind {
        JobKind::QcAssembly => {
            let fields = JsonValue::Object(out.clone());
            if let Some(pct) = numeric_field(&fields, "percentage_obtained") {
                let status = if pct >= target { "OK" } else { "NG" };
                out.insert("status".to_string(), JsonValue::String(status.to_string()));
            }
        }
        JobKind::TeachAssembly => {
            let fields = JsonValue::Object(out.clone());
            for jig in ["jig1", "jig2"] {
                if let Some(improvement) = jig_improvement(&fields, jig) {
                    out.insert(
                        format!("improvement_pct_{}", jig),
                        json_number(improvement),
                    );
                }
            }
        }
        JobKind::QcHotpress => {
            let fields = JsonValue::Object(out.clone());
            let all_ok = HOTPRESS_CHECKS
                .iter()
                .all(|name| check_field(&fields, name) == Some(DerivedStatus::Ok));
            let status = if all_ok { "OK" } else { "" };
            out.insert("status".to_string(), JsonValue::String(status.to_string()));
        }
        JobKind::LaserHotpress => {}
    }

    JsonValue::Object(out)
}

/// Improvement percentage for one jig: (baseline - achieved) / baseline * 100,
/// rounded to 2 decimals. Undefined when either time is missing or the
/// baseline is zero; never divides by zero.
fn jig_improvement(fields: &JsonValue, jig: &str) -> Option<f64> {
    let baseline = numeric_field(fields, &format!("time_baseline_{}", jig))?;
    let achieved = numeric_field(fields, &format!("time_achieved_{}", jig))?;
    if baseline == 0.0 {
        return None;
    }
    Some(round2((baseline - achieved) / baseline * 100.0))
}

fn json_number(value: f64) -> JsonValue {
    serde_json::Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Compute a job's cached progress and display status from its latest entry.
///
/// Pure and idempotent: the same latest entry always yields the same result.
/// `None` means the job has no history (progress 0, status pending).
pub fn compute_job_progress(
    kind: JobKind,
    latest: Option<&JsonValue>,
    target_percentage: Option<f64>,
) -> ProgressSummary {
    let Some(fields) = latest else {
        return ProgressSummary::initial();
    };
    let target = target_percentage.unwrap_or(DEFAULT_TARGET_PERCENTAGE);

    match kind {
        JobKind::QcAssembly => match numeric_field(fields, "percentage_obtained") {
            Some(pct) => ProgressSummary {
                progress: pct_to_progress(pct),
                status: if pct >= target {
                    DerivedStatus::Ok
                } else {
                    DerivedStatus::Ng
                },
            },
            None => ProgressSummary::initial(),
        },
        JobKind::TeachAssembly => {
            let total = field_schema::input_field_count(kind);
            let filled = field_schema::input_fields(kind)
                .filter(|spec| is_filled(fields, spec.name))
                .count();
            ProgressSummary {
                progress: (100.0 * filled as f64 / total as f64).round() as i32,
                // TEACH has no unified pass/fail; per-jig destructive
                // outcomes surface through history analytics instead.
                status: DerivedStatus::Pending,
            }
        }
        JobKind::QcHotpress => {
            let ok_count = HOTPRESS_CHECKS
                .iter()
                .filter(|name| check_field(fields, name) == Some(DerivedStatus::Ok))
                .count();
            ProgressSummary {
                progress: (100.0 * ok_count as f64 / HOTPRESS_CHECKS.len() as f64).round() as i32,
                status: if ok_count == HOTPRESS_CHECKS.len() {
                    DerivedStatus::Ok
                } else {
                    DerivedStatus::Pending
                },
            }
        }
        JobKind::LaserHotpress => ProgressSummary {
            progress: numeric_field(fields, "percentage_obtained")
                .map(pct_to_progress)
                .unwrap_or(0),
            status: check_field(fields, "assembly_test").unwrap_or(DerivedStatus::Pending),
        },
    }
}

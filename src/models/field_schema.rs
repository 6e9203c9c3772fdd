//! Per-kind field schema for history entry forms.
//!
//! Single source of truth for which fields each job kind carries. The
//! progress calculator, history analytics, storage normalization, and the
//! `/fields/{kind}` endpoint all consult this table; no other field list
//! exists in the codebase.

use serde::Serialize;
use utoipa::ToSchema;

use super::JobKind;

/// Value type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Numeric input (stored as JSON number or numeric string).
    Number,
    /// Tri-state check: "OK", "NG", or "" (pending).
    Check,
    /// Free text.
    Text,
    /// ISO date string.
    Date,
}

/// One field in a kind's entry form.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct FieldSpec {
    /// Storage key inside the entry's `fields` object.
    pub name: &'static str,
    /// Value type.
    pub field_type: FieldType,
    /// Derived fields are computed at save time, never entered by the user.
    pub derived: bool,
}

impl FieldSpec {
    const fn input(name: &'static str, field_type: FieldType) -> Self {
        FieldSpec {
            name,
            field_type,
            derived: false,
        }
    }

    const fn derived(name: &'static str, field_type: FieldType) -> Self {
        FieldSpec {
            name,
            field_type,
            derived: true,
        }
    }
}

const QC_ASSEMBLY_FIELDS: &[FieldSpec] = &[
    FieldSpec::input("percentage_obtained", FieldType::Number),
    FieldSpec::input("comments", FieldType::Text),
    FieldSpec::input("change_point_issued", FieldType::Text),
    FieldSpec::input("report_link", FieldType::Text),
    FieldSpec::derived("status", FieldType::Check),
];

const TEACH_ASSEMBLY_FIELDS: &[FieldSpec] = &[
    FieldSpec::input("time_baseline_jig1", FieldType::Number),
    FieldSpec::input("time_achieved_jig1", FieldType::Number),
    FieldSpec::input("destructive_parts_jig1", FieldType::Number),
    FieldSpec::input("destructive_result_jig1", FieldType::Check),
    FieldSpec::input("time_baseline_jig2", FieldType::Number),
    FieldSpec::input("time_achieved_jig2", FieldType::Number),
    FieldSpec::input("destructive_parts_jig2", FieldType::Number),
    FieldSpec::input("destructive_result_jig2", FieldType::Check),
    FieldSpec::derived("improvement_pct_jig1", FieldType::Number),
    FieldSpec::derived("improvement_pct_jig2", FieldType::Number),
];

const QC_HOTPRESS_FIELDS: &[FieldSpec] = &[
    FieldSpec::input("fit_check", FieldType::Check),
    FieldSpec::input("fit_percentage", FieldType::Number),
    FieldSpec::input("seating_check", FieldType::Check),
    FieldSpec::input("seating_percentage", FieldType::Number),
    FieldSpec::input("extra_adjustments_check", FieldType::Check),
    FieldSpec::input("extra_adjustments_percentage", FieldType::Number),
    FieldSpec::derived("status", FieldType::Check),
];

const LASER_HOTPRESS_FIELDS: &[FieldSpec] = &[
    FieldSpec::input("punch_change_point", FieldType::Text),
    FieldSpec::input("percentage_obtained", FieldType::Number),
    FieldSpec::input("assembly_test", FieldType::Check),
];

/// The three hot-press QC sub-check field names, in display order.
pub const HOTPRESS_CHECKS: &[&str] = &["fit_check", "seating_check", "extra_adjustments_check"];

/// Ordered field list for a job kind.
pub fn fields_for(kind: JobKind) -> &'static [FieldSpec] {
    match kind {
        JobKind::QcAssembly => QC_ASSEMBLY_FIELDS,
        JobKind::TeachAssembly => TEACH_ASSEMBLY_FIELDS,
        JobKind::QcHotpress => QC_HOTPRESS_FIELDS,
        JobKind::LaserHotpress => LASER_HOTPRESS_FIELDS,
    }
}

/// Input (user-entered) fields only.
pub fn input_fields(kind: JobKind) -> impl Iterator<Item = &'static FieldSpec> {
    fields_for(kind).iter().filter(|f| !f.derived)
}

/// Number of input fields; the denominator for TEACH fill-ratio progress.
pub fn input_field_count(kind: JobKind) -> usize {
    input_fields(kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teach_has_eight_input_fields() {
        assert_eq!(input_field_count(JobKind::TeachAssembly), 8);
    }

    #[test]
    fn test_hotpress_checks_are_schema_fields() {
        let names: Vec<&str> = fields_for(JobKind::QcHotpress)
            .iter()
            .map(|f| f.name)
            .collect();
        for check in HOTPRESS_CHECKS {
            assert!(names.contains(check), "missing sub-check {}", check);
        }
    }

    #[test]
    fn test_no_duplicate_field_names() {
        for kind in [
            JobKind::QcAssembly,
            JobKind::TeachAssembly,
            JobKind::QcHotpress,
            JobKind::LaserHotpress,
        ] {
            let mut names: Vec<&str> = fields_for(kind).iter().map(|f| f.name).collect();
            let len = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), len, "duplicate field in {:?}", kind);
        }
    }

    #[test]
    fn test_derived_fields_flagged() {
        let derived: Vec<&str> = fields_for(JobKind::TeachAssembly)
            .iter()
            .filter(|f| f.derived)
            .map(|f| f.name)
            .collect();
        assert_eq!(derived, vec!["improvement_pct_jig1", "improvement_pct_jig2"]);
    }
}

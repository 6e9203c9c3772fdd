//! Dashboard-level tests: trend analytics feeding engineer and fleet
//! roll-ups, over plain job snapshots the way a dashboard load sees them.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::json;

use assembly_tracker_lib::models::JobSnapshot;
use assembly_tracker_lib::services::analytics::analyze_qc;
use assembly_tracker_lib::services::rollup::{rollup_engineers, rollup_fleet};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 8, 30, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot(owner: &str, progress: i32, deadline: NaiveDate, updated_days_ago: i64) -> JobSnapshot {
    JobSnapshot {
        owner_id: owner.to_string(),
        owner_name: owner.to_uppercase(),
        progress,
        deadline,
        last_updated: now() - Duration::days(updated_days_ago),
    }
}

#[test]
fn full_dashboard_pass_over_mixed_fleet() {
    let jobs = vec![
        // mori: one at-risk active job, one fresh completion
        snapshot("mori", 40, date(2026, 6, 4), 0),
        snapshot("mori", 100, date(2026, 5, 20), 2),
        // diaz: overdue active job plus an old completion
        snapshot("diaz", 60, date(2026, 5, 22), 1),
        snapshot("diaz", 100, date(2026, 4, 1), 40),
        // anand: two active jobs, far-off deadlines
        snapshot("anand", 10, date(2026, 7, 1), 3),
        snapshot("anand", 30, date(2026, 7, 15), 3),
    ];

    let fleet = rollup_fleet(&jobs, now());
    assert_eq!(fleet.total_jobs, 6);
    assert_eq!(fleet.active_count, 4);
    assert_eq!(fleet.completed_last_7_days, 1);
    assert_eq!(fleet.average_progress, 35); // (40+60+10+30)/4

    let engineers = rollup_engineers(&jobs, now());
    let order: Vec<&str> = engineers.iter().map(|e| e.engineer_id.as_str()).collect();
    // anand has 2 active; diaz and mori tie at 1 and order by id.
    assert_eq!(order, vec!["anand", "diaz", "mori"]);

    let mori = engineers.iter().find(|e| e.engineer_id == "mori").unwrap();
    assert_eq!(mori.at_risk_count, 1);
    assert_eq!(mori.overdue_count, 0);
    assert_eq!(mori.completed_this_week, 1);
    assert_eq!(mori.completion_rate, 50);

    let diaz = engineers.iter().find(|e| e.engineer_id == "diaz").unwrap();
    assert_eq!(diaz.overdue_count, 1);
    assert_eq!(diaz.at_risk_count, 0);
    assert_eq!(diaz.completed_this_week, 0);
    assert_eq!(diaz.avg_days_to_deadline, -10);
}

#[test]
fn rollup_of_empty_fleet_divides_nothing() {
    let fleet = rollup_fleet(&[], now());
    assert_eq!(fleet.active_count, 0);
    assert_eq!(fleet.average_progress, 0);
    assert!(rollup_engineers(&[], now()).is_empty());
}

#[test]
fn qc_trend_feeds_goal_attainment_from_job_target() {
    // History climbing toward a job-specific target of 95.
    let entries = vec![
        json!({"percentage_obtained": 88.0, "status": "NG"}),
        json!({"percentage_obtained": "92.5", "status": "NG"}),
        json!({"percentage_obtained": 96.0, "status": "OK"}),
    ];

    let trend = analyze_qc(&entries, 95.0);
    assert_eq!(trend.total_records, 3);
    assert_eq!(trend.improvement, Some(8.0));
    assert_eq!(trend.reached_goal, Some(true));

    // Same history against the stricter default target.
    let trend = analyze_qc(&entries, 97.0);
    assert_eq!(trend.reached_goal, Some(false));
}

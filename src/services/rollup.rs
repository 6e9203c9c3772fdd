//! Roll-up aggregator: per-engineer and fleet-wide KPIs.
//!
//! Read-only and recomputed in full on every dashboard load from job
//! snapshots; it never re-reads history and holds no cross-request state.
//! `now` is an explicit input so the whole computation stays deterministic.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{EngineerStats, FleetStats, JobSnapshot};

/// Active jobs due within this many days count as at-risk.
const AT_RISK_WINDOW_DAYS: i64 = 7;

/// Calendar days from `today` until `deadline`; negative when past due.
/// Time-of-day is ignored on both sides.
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

fn rounded_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return None;
    }
    Some(collected.iter().sum::<f64>() / collected.len() as f64)
}

fn within_trailing_week(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    timestamp <= now && now - timestamp <= Duration::days(7)
}

/// Aggregate one engineer's jobs into dashboard KPIs.
pub fn rollup_engineer(
    engineer_id: &str,
    engineer_name: &str,
    jobs: &[&JobSnapshot],
    now: DateTime<Utc>,
) -> EngineerStats {
    let today = now.date_naive();
    let (completed, active): (Vec<&JobSnapshot>, Vec<&JobSnapshot>) =
        jobs.iter().partition(|job| job.progress >= 100);

    let average_progress = rounded_mean(active.iter().map(|job| f64::from(job.progress)))
        .map(|mean| mean.round() as i32)
        .unwrap_or(0);

    let remaining: Vec<i64> = active
        .iter()
        .map(|job| days_remaining(job.deadline, today))
        .collect();

    let at_risk_count = remaining
        .iter()
        .filter(|days| (0..=AT_RISK_WINDOW_DAYS).contains(*days))
        .count();
    let overdue_count = remaining.iter().filter(|days| **days < 0).count();

    let completion_rate = if jobs.is_empty() {
        0
    } else {
        (100.0 * completed.len() as f64 / jobs.len() as f64).round() as i32
    };

    let completed_this_week = completed
        .iter()
        .filter(|job| within_trailing_week(job.last_updated, now))
        .count();

    let avg_days_to_deadline = rounded_mean(remaining.iter().map(|days| *days as f64))
        .map(|mean| mean.round() as i64)
        .unwrap_or(0);

    EngineerStats {
        engineer_id: engineer_id.to_string(),
        engineer_name: engineer_name.to_string(),
        total_jobs: jobs.len(),
        active_jobs: active.len(),
        completed_jobs: completed.len(),
        average_progress,
        at_risk_count,
        overdue_count,
        completion_rate,
        completed_this_week,
        avg_days_to_deadline,
    }
}

/// Aggregate every engineer, ordered for the supervisor listing: descending
/// active-job count, ties broken by ascending engineer id.
pub fn rollup_engineers(jobs: &[JobSnapshot], now: DateTime<Utc>) -> Vec<EngineerStats> {
    let mut by_owner: BTreeMap<&str, (&str, Vec<&JobSnapshot>)> = BTreeMap::new();
    for job in jobs {
        by_owner
            .entry(job.owner_id.as_str())
            .or_insert_with(|| (job.owner_name.as_str(), Vec::new()))
            .1
            .push(job);
    }

    let mut stats: Vec<EngineerStats> = by_owner
        .iter()
        .map(|(owner_id, (owner_name, owned))| rollup_engineer(owner_id, owner_name, owned, now))
        .collect();

    // BTreeMap iteration already yields ascending engineer id, so a stable
    // sort on active count alone keeps that as the tie-break.
    stats.sort_by(|a, b| b.active_jobs.cmp(&a.active_jobs));
    stats
}

/// Fleet-wide KPIs over every job.
pub fn rollup_fleet(jobs: &[JobSnapshot], now: DateTime<Utc>) -> FleetStats {
    let active: Vec<&JobSnapshot> = jobs.iter().filter(|job| job.progress < 100).collect();

    let completed_last_7_days = jobs
        .iter()
        .filter(|job| job.progress >= 100 && within_trailing_week(job.last_updated, now))
        .count();

    let average_progress = rounded_mean(active.iter().map(|job| f64::from(job.progress)))
        .map(|mean| mean.round() as i32)
        .unwrap_or(0);

    FleetStats {
        total_jobs: jobs.len(),
        active_count: active.len(),
        completed_last_7_days,
        average_progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn job(owner: &str, progress: i32, deadline: NaiveDate, last_updated: DateTime<Utc>) -> JobSnapshot {
        JobSnapshot {
            owner_id: owner.to_string(),
            owner_name: format!("Engineer {}", owner.to_uppercase()),
            progress,
            deadline,
            last_updated,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_rollup_is_zeroed() {
        let stats = rollup_engineer("e1", "Engineer E1", &[], now());
        assert_eq!(stats.total_jobs, 0);
        assert_eq!(stats.average_progress, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.avg_days_to_deadline, 0);
    }

    #[test]
    fn test_engineer_scenario_mixed_deadlines() {
        // Two active jobs at 40 and 60: one due in 3 days, one 10 days overdue.
        let jobs = vec![
            job("e1", 40, date(2026, 3, 18), now()),
            job("e1", 60, date(2026, 3, 5), now()),
        ];
        let refs: Vec<&JobSnapshot> = jobs.iter().collect();
        let stats = rollup_engineer("e1", "Engineer E1", &refs, now());

        assert_eq!(stats.active_jobs, 2);
        assert_eq!(stats.average_progress, 50);
        assert_eq!(stats.at_risk_count, 1);
        assert_eq!(stats.overdue_count, 1);
        // (3 + -10) / 2 = -3.5, rounded away from zero.
        assert_eq!(stats.avg_days_to_deadline, -4);
    }

    #[test]
    fn test_days_remaining_ignores_time_of_day() {
        assert_eq!(days_remaining(date(2026, 3, 18), date(2026, 3, 15)), 3);
        assert_eq!(days_remaining(date(2026, 3, 15), date(2026, 3, 15)), 0);
        assert_eq!(days_remaining(date(2026, 3, 5), date(2026, 3, 15)), -10);
    }

    #[test]
    fn test_deadline_today_counts_as_at_risk() {
        let jobs = vec![job("e1", 10, date(2026, 3, 15), now())];
        let refs: Vec<&JobSnapshot> = jobs.iter().collect();
        let stats = rollup_engineer("e1", "Engineer E1", &refs, now());
        assert_eq!(stats.at_risk_count, 1);
        assert_eq!(stats.overdue_count, 0);
    }

    #[test]
    fn test_completion_rate_rounded() {
        let jobs = vec![
            job("e1", 100, date(2026, 4, 1), now()),
            job("e1", 50, date(2026, 4, 1), now()),
            job("e1", 50, date(2026, 4, 1), now()),
        ];
        let refs: Vec<&JobSnapshot> = jobs.iter().collect();
        let stats = rollup_engineer("e1", "Engineer E1", &refs, now());
        assert_eq!(stats.completion_rate, 33);
        assert_eq!(stats.completed_jobs, 1);
    }

    #[test]
    fn test_completed_this_week_window() {
        let recent = now() - Duration::days(3);
        let stale = now() - Duration::days(9);
        let jobs = vec![
            job("e1", 100, date(2026, 3, 1), recent),
            job("e1", 100, date(2026, 3, 1), stale),
        ];
        let refs: Vec<&JobSnapshot> = jobs.iter().collect();
        let stats = rollup_engineer("e1", "Engineer E1", &refs, now());
        assert_eq!(stats.completed_jobs, 2);
        assert_eq!(stats.completed_this_week, 1);
    }

    #[test]
    fn test_overdue_jobs_stay_active() {
        // Overdue is a bucket of active, not a separate state.
        let jobs = vec![job("e1", 95, date(2026, 1, 1), now())];
        let refs: Vec<&JobSnapshot> = jobs.iter().collect();
        let stats = rollup_engineer("e1", "Engineer E1", &refs, now());
        assert_eq!(stats.active_jobs, 1);
        assert_eq!(stats.overdue_count, 1);
        assert!(stats.avg_days_to_deadline < 0);
    }

    #[test]
    fn test_fleet_rollup() {
        let jobs = vec![
            job("e1", 40, date(2026, 3, 20), now()),
            job("e2", 80, date(2026, 3, 20), now()),
            job("e2", 100, date(2026, 3, 1), now() - Duration::days(2)),
            job("e3", 100, date(2026, 3, 1), now() - Duration::days(30)),
        ];
        let fleet = rollup_fleet(&jobs, now());
        assert_eq!(fleet.total_jobs, 4);
        assert_eq!(fleet.active_count, 2);
        assert_eq!(fleet.completed_last_7_days, 1);
        assert_eq!(fleet.average_progress, 60);
    }

    #[test]
    fn test_engineers_ordered_by_active_count_then_id() {
        let jobs = vec![
            job("beta", 10, date(2026, 3, 20), now()),
            job("beta", 20, date(2026, 3, 20), now()),
            job("alpha", 30, date(2026, 3, 20), now()),
            job("gamma", 100, date(2026, 3, 1), now()),
            job("gamma", 40, date(2026, 3, 20), now()),
        ];
        let stats = rollup_engineers(&jobs, now());
        let order: Vec<&str> = stats.iter().map(|s| s.engineer_id.as_str()).collect();
        // beta has 2 active; alpha and gamma tie at 1 and fall back to id order.
        assert_eq!(order, vec!["beta", "alpha", "gamma"]);
    }
}

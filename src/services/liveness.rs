use crate::domain::models::{BusLocation, Connectivity, LivenessStatus};
use chrono::{DateTime, Utc};

/// A bus counts as online while its newest report is at most this old.
/// The window is inclusive: a report exactly five minutes old is online.
pub const ONLINE_WINDOW_SECS: i64 = 5 * 60;

/// Whether a bus should display as online: GPS-equipped, has a report, and
/// the report is inside the window. Future-dated reports count as online;
/// reporter/viewer clock skew is tolerated rather than clamped.
pub fn is_online(report: Option<&BusLocation>, has_gps: bool, now: DateTime<Utc>) -> bool {
    if !has_gps {
        return false;
    }
    match report {
        Some(r) => (now - r.observed_at()).num_seconds() <= ONLINE_WINDOW_SECS,
        None => false,
    }
}

/// Human-facing freshness of the newest report: "No data", "Just now",
/// "{m}m ago" under an hour, "{h}h ago" beyond (hours grow unbounded).
pub fn time_since_label(report: Option<&BusLocation>, now: DateTime<Utc>) -> String {
    let Some(r) = report else {
        return "No data".to_string();
    };
    let minutes = (now - r.observed_at()).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else {
        format!("{}h ago", minutes / 60)
    }
}

/// Combined classification for one bus. The freshness label is computed
/// even when the capability flag forces the bus offline.
pub fn status(report: Option<&BusLocation>, has_gps: bool, now: DateTime<Utc>) -> LivenessStatus {
    let online = is_online(report, has_gps, now);
    LivenessStatus {
        is_online: online,
        label: if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        },
        time_since: time_since_label(report, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn report_at(observed: DateTime<Utc>) -> BusLocation {
        BusLocation {
            id: Uuid::new_v4(),
            bus_id: Uuid::new_v4(),
            latitude: 40.7128,
            longitude: -74.006,
            speed_kmh: 32.0,
            heading_degrees: 90.0,
            accuracy_meters: 5.0,
            created_at: observed,
            updated_at: None,
        }
    }

    #[test]
    fn offline_without_gps_regardless_of_recency() {
        let r = report_at(now());
        assert!(!is_online(Some(&r), false, now()));
    }

    #[test]
    fn offline_without_report() {
        assert!(!is_online(None, true, now()));
        assert_eq!(time_since_label(None, now()), "No data");
    }

    #[test]
    fn fresh_report_is_online_and_just_now() {
        let r = report_at(now());
        assert!(is_online(Some(&r), true, now()));
        assert_eq!(time_since_label(Some(&r), now()), "Just now");
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let r = report_at(now() - Duration::minutes(5));
        assert!(is_online(Some(&r), true, now()));
    }

    #[test]
    fn one_second_past_window_is_offline() {
        let r = report_at(now() - Duration::minutes(5) - Duration::seconds(1));
        assert!(!is_online(Some(&r), true, now()));
    }

    #[test]
    fn future_report_counts_online() {
        let r = report_at(now() + Duration::minutes(10));
        assert!(is_online(Some(&r), true, now()));
        assert_eq!(time_since_label(Some(&r), now()), "Just now");
    }

    #[test]
    fn minute_labels_under_an_hour() {
        let r = report_at(now() - Duration::minutes(4) - Duration::seconds(30));
        assert_eq!(time_since_label(Some(&r), now()), "4m ago");
        let r = report_at(now() - Duration::minutes(59));
        assert_eq!(time_since_label(Some(&r), now()), "59m ago");
    }

    #[test]
    fn hour_labels_floor_and_grow_unbounded() {
        let r = report_at(now() - Duration::minutes(90));
        assert_eq!(time_since_label(Some(&r), now()), "1h ago");
        let r = report_at(now() - Duration::minutes(125));
        assert_eq!(time_since_label(Some(&r), now()), "2h ago");
        let r = report_at(now() - Duration::days(3));
        assert_eq!(time_since_label(Some(&r), now()), "72h ago");
    }

    #[test]
    fn observed_at_prefers_update_time() {
        let mut r = report_at(now() - Duration::hours(2));
        r.updated_at = Some(now() - Duration::minutes(1));
        assert!(is_online(Some(&r), true, now()));
        assert_eq!(time_since_label(Some(&r), now()), "1m ago");
    }

    #[test]
    fn status_composes_online_case() {
        let r = report_at(now() - Duration::minutes(4) - Duration::seconds(30));
        let s = status(Some(&r), true, now());
        assert!(s.is_online);
        assert_eq!(s.label, Connectivity::Online);
        assert_eq!(s.time_since, "4m ago");
    }

    #[test]
    fn status_without_report_is_offline_no_data() {
        let s = status(None, true, now());
        assert!(!s.is_online);
        assert_eq!(s.label, Connectivity::Offline);
        assert_eq!(s.time_since, "No data");
    }

    #[test]
    fn capability_off_still_reports_freshness() {
        let r = report_at(now());
        let s = status(Some(&r), false, now());
        assert!(!s.is_online);
        assert_eq!(s.label, Connectivity::Offline);
        assert_eq!(s.time_since, "Just now");
    }

    #[test]
    fn evaluation_is_stable_for_a_fixed_instant() {
        let r = report_at(now() - Duration::minutes(3));
        assert_eq!(status(Some(&r), true, now()), status(Some(&r), true, now()));
    }
}

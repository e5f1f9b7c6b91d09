use crate::cli::{BusStatus, StatusFilter};
use crate::domain::models::{
    Bus, BusDetailReport, BusLocation, BusRoute, Connectivity, DashboardStats, FleetRow,
    PortalBus, PortalReport, School, Student, TrackedBus, TrackingSnapshot,
};
use crate::services::liveness;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Newest report per bus. The store keeps full report history; every view
/// works off at most one current report per vehicle.
pub fn latest_locations(reports: Vec<BusLocation>) -> HashMap<Uuid, BusLocation> {
    let mut latest: HashMap<Uuid, BusLocation> = HashMap::new();
    for report in reports {
        match latest.get(&report.bus_id) {
            Some(current) if current.observed_at() >= report.observed_at() => {}
            _ => {
                latest.insert(report.bus_id, report);
            }
        }
    }
    latest
}

pub fn school_names(schools: &[School]) -> HashMap<Uuid, String> {
    schools.iter().map(|s| (s.id, s.name.clone())).collect()
}

pub fn fleet_rows(
    buses: &[Bus],
    schools: &[School],
    latest: &HashMap<Uuid, BusLocation>,
    filter: StatusFilter,
    query: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<FleetRow> {
    let names = school_names(schools);
    let q = query.map(|s| s.to_ascii_lowercase());

    buses
        .iter()
        .filter(|b| match &q {
            Some(q) => {
                b.name.to_ascii_lowercase().contains(q)
                    || b.bus_number.to_ascii_lowercase().contains(q)
            }
            None => true,
        })
        .map(|b| {
            let report = latest.get(&b.id);
            let status = liveness::status(report, b.has_gps, now);
            FleetRow {
                id: b.id,
                bus_number: b.bus_number.clone(),
                name: b.name.clone(),
                school: names.get(&b.school_id).cloned().unwrap_or_default(),
                status: b.status,
                connectivity: status.label,
                last_seen: status.time_since,
                speed_kmh: report.map(|r| r.speed_kmh),
            }
        })
        .filter(|row| match filter {
            StatusFilter::All => true,
            StatusFilter::Online => row.connectivity == Connectivity::Online,
            StatusFilter::Offline => row.connectivity == Connectivity::Offline,
        })
        .collect()
}

pub fn dashboard_stats(
    buses: &[Bus],
    students: &[Student],
    latest: &HashMap<Uuid, BusLocation>,
    now: DateTime<Utc>,
) -> DashboardStats {
    DashboardStats {
        total_buses: buses.len(),
        active_buses: buses
            .iter()
            .filter(|b| b.status == BusStatus::Active)
            .count(),
        online_now: buses
            .iter()
            .filter(|b| liveness::is_online(latest.get(&b.id), b.has_gps, now))
            .count(),
        total_students: students.iter().filter(|s| s.is_active).count(),
    }
}

/// Tracking view: GPS-equipped buses only. Buses without any report show
/// up in the offline count but carry no row, since there is no position
/// to plot.
pub fn tracking_snapshot(
    buses: &[Bus],
    latest: &HashMap<Uuid, BusLocation>,
    now: DateTime<Utc>,
) -> TrackingSnapshot {
    let gps_buses: Vec<&Bus> = buses.iter().filter(|b| b.has_gps).collect();
    let mut rows = Vec::new();
    let mut online = 0usize;

    for bus in &gps_buses {
        let Some(report) = latest.get(&bus.id) else {
            continue;
        };
        let status = liveness::status(Some(report), bus.has_gps, now);
        if status.is_online {
            online += 1;
        }
        rows.push(TrackedBus {
            id: bus.id,
            bus_number: bus.bus_number.clone(),
            name: bus.name.clone(),
            latitude: report.latitude,
            longitude: report.longitude,
            speed_kmh: report.speed_kmh,
            heading_degrees: report.heading_degrees,
            connectivity: status.label,
            last_seen: status.time_since,
        });
    }

    TrackingSnapshot {
        tracked: gps_buses.len(),
        online,
        offline: gps_buses.len() - online,
        buses: rows,
    }
}

pub fn bus_detail(
    bus: &Bus,
    schools: &[School],
    latest: &HashMap<Uuid, BusLocation>,
    now: DateTime<Utc>,
) -> BusDetailReport {
    let report = latest.get(&bus.id);
    BusDetailReport {
        bus: bus.clone(),
        school: schools
            .iter()
            .find(|s| s.id == bus.school_id)
            .map(|s| s.name.clone()),
        liveness: liveness::status(report, bus.has_gps, now),
        location: report.cloned(),
    }
}

pub fn portal(
    school: &School,
    buses: &[Bus],
    latest: &HashMap<Uuid, BusLocation>,
    now: DateTime<Utc>,
) -> PortalReport {
    let mut rows = Vec::new();
    let mut online = 0usize;
    for bus in buses.iter().filter(|b| b.school_id == school.id) {
        let report = latest.get(&bus.id);
        let status = liveness::status(report, bus.has_gps, now);
        if status.is_online {
            online += 1;
        }
        rows.push(PortalBus {
            name: bus.name.clone(),
            bus_number: bus.bus_number.clone(),
            connectivity: status.label,
            last_seen: status.time_since,
            latitude: report.map(|r| r.latitude),
            longitude: report.map(|r| r.longitude),
        });
    }
    PortalReport {
        school: school.name.clone(),
        online,
        buses: rows,
    }
}

pub fn find_bus<'a>(buses: &'a [Bus], key: &str) -> Option<&'a Bus> {
    if let Ok(id) = Uuid::parse_str(key) {
        if let Some(bus) = buses.iter().find(|b| b.id == id) {
            return Some(bus);
        }
    }
    buses
        .iter()
        .find(|b| b.bus_number.eq_ignore_ascii_case(key) || b.name.eq_ignore_ascii_case(key))
}

pub fn find_school<'a>(schools: &'a [School], key: &str) -> Option<&'a School> {
    if let Ok(id) = Uuid::parse_str(key) {
        if let Some(school) = schools.iter().find(|s| s.id == id) {
            return Some(school);
        }
    }
    schools.iter().find(|s| s.name.eq_ignore_ascii_case(key))
}

pub fn find_student<'a>(students: &'a [Student], key: &str) -> Option<&'a Student> {
    if let Ok(id) = Uuid::parse_str(key) {
        if let Some(student) = students.iter().find(|s| s.id == id) {
            return Some(student);
        }
    }
    students.iter().find(|s| {
        s.student_number.eq_ignore_ascii_case(key) || s.full_name.eq_ignore_ascii_case(key)
    })
}

pub fn find_route<'a>(routes: &'a [BusRoute], key: &str) -> Option<&'a BusRoute> {
    if let Ok(id) = Uuid::parse_str(key) {
        if let Some(route) = routes.iter().find(|r| r.id == id) {
            return Some(route);
        }
    }
    routes.iter().find(|r| r.name.eq_ignore_ascii_case(key))
}

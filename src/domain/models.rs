use crate::cli::{BusStatus, RouteType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Bus {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub bus_number: String,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub status: BusStatus,
    #[serde(default)]
    pub has_gps: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single telemetry report from a bus-mounted GPS unit (or a simulator
/// standing in for one). Rows are insert-only in practice; the store keeps
/// the full history and callers pick the newest per bus.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BusLocation {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub speed_kmh: f64,
    #[serde(default)]
    pub heading_degrees: f64,
    #[serde(default)]
    pub accuracy_meters: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BusLocation {
    /// Observation instant: update time if the row carries one, else the
    /// creation time.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BusRoute {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub route_type: RouteType,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RouteStop {
    pub id: Uuid,
    pub route_id: Uuid,
    pub stop_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sequence_order: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Student {
    pub id: Uuid,
    pub school_id: Uuid,
    pub student_number: String,
    pub full_name: String,
    #[serde(default)]
    pub grade_level: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Online/offline classification derived from report recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    Online,
    Offline,
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Connectivity::Online => "Online",
            Connectivity::Offline => "Offline",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LivenessStatus {
    pub is_online: bool,
    pub label: Connectivity,
    pub time_since: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct FleetRow {
    pub id: Uuid,
    pub bus_number: String,
    pub name: String,
    pub school: String,
    pub status: BusStatus,
    pub connectivity: Connectivity,
    pub last_seen: String,
    pub speed_kmh: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_buses: usize,
    pub active_buses: usize,
    pub online_now: usize,
    pub total_students: usize,
}

#[derive(Debug, Serialize)]
pub struct TrackedBus {
    pub id: Uuid,
    pub bus_number: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    pub heading_degrees: f64,
    pub connectivity: Connectivity,
    pub last_seen: String,
}

#[derive(Debug, Serialize)]
pub struct TrackingSnapshot {
    pub tracked: usize,
    pub online: usize,
    pub offline: usize,
    pub buses: Vec<TrackedBus>,
}

#[derive(Debug, Serialize)]
pub struct BusDetailReport {
    pub bus: Bus,
    pub school: Option<String>,
    pub liveness: LivenessStatus,
    pub location: Option<BusLocation>,
}

#[derive(Debug, Serialize)]
pub struct PortalBus {
    pub name: String,
    pub bus_number: String,
    pub connectivity: Connectivity,
    pub last_seen: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PortalReport {
    pub school: String,
    pub online: usize,
    pub buses: Vec<PortalBus>,
}

#[derive(Debug, Serialize)]
pub struct RouteRow {
    pub id: Uuid,
    pub name: String,
    pub school: String,
    pub route_type: RouteType,
    pub is_active: bool,
    pub stop_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ExportReport {
    pub target: String,
    pub path: String,
    pub rows: usize,
}

use assert_cmd::Command;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCHOOL_ID: &str = "7a1de818-3bcb-44c0-9fb5-0b2c6a9d6c01";
pub const GPS_BUS_ID: &str = "2f4f8a7e-55aa-4f57-9f93-0d1cb4a1e202";
pub const PLAIN_BUS_ID: &str = "9c0f3d52-6d4e-4b1f-8b8a-55f7b2d4e303";
pub const ROUTE_ID: &str = "c5b8e6a4-2e19-4b57-a7d3-8e9f0a1b2404";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub store: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let store = make_fixture_store(tmp.path());

        Self {
            _tmp: tmp,
            home,
            store,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bustrack").expect("bustrack binary");
        cmd.env("HOME", &self.home)
            .env_remove("BUSTRACK_STORE")
            .env_remove("BUSTRACK_API_KEY")
            .arg("--store")
            .arg(self.store.to_str().expect("store path utf8"));
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

fn make_fixture_store(base: &Path) -> PathBuf {
    let store = base.join("store");
    fs::create_dir_all(&store).expect("create fixture store");

    let created = "2025-03-03T08:00:00Z";
    let recent = (Utc::now() - Duration::minutes(2)).to_rfc3339();
    let older = (Utc::now() - Duration::minutes(20)).to_rfc3339();

    let schools = json!([{
        "id": SCHOOL_ID,
        "name": "Northside Elementary",
        "address": "1 School Lane",
        "city": "Springfield",
        "timezone": "UTC",
        "created_at": created,
        "updated_at": created
    }]);
    fs::write(
        store.join("schools.json"),
        serde_json::to_string_pretty(&schools).expect("serialize schools"),
    )
    .expect("write schools");

    let buses = json!([
        {
            "id": GPS_BUS_ID,
            "school_id": SCHOOL_ID,
            "name": "North Loop",
            "bus_number": "BUS-12",
            "capacity": 48,
            "status": "active",
            "has_gps": true,
            "created_at": created,
            "updated_at": created
        },
        {
            "id": PLAIN_BUS_ID,
            "school_id": SCHOOL_ID,
            "name": "Depot Spare",
            "bus_number": "BUS-7",
            "capacity": 36,
            "status": "maintenance",
            "has_gps": false,
            "created_at": created,
            "updated_at": created
        }
    ]);
    fs::write(
        store.join("buses.json"),
        serde_json::to_string_pretty(&buses).expect("serialize buses"),
    )
    .expect("write buses");

    // Two reports for the GPS bus so views must pick the newest one.
    let locations = json!([
        {
            "id": "0a61a5b7-8c7d-4f7e-b1c2-d3e4f5a6b701",
            "bus_id": GPS_BUS_ID,
            "latitude": 40.7128,
            "longitude": -74.006,
            "speed_kmh": 28.0,
            "heading_degrees": 90.0,
            "accuracy_meters": 5.0,
            "created_at": older
        },
        {
            "id": "1b72b6c8-9d8e-4a8f-c2d3-e4f5a6b7c802",
            "bus_id": GPS_BUS_ID,
            "latitude": 40.7306,
            "longitude": -73.9866,
            "speed_kmh": 32.0,
            "heading_degrees": 45.0,
            "accuracy_meters": 4.0,
            "created_at": recent
        }
    ]);
    fs::write(
        store.join("bus_locations.json"),
        serde_json::to_string_pretty(&locations).expect("serialize locations"),
    )
    .expect("write locations");

    let students = json!([{
        "id": "3d94d8ea-1f0a-4c2b-a4e5-f6a7b8c9d905",
        "school_id": SCHOOL_ID,
        "student_number": "S-100",
        "full_name": "Ada Moreno",
        "grade_level": "4",
        "is_active": true,
        "created_at": created,
        "updated_at": created
    }]);
    fs::write(
        store.join("students.json"),
        serde_json::to_string_pretty(&students).expect("serialize students"),
    )
    .expect("write students");

    let routes = json!([{
        "id": ROUTE_ID,
        "school_id": SCHOOL_ID,
        "name": "Morning A",
        "route_type": "morning",
        "is_active": true,
        "created_at": created,
        "updated_at": created
    }]);
    fs::write(
        store.join("bus_routes.json"),
        serde_json::to_string_pretty(&routes).expect("serialize routes"),
    )
    .expect("write routes");

    let stops = json!([
        {
            "id": "4ea5e9fb-2a1b-4d3c-b5f6-a7b8c9d0ea06",
            "route_id": ROUTE_ID,
            "stop_address": "Main St and 3rd Ave",
            "latitude": 40.71,
            "longitude": -74.0,
            "sequence_order": 2,
            "is_active": true
        },
        {
            "id": "5fb6fa0c-3b2c-4e4d-c6a7-b8c9d0e1fb07",
            "route_id": ROUTE_ID,
            "stop_address": "Oak Rd and 1st Ave",
            "latitude": 40.72,
            "longitude": -73.99,
            "sequence_order": 1,
            "is_active": true
        }
    ]);
    fs::write(
        store.join("route_stops.json"),
        serde_json::to_string_pretty(&stops).expect("serialize stops"),
    )
    .expect("write stops");

    store
}

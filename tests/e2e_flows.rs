use predicates::str::contains;
use serde_json::Value;

mod common;
use common::TestEnv;

#[test]
fn school_and_bus_crud_flow() {
    let env = TestEnv::new();

    let added = env.run_json(&[
        "school",
        "add",
        "Westside Middle",
        "--city",
        "Springfield",
        "--phone",
        "555-0100",
    ]);
    assert_eq!(added["ok"], true);
    let school_id = added["data"]["id"].as_str().expect("school id").to_string();

    let added = env.run_json(&[
        "bus",
        "add",
        "West Loop",
        "--number",
        "BUS-21",
        "--school",
        school_id.as_str(),
        "--capacity",
        "54",
        "--gps",
    ]);
    assert_eq!(added["data"]["bus_number"], "BUS-21");
    assert_eq!(added["data"]["has_gps"], true);

    let listed = env.run_json(&["bus", "list"]);
    let numbers: Vec<&str> = listed["data"]
        .as_array()
        .expect("bus rows")
        .iter()
        .map(|b| b["bus_number"].as_str().unwrap())
        .collect();
    assert!(numbers.contains(&"BUS-21"));

    env.cmd()
        .args(["bus", "update", "BUS-21", "--status", "maintenance"])
        .assert()
        .success()
        .stdout(contains("updated bus"));

    let listed = env.run_json(&["bus", "list"]);
    let row = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["bus_number"] == "BUS-21")
        .expect("updated bus")
        .clone();
    assert_eq!(row["status"], "maintenance");

    let removed = env.run_json(&["bus", "remove", "BUS-21"]);
    assert_eq!(removed["data"], 1);
    let removed_again = env.run_json(&["bus", "remove", "BUS-21"]);
    assert_eq!(removed_again["data"], 0);
}

#[test]
fn report_brings_gps_bus_online() {
    let env = TestEnv::new();

    env.run_json(&[
        "bus",
        "add",
        "East Loop",
        "--number",
        "BUS-30",
        "--school",
        common::SCHOOL_ID,
        "--gps",
    ]);

    // No report yet: offline with no data.
    let offline = env.run_json(&["fleet", "--query", "BUS-30"]);
    assert_eq!(offline["data"][0]["connectivity"], "Offline");
    assert_eq!(offline["data"][0]["last_seen"], "No data");

    env.cmd()
        .args([
            "report", "BUS-30", "--lat", "40.7128", "--lng", "-74.0060", "--speed", "25",
        ])
        .assert()
        .success()
        .stdout(contains("reported BUS-30"));

    let online = env.run_json(&["fleet", "--query", "BUS-30"]);
    assert_eq!(online["data"][0]["connectivity"], "Online");
    assert_eq!(online["data"][0]["last_seen"], "Just now");

    env.cmd()
        .args(["detail", "BUS-30"])
        .assert()
        .success()
        .stdout(contains("connectivity: Online"))
        .stdout(contains("last seen: Just now"))
        .stdout(contains("speed: 25 km/h"));
}

#[test]
fn capability_gates_liveness_even_with_reports() {
    let env = TestEnv::new();

    // BUS-7 has no GPS unit; a report alone must not flip it online.
    env.cmd()
        .args(["report", "BUS-7", "--lat", "40.7", "--lng", "-74.0"])
        .assert()
        .success();

    let row = env.run_json(&["fleet", "--query", "BUS-7"]);
    assert_eq!(row["data"][0]["connectivity"], "Offline");
    assert_eq!(row["data"][0]["last_seen"], "Just now");
}

#[test]
fn export_buses_csv_flow() {
    let env = TestEnv::new();
    let out_path = env.store.join("buses_export.csv");

    env.cmd()
        .args(["export", "buses", "--out", out_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("exported 2 buses rows"));

    let content = std::fs::read_to_string(&out_path).expect("export file");
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Bus Number,Bus Name,School,Status,Model,Manufacturer,Year,Capacity,License Plate,Has GPS"
    );
    assert!(content.contains("BUS-12,North Loop,Northside Elementary,active"));
    assert!(content.contains("BUS-7,Depot Spare,Northside Elementary,maintenance"));
}

#[test]
fn export_quotes_fields_with_commas() {
    let env = TestEnv::new();

    env.run_json(&[
        "school",
        "add",
        "Lincoln, Annex",
        "--address",
        "2 Elm St, Suite 4",
    ]);

    let out_path = env.store.join("schools_export.csv");
    env.cmd()
        .args(["export", "schools", "--out", out_path.to_str().unwrap()])
        .assert()
        .success();

    let content = std::fs::read_to_string(&out_path).expect("export file");
    assert!(content.contains("\"Lincoln, Annex\",\"2 Elm St, Suite 4\""));
}

#[test]
fn portal_scopes_to_school() {
    let env = TestEnv::new();
    let out = env.run_json(&["portal", "Northside Elementary"]);
    assert_eq!(out["data"]["school"], "Northside Elementary");
    assert_eq!(out["data"]["online"], 1);
    let buses = out["data"]["buses"].as_array().expect("portal buses");
    assert_eq!(buses.len(), 2);
}

#[test]
fn route_stops_come_back_in_sequence() {
    let env = TestEnv::new();

    let routes = env.run_json(&["route", "list"]);
    let row = &routes["data"][0];
    assert_eq!(row["name"], "Morning A");
    assert_eq!(row["stop_count"], 2);

    let stops = env.run_json(&["route", "stops", "Morning A"]);
    let orders: Vec<i64> = stops["data"]
        .as_array()
        .expect("stops")
        .iter()
        .map(|s| s["sequence_order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2]);
}

#[test]
fn student_list_filters_by_school() {
    let env = TestEnv::new();

    let other = env.run_json(&["school", "add", "Eastside High"]);
    let other_id = other["data"]["id"].as_str().unwrap().to_string();
    env.run_json(&[
        "student",
        "add",
        "Noor Haddad",
        "--number",
        "S-200",
        "--school",
        other_id.as_str(),
    ]);

    let all: Value = env.run_json(&["student", "list"]);
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let scoped = env.run_json(&["student", "list", "--school", "Eastside High"]);
    let rows = scoped["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["full_name"], "Noor Haddad");
}

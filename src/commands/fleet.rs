use crate::*;
use chrono::Utc;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

pub fn handle_fleet_commands(
    cli: &Cli,
    store: &Store,
    config: &ConfigFile,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Fleet { status, query } => {
            let now = Utc::now();
            let buses = store.buses()?;
            let schools = store.schools()?;
            let latest = latest_locations(store.locations()?);
            let rows = fleet_rows(&buses, &schools, &latest, *status, query.as_deref(), now);
            print_out(cli.json, &rows, |r| {
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    r.bus_number, r.name, r.school, r.status, r.connectivity, r.last_seen
                )
            })?;
        }
        Commands::Dashboard => {
            let now = Utc::now();
            let buses = store.buses()?;
            let students = store.students()?;
            let latest = latest_locations(store.locations()?);
            let stats = dashboard_stats(&buses, &students, &latest, now);
            print_one(cli.json, stats, |s| {
                format!(
                    "buses={} active={} online={} students={}",
                    s.total_buses, s.active_buses, s.online_now, s.total_students
                )
            })?;
        }
        Commands::Track { watch, interval } => {
            let secs = interval.unwrap_or(config.track.interval_secs).max(1);
            if *watch {
                // Fixed-interval refresh; a failed fetch keeps the previous
                // snapshot on screen and the loop going.
                loop {
                    if let Err(e) = render_tracking(cli, store) {
                        tracing::warn!(error = %e, "tracking refresh failed, keeping last snapshot");
                    }
                    std::thread::sleep(std::time::Duration::from_secs(secs));
                }
            }
            render_tracking(cli, store)?;
        }
        Commands::Detail { bus } => {
            let now = Utc::now();
            let buses = store.buses()?;
            let found =
                find_bus(&buses, bus).ok_or_else(|| anyhow::anyhow!("bus not found: {bus}"))?;
            let schools = store.schools()?;
            let latest = latest_locations(store.locations()?);
            let report = bus_detail(found, &schools, &latest, now);
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: &report
                    })?
                );
            } else {
                println!("bus: {} (#{})", report.bus.name, report.bus.bus_number);
                println!("school: {}", report.school.as_deref().unwrap_or("n/a"));
                println!("status: {}", report.bus.status);
                println!(
                    "gps: {}",
                    if report.bus.has_gps {
                        "installed"
                    } else {
                        "not installed"
                    }
                );
                println!("connectivity: {}", report.liveness.label);
                println!("last seen: {}", report.liveness.time_since);
                if let Some(loc) = &report.location {
                    println!("position: {:.5},{:.5}", loc.latitude, loc.longitude);
                    println!("speed: {:.0} km/h", loc.speed_kmh);
                    println!("heading: {:.0}", loc.heading_degrees);
                }
            }
        }
        Commands::Portal { school } => {
            let now = Utc::now();
            let schools = store.schools()?;
            let found = find_school(&schools, school)
                .ok_or_else(|| anyhow::anyhow!("school not found: {school}"))?;
            let buses = store.buses()?;
            let latest = latest_locations(store.locations()?);
            let view = portal(found, &buses, &latest, now);
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: &view
                    })?
                );
            } else {
                println!(
                    "{}: {} buses, {} online",
                    view.school,
                    view.buses.len(),
                    view.online
                );
                for b in &view.buses {
                    println!(
                        "{}\t{}\t{}\t{}",
                        b.bus_number, b.name, b.connectivity, b.last_seen
                    );
                }
            }
        }
        Commands::Report {
            bus,
            lat,
            lng,
            speed,
            heading,
            accuracy,
        } => {
            let buses = store.buses()?;
            let found =
                find_bus(&buses, bus).ok_or_else(|| anyhow::anyhow!("bus not found: {bus}"))?;
            let report = BusLocation {
                id: Uuid::new_v4(),
                bus_id: found.id,
                latitude: *lat,
                longitude: *lng,
                speed_kmh: speed.unwrap_or(0.0),
                heading_degrees: heading.unwrap_or(0.0),
                accuracy_meters: accuracy.unwrap_or(0.0),
                created_at: Utc::now(),
                updated_at: None,
            };
            store.insert_row(BUS_LOCATIONS, &report)?;
            audit(
                "report",
                json!({"bus": found.bus_number, "lat": lat, "lng": lng}),
            );
            tracing::info!(bus = %found.bus_number, "location report recorded");
            let number = found.bus_number.clone();
            print_one(cli.json, report, |r| {
                format!("reported {} at {:.5},{:.5}", number, r.latitude, r.longitude)
            })?;
        }
        Commands::Export { target, out } => {
            let (content, rows) = match target {
                ExportTarget::Buses => {
                    let buses = store.buses()?;
                    if buses.is_empty() {
                        anyhow::bail!("no data to export");
                    }
                    let schools = store.schools()?;
                    (export::buses_csv(&buses, &schools), buses.len())
                }
                ExportTarget::Schools => {
                    let schools = store.schools()?;
                    if schools.is_empty() {
                        anyhow::bail!("no data to export");
                    }
                    (export::schools_csv(&schools), schools.len())
                }
                ExportTarget::Students => {
                    let students = store.students()?;
                    if students.is_empty() {
                        anyhow::bail!("no data to export");
                    }
                    (export::students_csv(&students), students.len())
                }
            };
            let path = out.clone().unwrap_or_else(|| {
                PathBuf::from(format!(
                    "{}_{}.csv",
                    target.as_str(),
                    Utc::now().format("%Y-%m-%d")
                ))
            });
            std::fs::write(&path, &content)?;
            audit(
                "export",
                json!({"target": target.as_str(), "path": path.to_string_lossy()}),
            );
            let report = ExportReport {
                target: target.as_str().to_string(),
                path: path.to_string_lossy().to_string(),
                rows,
            };
            print_one(cli.json, report, |r| {
                format!("exported {} {} rows to {}", r.rows, r.target, r.path)
            })?;
        }
        _ => return Ok(false),
    }

    Ok(true)
}

fn render_tracking(cli: &Cli, store: &Store) -> anyhow::Result<()> {
    let now = Utc::now();
    let buses = store.buses()?;
    let latest = latest_locations(store.locations()?);
    let snap = tracking_snapshot(&buses, &latest, now);
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: &snap
            })?
        );
    } else {
        println!(
            "[{}] tracked={} online={} offline={}",
            now.format("%H:%M:%S"),
            snap.tracked,
            snap.online,
            snap.offline
        );
        for b in &snap.buses {
            println!(
                "{}\t{}\t{}\t{:.5},{:.5}\t{:.0} km/h\t{}",
                b.bus_number, b.name, b.connectivity, b.latitude, b.longitude, b.speed_kmh, b.last_seen
            );
        }
    }
    Ok(())
}

use crate::*;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

pub fn handle_admin_commands(cli: &Cli, store: &Store) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::School { command } => handle_school(cli, store, command)?,
        Commands::Bus { command } => handle_bus(cli, store, command)?,
        Commands::Student { command } => handle_student(cli, store, command)?,
        Commands::Route { command } => handle_route(cli, store, command)?,
        _ => return Ok(false),
    }

    Ok(true)
}

fn resolve_school_id(store: &Store, key: &str) -> anyhow::Result<Uuid> {
    let schools = store.schools()?;
    find_school(&schools, key)
        .map(|s| s.id)
        .ok_or_else(|| anyhow::anyhow!("school not found: {key}"))
}

fn handle_school(cli: &Cli, store: &Store, command: &SchoolCommands) -> anyhow::Result<()> {
    match command {
        SchoolCommands::Add {
            name,
            address,
            city,
            state,
            postal_code,
            country,
            phone,
            email,
            timezone,
        } => {
            let now = Utc::now();
            let school = School {
                id: Uuid::new_v4(),
                name: name.clone(),
                address: address.clone(),
                city: city.clone(),
                state: state.clone(),
                postal_code: postal_code.clone(),
                country: country.clone(),
                phone: phone.clone(),
                email: email.clone(),
                timezone: timezone.clone(),
                created_at: now,
                updated_at: now,
            };
            store.insert_row(SCHOOLS, &school)?;
            audit("school.add", json!({"id": school.id, "name": school.name}));
            print_one(cli.json, school, |s| format!("added school {}", s.name))?;
        }
        SchoolCommands::List => {
            let schools = store.schools()?;
            print_out(cli.json, &schools, |s| {
                format!("{}\t{}\t{}\t{}", s.name, s.city, s.phone, s.email)
            })?;
        }
        SchoolCommands::Update {
            school,
            name,
            phone,
            email,
            address,
        } => {
            let schools = store.schools()?;
            let found = find_school(&schools, school)
                .ok_or_else(|| anyhow::anyhow!("school not found: {school}"))?
                .clone();

            let mut patch = serde_json::Map::new();
            if let Some(v) = name {
                patch.insert("name".to_string(), json!(v));
            }
            if let Some(v) = phone {
                patch.insert("phone".to_string(), json!(v));
            }
            if let Some(v) = email {
                patch.insert("email".to_string(), json!(v));
            }
            if let Some(v) = address {
                patch.insert("address".to_string(), json!(v));
            }
            patch.insert("updated_at".to_string(), json!(Utc::now()));

            store.update_row(SCHOOLS, found.id, &Value::Object(patch))?;
            audit("school.update", json!({"id": found.id}));
            print_one(cli.json, found.id, |id| format!("updated school {id}"))?;
        }
        SchoolCommands::Remove { school } => {
            let schools = store.schools()?;
            let removed = match find_school(&schools, school) {
                Some(found) => {
                    store.delete_row(SCHOOLS, found.id)?;
                    audit("school.remove", json!({"id": found.id}));
                    1
                }
                None => 0,
            };
            print_one(cli.json, removed, |c| format!("removed {c} schools"))?;
        }
    }
    Ok(())
}

fn handle_bus(cli: &Cli, store: &Store, command: &BusCommands) -> anyhow::Result<()> {
    match command {
        BusCommands::Add {
            name,
            number,
            school,
            license_plate,
            capacity,
            model,
            manufacturer,
            year,
            status,
            gps,
        } => {
            let school_id = resolve_school_id(store, school)?;
            let now = Utc::now();
            let bus = Bus {
                id: Uuid::new_v4(),
                school_id,
                name: name.clone(),
                bus_number: number.clone(),
                license_plate: license_plate.clone(),
                capacity: *capacity,
                model: model.clone(),
                manufacturer: manufacturer.clone(),
                year: *year,
                status: *status,
                has_gps: *gps,
                created_at: now,
                updated_at: now,
            };
            store.insert_row(BUSES, &bus)?;
            audit("bus.add", json!({"id": bus.id, "number": bus.bus_number}));
            print_one(cli.json, bus, |b| {
                format!("added bus {} (#{})", b.name, b.bus_number)
            })?;
        }
        BusCommands::List => {
            let buses = store.buses()?;
            print_out(cli.json, &buses, |b| {
                format!(
                    "{}\t{}\t{}\tgps={}",
                    b.bus_number, b.name, b.status, b.has_gps
                )
            })?;
        }
        BusCommands::Update {
            bus,
            name,
            status,
            gps,
            school,
        } => {
            let buses = store.buses()?;
            let found = find_bus(&buses, bus)
                .ok_or_else(|| anyhow::anyhow!("bus not found: {bus}"))?
                .clone();

            let mut patch = serde_json::Map::new();
            if let Some(v) = name {
                patch.insert("name".to_string(), json!(v));
            }
            if let Some(v) = status {
                patch.insert("status".to_string(), json!(v));
            }
            if let Some(v) = gps {
                patch.insert("has_gps".to_string(), json!(v));
            }
            if let Some(key) = school {
                patch.insert("school_id".to_string(), json!(resolve_school_id(store, key)?));
            }
            patch.insert("updated_at".to_string(), json!(Utc::now()));

            store.update_row(BUSES, found.id, &Value::Object(patch))?;
            audit("bus.update", json!({"id": found.id}));
            print_one(cli.json, found.id, |id| format!("updated bus {id}"))?;
        }
        BusCommands::Remove { bus } => {
            let buses = store.buses()?;
            let removed = match find_bus(&buses, bus) {
                Some(found) => {
                    store.delete_row(BUSES, found.id)?;
                    audit("bus.remove", json!({"id": found.id}));
                    1
                }
                None => 0,
            };
            print_one(cli.json, removed, |c| format!("removed {c} buses"))?;
        }
    }
    Ok(())
}

fn handle_student(cli: &Cli, store: &Store, command: &StudentCommands) -> anyhow::Result<()> {
    match command {
        StudentCommands::Add {
            full_name,
            number,
            school,
            grade,
        } => {
            let school_id = resolve_school_id(store, school)?;
            let now = Utc::now();
            let student = Student {
                id: Uuid::new_v4(),
                school_id,
                student_number: number.clone(),
                full_name: full_name.clone(),
                grade_level: grade.clone(),
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            store.insert_row(STUDENTS, &student)?;
            audit(
                "student.add",
                json!({"id": student.id, "number": student.student_number}),
            );
            print_one(cli.json, student, |s| format!("added student {}", s.full_name))?;
        }
        StudentCommands::List { school } => {
            let students = store.students()?;
            let filtered: Vec<Student> = match school {
                Some(key) => {
                    let school_id = resolve_school_id(store, key)?;
                    students
                        .into_iter()
                        .filter(|s| s.school_id == school_id)
                        .collect()
                }
                None => students,
            };
            print_out(cli.json, &filtered, |s| {
                format!("{}\t{}\t{}", s.student_number, s.full_name, s.grade_level)
            })?;
        }
        StudentCommands::Remove { student } => {
            let students = store.students()?;
            let removed = match find_student(&students, student) {
                Some(found) => {
                    store.delete_row(STUDENTS, found.id)?;
                    audit("student.remove", json!({"id": found.id}));
                    1
                }
                None => 0,
            };
            print_one(cli.json, removed, |c| format!("removed {c} students"))?;
        }
    }
    Ok(())
}

fn handle_route(cli: &Cli, store: &Store, command: &RouteCommands) -> anyhow::Result<()> {
    match command {
        RouteCommands::Add {
            name,
            school,
            route_type,
        } => {
            let school_id = resolve_school_id(store, school)?;
            let now = Utc::now();
            let route = BusRoute {
                id: Uuid::new_v4(),
                school_id,
                name: name.clone(),
                route_type: *route_type,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            store.insert_row(BUS_ROUTES, &route)?;
            audit("route.add", json!({"id": route.id, "name": route.name}));
            print_one(cli.json, route, |r| format!("added route {}", r.name))?;
        }
        RouteCommands::List => {
            let routes = store.routes()?;
            let schools = store.schools()?;
            let stops = store.route_stops()?;
            let names = school_names(&schools);
            let rows: Vec<RouteRow> = routes
                .iter()
                .map(|r| RouteRow {
                    id: r.id,
                    name: r.name.clone(),
                    school: names.get(&r.school_id).cloned().unwrap_or_default(),
                    route_type: r.route_type,
                    is_active: r.is_active,
                    stop_count: stops.iter().filter(|s| s.route_id == r.id).count(),
                })
                .collect();
            print_out(cli.json, &rows, |r| {
                format!(
                    "{}\t{}\t{}\t{} stops",
                    r.name, r.school, r.route_type, r.stop_count
                )
            })?;
        }
        RouteCommands::Stops { route } => {
            let routes = store.routes()?;
            let found = find_route(&routes, route)
                .ok_or_else(|| anyhow::anyhow!("route not found: {route}"))?;
            let mut stops: Vec<RouteStop> = store
                .route_stops()?
                .into_iter()
                .filter(|s| s.route_id == found.id)
                .collect();
            stops.sort_by_key(|s| s.sequence_order);
            print_out(cli.json, &stops, |s| {
                format!(
                    "{}\t{}\t{:.5},{:.5}",
                    s.sequence_order, s.stop_address, s.latitude, s.longitude
                )
            })?;
        }
        RouteCommands::Remove { route } => {
            let routes = store.routes()?;
            let removed = match find_route(&routes, route) {
                Some(found) => {
                    store.delete_row(BUS_ROUTES, found.id)?;
                    audit("route.remove", json!({"id": found.id}));
                    1
                }
                None => 0,
            };
            print_one(cli.json, removed, |c| format!("removed {c} routes"))?;
        }
    }
    Ok(())
}

use crate::domain::models::{Bus, School, Student};
use crate::services::fleet::school_names;

/// Quote a CSV field only when it needs it: embedded comma, quote, or
/// newline. Embedded quotes are doubled.
fn field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        lines.push(row.iter().map(|v| field(v)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

pub fn buses_csv(buses: &[Bus], schools: &[School]) -> String {
    let names = school_names(schools);
    let rows: Vec<Vec<String>> = buses
        .iter()
        .map(|b| {
            vec![
                b.bus_number.clone(),
                b.name.clone(),
                names.get(&b.school_id).cloned().unwrap_or_else(|| "N/A".to_string()),
                b.status.to_string(),
                b.model.clone(),
                b.manufacturer.clone(),
                b.year.map(|y| y.to_string()).unwrap_or_default(),
                b.capacity.to_string(),
                b.license_plate.clone(),
                if b.has_gps { "Yes" } else { "No" }.to_string(),
            ]
        })
        .collect();
    render(
        &[
            "Bus Number",
            "Bus Name",
            "School",
            "Status",
            "Model",
            "Manufacturer",
            "Year",
            "Capacity",
            "License Plate",
            "Has GPS",
        ],
        &rows,
    )
}

pub fn schools_csv(schools: &[School]) -> String {
    let rows: Vec<Vec<String>> = schools
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.address.clone(),
                s.city.clone(),
                s.state.clone(),
                s.postal_code.clone(),
                s.country.clone(),
                s.phone.clone(),
                s.email.clone(),
                s.timezone.clone(),
            ]
        })
        .collect();
    render(
        &[
            "School Name",
            "Address",
            "City",
            "State",
            "Postal Code",
            "Country",
            "Phone",
            "Email",
            "Timezone",
        ],
        &rows,
    )
}

pub fn students_csv(students: &[Student]) -> String {
    let rows: Vec<Vec<String>> = students
        .iter()
        .map(|s| {
            vec![
                s.student_number.clone(),
                s.full_name.clone(),
                s.grade_level.clone(),
                if s.is_active { "Yes" } else { "No" }.to_string(),
            ]
        })
        .collect();
    render(
        &["Student Number", "Full Name", "Grade Level", "Is Active"],
        &rows,
    )
}

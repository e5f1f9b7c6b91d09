use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "bustrack", version, about = "School bus fleet tracking CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Data store source (directory of table files, or remote base URL)"
    )]
    pub store: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fleet list with connectivity status
    Fleet {
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        #[arg(long, help = "Filter by bus name or number")]
        query: Option<String>,
    },
    /// Fleet-wide stats summary
    Dashboard,
    /// Tracking snapshot of GPS-equipped buses
    Track {
        #[arg(long, help = "Re-fetch and re-render on a fixed interval")]
        watch: bool,
        #[arg(long, help = "Refresh interval in seconds")]
        interval: Option<u64>,
    },
    /// Single bus detail view
    Detail { bus: String },
    /// Public per-school bus view
    Portal { school: String },
    /// Append a location report for a bus
    Report {
        bus: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        speed: Option<f64>,
        #[arg(long)]
        heading: Option<f64>,
        #[arg(long)]
        accuracy: Option<f64>,
    },
    /// Export a table to CSV
    Export {
        #[arg(value_enum)]
        target: ExportTarget,
        #[arg(long, help = "Output file (defaults to <target>_<date>.csv)")]
        out: Option<std::path::PathBuf>,
    },
    School {
        #[command(subcommand)]
        command: SchoolCommands,
    },
    Bus {
        #[command(subcommand)]
        command: BusCommands,
    },
    Student {
        #[command(subcommand)]
        command: StudentCommands,
    },
    Route {
        #[command(subcommand)]
        command: RouteCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SchoolCommands {
    Add {
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, default_value = "")]
        postal_code: String,
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    List,
    Update {
        school: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    Remove {
        school: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BusCommands {
    Add {
        name: String,
        #[arg(long)]
        number: String,
        #[arg(long, help = "School id or name")]
        school: String,
        #[arg(long, default_value = "")]
        license_plate: String,
        #[arg(long, default_value_t = 48)]
        capacity: u32,
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value = "")]
        manufacturer: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_enum, default_value_t = BusStatus::Active)]
        status: BusStatus,
        #[arg(long, help = "Bus carries a GPS unit")]
        gps: bool,
    },
    List,
    Update {
        bus: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        status: Option<BusStatus>,
        #[arg(long)]
        gps: Option<bool>,
        #[arg(long, help = "School id or name")]
        school: Option<String>,
    },
    Remove {
        bus: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    Add {
        full_name: String,
        #[arg(long)]
        number: String,
        #[arg(long, help = "School id or name")]
        school: String,
        #[arg(long, default_value = "")]
        grade: String,
    },
    List {
        #[arg(long, help = "Restrict to one school")]
        school: Option<String>,
    },
    Remove {
        student: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RouteCommands {
    Add {
        name: String,
        #[arg(long, help = "School id or name")]
        school: String,
        #[arg(long, value_enum, default_value_t = RouteType::Morning)]
        route_type: RouteType,
    },
    List,
    /// Stops of one route, in sequence order
    Stops {
        route: String,
    },
    Remove {
        route: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Online,
    Offline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    Buses,
    Schools,
    Students,
}

impl ExportTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTarget::Buses => "buses",
            ExportTarget::Schools => "schools",
            ExportTarget::Students => "students",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BusStatus {
    #[default]
    Active,
    Maintenance,
    OutOfService,
}

impl std::fmt::Display for BusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BusStatus::Active => "active",
            BusStatus::Maintenance => "maintenance",
            BusStatus::OutOfService => "out_of_service",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    Morning,
    Afternoon,
}

impl std::fmt::Display for RouteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RouteType::Morning => "morning",
            RouteType::Afternoon => "afternoon",
        };
        f.write_str(s)
    }
}

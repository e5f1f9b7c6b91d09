use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod domain;
mod services;
mod store;

pub use cli::{
    BusCommands, BusStatus, Cli, Commands, ExportTarget, RouteCommands, RouteType,
    SchoolCommands, StatusFilter, StudentCommands,
};
pub use domain::models::*;
pub use services::config::{load_config, resolve_api_key, resolve_store_source, ConfigFile};
pub use services::export;
pub use services::fleet::{
    bus_detail, dashboard_stats, find_bus, find_route, find_school, find_student, fleet_rows,
    latest_locations, portal, school_names, tracking_snapshot,
};
pub use services::liveness;
pub use services::output::{print_one, print_out};
pub use services::storage::audit;
pub use store::{Store, BUSES, BUS_LOCATIONS, BUS_ROUTES, ROUTE_STOPS, SCHOOLS, STUDENTS};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config()?;
    let store = Store::new(
        resolve_store_source(cli.store.as_deref(), &config),
        resolve_api_key(&config),
    );

    if commands::handle_admin_commands(&cli, &store)? {
        return Ok(());
    }
    if commands::handle_fleet_commands(&cli, &store, &config)? {
        return Ok(());
    }
    anyhow::bail!("unhandled command")
}

/// Diagnostics go to stderr so `--json` stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

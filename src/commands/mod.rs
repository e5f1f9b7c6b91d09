//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `admin.rs` — school/bus/student/route CRUD trees.
//! - `fleet.rs` — fleet/dashboard/track/detail/portal/report/export.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*` and the store client.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod fleet;

pub use admin::handle_admin_commands;
pub use fleet::handle_fleet_commands;

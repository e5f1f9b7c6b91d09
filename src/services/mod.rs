//! Service layer containing derived-state logic and side-effect helpers.
//!
//! ## Service map
//! - `liveness.rs` — online/offline classification and freshness labels.
//! - `fleet.rs` — newest-report selection and fleet/tracking/portal views.
//! - `export.rs` — CSV rendering for buses/schools/students.
//! - `config.rs` — config file load + flag/env/file precedence.
//! - `storage.rs` — audit log and store cache paths.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible; views take `now` as an argument.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod export;
pub mod fleet;
pub mod liveness;
pub mod output;
pub mod storage;

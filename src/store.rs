use crate::domain::models::{Bus, BusLocation, BusRoute, RouteStop, School, Student};
use crate::services::storage::store_cache_dir;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

pub const SCHOOLS: &str = "schools";
pub const BUSES: &str = "buses";
pub const STUDENTS: &str = "students";
pub const BUS_ROUTES: &str = "bus_routes";
pub const ROUTE_STOPS: &str = "route_stops";
pub const BUS_LOCATIONS: &str = "bus_locations";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("row not found in {0}: {1}")]
    RowNotFound(&'static str, Uuid),
    #[error("malformed table {0}: expected a JSON array of objects")]
    MalformedTable(String),
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Client for the table-oriented data store. A source is either a local
/// directory holding one `<table>.json` array file per table, or a remote
/// base URL serving the same arrays at `GET {base}/{table}`.
///
/// Remote reads refresh a per-table cache file; when a fetch fails the
/// cached copy is served instead, so a flaky backend degrades to stale
/// data rather than an error.
pub struct Store {
    source: String,
    api_key: Option<String>,
}

impl Store {
    pub fn new(source: String, api_key: Option<String>) -> Self {
        Self { source, api_key }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.source.trim_end_matches('/'), table)
    }

    fn table_file(&self, table: &str) -> PathBuf {
        PathBuf::from(&self.source).join(format!("{table}.json"))
    }

    fn cache_path(&self, table: &str) -> anyhow::Result<PathBuf> {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}::{}", self.source, table).as_bytes());
        let id = hex::encode(hasher.finalize());
        Ok(store_cache_dir()?.join(format!("{id}.json")))
    }

    fn client(timeout_ms: u64) -> anyhow::Result<reqwest::blocking::Client> {
        Ok(reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?)
    }

    fn with_auth(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.api_key {
            Some(key) => req
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }

    fn fetch_table_text(&self, table: &str, timeout_ms: u64) -> anyhow::Result<String> {
        let client = Self::client(timeout_ms)?;
        let resp = self
            .with_auth(client.get(self.table_url(table)))
            .send()?
            .error_for_status()?;
        Ok(resp.text()?)
    }

    fn read_table_text(&self, table: &str) -> anyhow::Result<String> {
        if is_remote(&self.source) {
            let cache = self.cache_path(table)?;
            return match self.fetch_table_text(table, 2500) {
                Ok(body) => {
                    if let Some(parent) = cache.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&cache, &body)?;
                    Ok(body)
                }
                Err(e) if cache.exists() => {
                    tracing::warn!(table, error = %e, "store fetch failed, serving cached rows");
                    Ok(std::fs::read_to_string(cache)?)
                }
                Err(e) => Err(e),
            };
        }

        let file = self.table_file(table);
        if !file.exists() {
            return Ok("[]".to_string());
        }
        Ok(std::fs::read_to_string(file)?)
    }

    pub fn read_rows<T: DeserializeOwned>(&self, table: &str) -> anyhow::Result<Vec<T>> {
        let raw = self.read_table_text(table)?;
        serde_json::from_str(&raw)
            .map_err(|_| StoreError::MalformedTable(table.to_string()).into())
    }

    fn raw_rows(&self, table: &str) -> anyhow::Result<Vec<serde_json::Value>> {
        self.read_rows(table)
    }

    fn write_local_rows(&self, table: &str, rows: &[serde_json::Value]) -> anyhow::Result<()> {
        let file = self.table_file(table);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(file, serde_json::to_string_pretty(rows)?)?;
        Ok(())
    }

    pub fn insert_row<T: Serialize>(&self, table: &'static str, row: &T) -> anyhow::Result<()> {
        if is_remote(&self.source) {
            let client = Self::client(5000)?;
            self.with_auth(client.post(self.table_url(table)))
                .json(row)
                .send()?
                .error_for_status()?;
            return Ok(());
        }
        let mut rows = self.raw_rows(table)?;
        rows.push(serde_json::to_value(row)?);
        self.write_local_rows(table, &rows)
    }

    pub fn update_row(
        &self,
        table: &'static str,
        id: Uuid,
        patch: &serde_json::Value,
    ) -> anyhow::Result<()> {
        if is_remote(&self.source) {
            let client = Self::client(5000)?;
            let url = format!("{}?id=eq.{}", self.table_url(table), id);
            self.with_auth(client.patch(url))
                .json(patch)
                .send()?
                .error_for_status()?;
            return Ok(());
        }

        let mut rows = self.raw_rows(table)?;
        let id_str = id.to_string();
        let row = rows
            .iter_mut()
            .find(|r| r.get("id").and_then(|v| v.as_str()) == Some(id_str.as_str()))
            .ok_or(StoreError::RowNotFound(table, id))?;
        if let (Some(obj), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
            for (k, v) in fields {
                obj.insert(k.clone(), v.clone());
            }
        }
        self.write_local_rows(table, &rows)
    }

    pub fn delete_row(&self, table: &'static str, id: Uuid) -> anyhow::Result<()> {
        if is_remote(&self.source) {
            let client = Self::client(5000)?;
            let url = format!("{}?id=eq.{}", self.table_url(table), id);
            self.with_auth(client.delete(url)).send()?.error_for_status()?;
            return Ok(());
        }

        let mut rows = self.raw_rows(table)?;
        let id_str = id.to_string();
        rows.retain(|r| r.get("id").and_then(|v| v.as_str()) != Some(id_str.as_str()));
        self.write_local_rows(table, &rows)
    }

    pub fn schools(&self) -> anyhow::Result<Vec<School>> {
        self.read_rows(SCHOOLS)
    }

    pub fn buses(&self) -> anyhow::Result<Vec<Bus>> {
        self.read_rows(BUSES)
    }

    pub fn students(&self) -> anyhow::Result<Vec<Student>> {
        self.read_rows(STUDENTS)
    }

    pub fn routes(&self) -> anyhow::Result<Vec<BusRoute>> {
        self.read_rows(BUS_ROUTES)
    }

    pub fn route_stops(&self) -> anyhow::Result<Vec<RouteStop>> {
        self.read_rows(ROUTE_STOPS)
    }

    pub fn locations(&self) -> anyhow::Result<Vec<BusLocation>> {
        self.read_rows(BUS_LOCATIONS)
    }
}

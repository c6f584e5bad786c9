use metrics_exporter_prometheus::PrometheusHandle;
use raydar::engine::{Lead, Setter};
use raydar::error::AppError;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
    pub cron_secret: Option<String>,
}

/// A full in-memory snapshot of the lead and setter lists, as exported by the
/// storage layer. Batch commands consume these from disk; the HTTP endpoints
/// receive the same shape inline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snapshot {
    pub(crate) leads: Vec<Lead>,
    pub(crate) users: Vec<Setter>,
}

pub(crate) fn load_snapshot(path: &Path) -> Result<Snapshot, AppError> {
    let file = std::fs::File::open(path)?;
    let snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(snapshot)
}

use crate::costs::CostSummary;
use crate::schedule::ScheduleSummary;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DOCUMENT_FILE_NAME: &str = "README.md";
pub const DEBUG_DUMP_FILE_NAME: &str = "debug-programmazione.json";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct DebugDump<'a> {
    programmazione: &'a ScheduleSummary,
    costi: &'a CostSummary,
}

/// Serialize both calculated results as pretty JSON (two-space indent).
pub fn debug_dump_json(
    schedule: &ScheduleSummary,
    costs: &CostSummary,
) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(&DebugDump {
        programmazione: schedule,
        costi: costs,
    })?)
}

pub fn write_document(path: &Path, document: &str) -> Result<(), OutputError> {
    write_file(path, document)?;
    info!(path = %path.display(), bytes = document.len(), "Document written");
    Ok(())
}

pub fn write_debug_dump(
    path: &Path,
    schedule: &ScheduleSummary,
    costs: &CostSummary,
) -> Result<(), OutputError> {
    let json = debug_dump_json(schedule, costs)?;
    write_file(path, &json)?;
    info!(path = %path.display(), "Debug dump written");
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    fs::write(path, contents).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

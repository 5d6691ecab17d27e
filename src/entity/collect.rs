use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::parse::DataFile;

pub fn parse_data_file(raw: &str) -> Result<DataFile> {
    serde_json::from_str(raw).context("invalid JSON in data file")
}

pub fn read_data_file(path: &Path) -> Result<DataFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    let data = parse_data_file(&raw)
        .with_context(|| format!("failed to parse data file {}", path.display()))?;

    info!(
        path = %path.display(),
        organisations = data.organisations.len(),
        team = data.team.len(),
        entities = data.entities.len(),
        "data file read"
    );
    Ok(data)
}

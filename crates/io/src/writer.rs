//! JSON writers for selection outputs.

use std::fs;
use std::path::Path;

use aepsel_events::ResultTensor;
use aepsel_select::{SelectionReport, to_json};
use tracing::info;

use crate::error::IoError;
use crate::reader::TensorFile;

fn write_text(path: &Path, text: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IoError::Io {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;
    }
    fs::write(path, text).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write a result tensor in the layout [`read_tensor`](crate::read_tensor)
/// accepts. NaN values are written as `null`.
///
/// # Errors
///
/// Returns [`IoError::Json`] if encoding fails or [`IoError::Io`] if the
/// file cannot be written.
pub fn write_tensor(path: &Path, tensor: &ResultTensor) -> Result<(), IoError> {
    let catalog = tensor.catalog();
    let file = TensorFile {
        durations: catalog.durations().to_vec(),
        realizations: catalog.realizations(),
        sites: tensor.n_sites(),
        values: tensor
            .values()
            .iter()
            .map(|&v| v.is_finite().then_some(v))
            .collect(),
    };
    let text = serde_json::to_string(&file).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    write_text(path, &text)?;
    info!(path = %path.display(), n_sites = tensor.n_sites(), "tensor written");
    Ok(())
}

/// Write a selection report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`IoError::Select`] if encoding fails or [`IoError::Io`] if the
/// file cannot be written.
pub fn write_report(path: &Path, report: &SelectionReport) -> Result<(), IoError> {
    let text = to_json(report)?;
    write_text(path, &text)?;
    info!(
        path = %path.display(),
        records = report.envelope.len(),
        failures = report.failures.len(),
        "report written"
    );
    Ok(())
}

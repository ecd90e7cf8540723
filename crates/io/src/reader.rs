//! JSON readers for selection inputs.

use std::fs;
use std::path::Path;

use aepsel_events::{DurationClass, EventCatalog, ResultTensor};
use aepsel_ifd::{IfdTable, IfdTableSpec};
use aepsel_select::{AepTier, TargetTable};
use ndarray::Array2;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::IoError;
use crate::validate::ValidationCollector;

// ---------------------------------------------------------------------------
// File layouts
// ---------------------------------------------------------------------------

/// On-disk layout of a result tensor.
///
/// `values` is row-major `[duration][realization][site]`; `null` marks a
/// missing result.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TensorFile {
    pub(crate) durations: Vec<DurationClass>,
    pub(crate) realizations: u32,
    pub(crate) sites: usize,
    pub(crate) values: Vec<Option<f64>>,
}

/// On-disk layout of a target table. Rows follow `tiers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetFile {
    tiers: Vec<u32>,
    targets: Vec<Vec<f64>>,
    #[serde(default)]
    tolerances: Option<Vec<Vec<f64>>>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Stacks equal-length rows into an array, recording ragged rows.
fn stack_rows(
    name: &str,
    rows: &[Vec<f64>],
    n_cols: usize,
    c: &mut ValidationCollector,
) -> Option<Array2<f64>> {
    let mut ok = true;
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_cols {
            c.push(format!("{name} row {i} has {} sites, expected {n_cols}", row.len()));
            ok = false;
        }
    }
    if !ok {
        return None;
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_cols), flat).ok()
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read a result tensor (levels, flows or rainfall depths).
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Json`],
/// [`IoError::Validation`] if `sites` is zero or `values` has the wrong
/// length, or [`IoError::Event`] if the durations and realizations do not
/// form a valid catalog.
pub fn read_tensor(path: &Path) -> Result<ResultTensor, IoError> {
    let file: TensorFile = read_json(path)?;

    let mut c = ValidationCollector::new();
    c.check(file.sites > 0, || "sites must be > 0".to_string());
    let expected = file
        .durations
        .len()
        .checked_mul(file.realizations as usize)
        .and_then(|n| n.checked_mul(file.sites));
    match expected {
        Some(expected) => c.check(file.values.len() == expected, || {
            format!(
                "values has {} entries, expected {expected} ({} durations x {} realizations x {} sites)",
                file.values.len(),
                file.durations.len(),
                file.realizations,
                file.sites
            )
        }),
        None => c.push(format!(
            "{} durations x {} realizations x {} sites overflows",
            file.durations.len(),
            file.realizations,
            file.sites
        )),
    }
    c.finish()?;

    let catalog = EventCatalog::new(file.durations, file.realizations)?;
    let missing = file.values.iter().filter(|v| v.is_none()).count();
    let data = file
        .values
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    let tensor = ResultTensor::from_vec(catalog, file.sites, data)?;
    info!(
        path = %path.display(),
        n_events = tensor.catalog().n_events(),
        n_sites = tensor.n_sites(),
        missing,
        "tensor loaded"
    );
    Ok(tensor)
}

/// Read a target table. Tolerances default to zero when absent.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for ragged or miscounted rows, and
/// [`IoError::Select`] for invalid tiers or non-finite values.
pub fn read_targets(path: &Path) -> Result<TargetTable, IoError> {
    let file: TargetFile = read_json(path)?;

    let mut c = ValidationCollector::new();
    let n_sites = file.targets.first().map_or(0, Vec::len);
    c.check(n_sites > 0, || "targets must have at least one site".to_string());
    c.check(file.targets.len() == file.tiers.len(), || {
        format!(
            "{} target rows for {} tiers",
            file.targets.len(),
            file.tiers.len()
        )
    });
    let targets = stack_rows("targets", &file.targets, n_sites, &mut c);
    let tolerances = match &file.tolerances {
        Some(rows) => {
            c.check(rows.len() == file.tiers.len(), || {
                format!("{} tolerance rows for {} tiers", rows.len(), file.tiers.len())
            });
            stack_rows("tolerances", rows, n_sites, &mut c)
        }
        None => Some(Array2::zeros((file.targets.len(), n_sites))),
    };
    c.finish()?;

    let tiers = file
        .tiers
        .iter()
        .map(|&n| AepTier::new(n))
        .collect::<Result<Vec<_>, _>>()?;
    let (Some(targets), Some(tolerances)) = (targets, tolerances) else {
        return Err(IoError::Validation {
            count: 1,
            details: "target table could not be assembled".to_string(),
        });
    };
    let table = TargetTable::new(tiers, targets, tolerances)?;
    debug!(path = %path.display(), n_tiers = table.tiers().len(), n_sites, "targets loaded");
    Ok(table)
}

/// Read one zone's IFD table.
///
/// # Errors
///
/// Returns [`IoError::Json`] for malformed files and [`IoError::Ifd`] for
/// structurally invalid tables.
pub fn read_ifd_table(path: &Path) -> Result<IfdTable, IoError> {
    let spec: IfdTableSpec = read_json(path)?;
    let table = IfdTable::new(spec)?;
    debug!(
        path = %path.display(),
        zone = table.zone(),
        rows = table.n_rows(),
        "IFD table loaded"
    );
    Ok(table)
}

//! Tabulated IFD frequency curves.

use std::collections::BTreeMap;

use aepsel_events::DurationClass;
use aepsel_zones::RainfallZone;
use serde::Deserialize;

use crate::curve::FrequencyCurve;
use crate::error::IfdError;

/// How the probability column of a table is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityForm {
    /// Average recurrence interval in years (`N` for 1-in-N).
    #[default]
    ReturnPeriod,
    /// Annual exceedance probability in (0, 1).
    Aep,
}

impl ProbabilityForm {
    /// Converts a tabulated value to an AEP, or `None` if it is out of domain.
    fn to_aep(self, value: f64) -> Option<f64> {
        let aep = match self {
            ProbabilityForm::ReturnPeriod => 1.0 / value,
            ProbabilityForm::Aep => value,
        };
        (aep.is_finite() && aep > 0.0 && aep < 1.0).then_some(aep)
    }
}

/// One tabulated row: a probability and the depth for every duration column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IfdRow {
    /// Return period or AEP, per the table's [`ProbabilityForm`].
    pub probability: f64,
    /// Depth (mm) per duration column. `null`/NaN marks a missing cell.
    #[serde(deserialize_with = "nullable_depths")]
    pub depths: Vec<f64>,
}

fn nullable_depths<'de, D>(de: D) -> Result<Vec<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<Option<f64>> = Vec::deserialize(de)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Serialized layout of a table, as read from disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IfdTableSpec {
    /// Zone the table belongs to.
    pub zone: String,
    /// Probability column form.
    #[serde(default)]
    pub form: ProbabilityForm,
    /// Duration columns, in hours.
    pub durations: Vec<DurationClass>,
    /// Rows, any order.
    pub rows: Vec<IfdRow>,
}

/// Frequency table of one rainfall zone: depth by duration and AEP.
#[derive(Debug, Clone)]
pub struct IfdTable {
    zone: String,
    durations: Vec<DurationClass>,
    /// AEP per row; `None` where the tabulated probability is out of domain.
    aeps: Vec<Option<f64>>,
    /// `depths[row][duration column]`.
    depths: Vec<Vec<f64>>,
}

impl IfdTable {
    /// Builds a table from its serialized layout.
    ///
    /// # Errors
    ///
    /// [`IfdError::InvalidTable`] if there are no duration columns, duplicate
    /// columns, or a row whose depth count differs from the column count.
    pub fn new(spec: IfdTableSpec) -> Result<Self, IfdError> {
        let invalid = |reason: String| IfdError::InvalidTable {
            zone: spec.zone.clone(),
            reason,
        };
        if spec.durations.is_empty() {
            return Err(invalid("no duration columns".to_string()));
        }
        let mut sorted = spec.durations.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != spec.durations.len() {
            return Err(invalid("duplicate duration columns".to_string()));
        }
        for (i, row) in spec.rows.iter().enumerate() {
            if row.depths.len() != spec.durations.len() {
                return Err(invalid(format!(
                    "row {i} has {} depths for {} durations",
                    row.depths.len(),
                    spec.durations.len()
                )));
            }
        }

        let aeps = spec
            .rows
            .iter()
            .map(|r| spec.form.to_aep(r.probability))
            .collect();
        let depths = spec.rows.into_iter().map(|r| r.depths).collect();
        Ok(Self {
            zone: spec.zone,
            durations: spec.durations,
            aeps,
            depths,
        })
    }

    /// Returns the zone name.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns the duration columns.
    pub fn durations(&self) -> &[DurationClass] {
        &self.durations
    }

    /// Returns the number of rows (valid or not).
    pub fn n_rows(&self) -> usize {
        self.depths.len()
    }

    /// Returns the `(aep, depth)` knots for `duration`, skipping rows whose
    /// probability or depth is unusable.
    pub fn knots(&self, duration: DurationClass) -> Result<Vec<(f64, f64)>, IfdError> {
        let col = self
            .durations
            .iter()
            .position(|&d| d == duration)
            .ok_or_else(|| IfdError::UnknownDurationClass {
                zone: self.zone.clone(),
                hours: duration.hours(),
            })?;
        Ok(self
            .aeps
            .iter()
            .zip(&self.depths)
            .filter_map(|(aep, row)| {
                let depth = row[col];
                match aep {
                    Some(p) if depth.is_finite() && depth > 0.0 => Some((*p, depth)),
                    _ => None,
                }
            })
            .collect())
    }

    /// Builds the interpolating curve for `duration`.
    pub fn curve(&self, duration: DurationClass) -> Result<FrequencyCurve, IfdError> {
        let knots = self.knots(duration)?;
        FrequencyCurve::new(&self.zone, duration, &knots)
    }

    /// Converts `depth` (mm) of a `duration` storm into an AEP.
    ///
    /// See [`FrequencyCurve::aep`] for the interpolation scheme.
    pub fn interpolate_aep(&self, duration: DurationClass, depth: f64) -> Result<f64, IfdError> {
        self.curve(duration)?.aep(depth)
    }
}

/// IFD tables keyed by zone name.
#[derive(Debug, Clone, Default)]
pub struct IfdSet {
    tables: BTreeMap<String, IfdTable>,
}

impl IfdSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, replacing any previous table for the same zone.
    pub fn insert(&mut self, table: IfdTable) -> Option<IfdTable> {
        self.tables.insert(table.zone.clone(), table)
    }

    /// Returns the table for the zone called `name`.
    pub fn table(&self, name: &str) -> Result<&IfdTable, IfdError> {
        self.tables.get(name).ok_or_else(|| IfdError::MissingTable {
            zone: name.to_string(),
        })
    }

    /// Returns the number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no tables are registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Converts `depth` for `duration` into an AEP using `zone`'s table.
    pub fn interpolate_aep(
        &self,
        zone: &RainfallZone,
        duration: DurationClass,
        depth: f64,
    ) -> Result<f64, IfdError> {
        self.table(zone.name())?.interpolate_aep(duration, depth)
    }
}

impl FromIterator<IfdTable> for IfdSet {
    fn from_iter<I: IntoIterator<Item = IfdTable>>(iter: I) -> Self {
        let mut set = Self::new();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spec() -> IfdTableSpec {
        IfdTableSpec {
            zone: "Test".to_string(),
            form: ProbabilityForm::Aep,
            durations: vec![DurationClass::new(24), DurationClass::new(48)],
            rows: vec![
                IfdRow {
                    probability: 0.5,
                    depths: vec![50.0, 70.0],
                },
                IfdRow {
                    probability: 0.1,
                    depths: vec![90.0, f64::NAN],
                },
                IfdRow {
                    probability: 0.01,
                    depths: vec![150.0, 0.0],
                },
            ],
        }
    }

    #[test]
    fn knots_skip_invalid_cells() {
        let t = IfdTable::new(spec()).unwrap();
        assert_eq!(t.knots(DurationClass::new(24)).unwrap().len(), 3);
        assert_eq!(
            t.knots(DurationClass::new(48)).unwrap(),
            vec![(0.5, 70.0)]
        );
    }

    #[test]
    fn unknown_duration() {
        let t = IfdTable::new(spec()).unwrap();
        assert!(matches!(
            t.interpolate_aep(DurationClass::new(12), 50.0),
            Err(IfdError::UnknownDurationClass { hours: 12, .. })
        ));
    }

    #[test]
    fn insufficient_rows() {
        let t = IfdTable::new(spec()).unwrap();
        assert!(matches!(
            t.interpolate_aep(DurationClass::new(48), 70.0),
            Err(IfdError::InsufficientTableData { valid: 1, hours: 48, .. })
        ));
    }

    #[test]
    fn return_period_form() {
        let mut s = spec();
        s.form = ProbabilityForm::ReturnPeriod;
        s.rows[0].probability = 2.0;
        s.rows[1].probability = 10.0;
        s.rows[2].probability = 100.0;
        let t = IfdTable::new(s).unwrap();
        assert_relative_eq!(
            t.interpolate_aep(DurationClass::new(24), 90.0).unwrap(),
            0.1,
            epsilon = 1e-9
        );
    }

    #[test]
    fn out_of_domain_probabilities_are_skipped() {
        let mut s = spec();
        s.rows[0].probability = 1.5; // not an AEP
        let t = IfdTable::new(s).unwrap();
        assert_eq!(t.knots(DurationClass::new(24)).unwrap().len(), 2);
    }

    #[test]
    fn ragged_row_rejected() {
        let mut s = spec();
        s.rows[1].depths.pop();
        assert!(matches!(
            IfdTable::new(s),
            Err(IfdError::InvalidTable { .. })
        ));
    }

    #[test]
    fn duplicate_columns_rejected() {
        let mut s = spec();
        s.durations = vec![DurationClass::new(24), DurationClass::new(24)];
        assert!(IfdTable::new(s).is_err());
    }

    #[test]
    fn set_lookup() {
        let set: IfdSet = [IfdTable::new(spec()).unwrap()].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(set.table("Test").is_ok());
        assert!(matches!(
            set.table("Other"),
            Err(IfdError::MissingTable { .. })
        ));
    }

    #[test]
    fn spec_deserializes_with_nulls() {
        let json = r#"{
            "zone": "Savages",
            "form": "return_period",
            "durations": [24, 48],
            "rows": [
                {"probability": 2, "depths": [50.0, null]},
                {"probability": 100, "depths": [150.0, 180.0]}
            ]
        }"#;
        let spec: IfdTableSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.form, ProbabilityForm::ReturnPeriod);
        assert!(spec.rows[0].depths[1].is_nan());
    }
}

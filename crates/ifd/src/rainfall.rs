//! Whole-tensor conversion of rainfall depths to AEPs.

use aepsel_events::ResultTensor;
use aepsel_zones::ZoneMap;

use crate::error::IfdError;
use crate::table::IfdSet;

/// Converts a rainfall-depth tensor into a rainfall-AEP tensor.
///
/// Each site uses its zone's IFD table at the event's duration class. One
/// curve is built per (duration, zone) pair. Missing or non-positive depths
/// produce NaN.
///
/// # Errors
///
/// - [`IfdError::SiteCountMismatch`] if `zones` does not cover the tensor's sites
/// - [`IfdError::MissingTable`] if a zone has no table
/// - [`IfdError::UnknownDurationClass`] / [`IfdError::InsufficientTableData`]
///   if a table cannot serve one of the catalog's durations
#[tracing::instrument(skip_all, fields(n_sites = depths.n_sites()))]
pub fn rainfall_aep(
    depths: &ResultTensor,
    zones: &ZoneMap,
    tables: &IfdSet,
) -> Result<ResultTensor, IfdError> {
    if depths.n_sites() != zones.n_sites() {
        return Err(IfdError::SiteCountMismatch {
            tensor: depths.n_sites(),
            zones: zones.n_sites(),
        });
    }

    let catalog = depths.catalog().clone();
    let mut out = ResultTensor::empty(catalog.clone(), depths.n_sites());
    let src = depths.values();
    let mut dst = out.values_mut();
    let mut skipped = 0usize;

    for (d, &duration) in catalog.durations().iter().enumerate() {
        for zone in zones.zones() {
            let curve = tables.table(zone.name())?.curve(duration)?;
            for &site in zone.sites() {
                for r in 0..catalog.realizations() as usize {
                    let depth = src[[d, r, site]];
                    if depth.is_finite() && depth > 0.0 {
                        dst[[d, r, site]] = curve.aep(depth)?;
                    } else {
                        skipped += 1;
                    }
                }
            }
        }
    }

    tracing::debug!(skipped, "rainfall AEP tensor built");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{IfdRow, IfdTable, IfdTableSpec, ProbabilityForm};
    use aepsel_events::{DurationClass, EventCatalog};
    use aepsel_zones::ZoneGroup;
    use approx::assert_relative_eq;

    fn table(zone: &str, scale: f64) -> IfdTable {
        let row = |p: f64, d: f64| IfdRow {
            probability: p,
            depths: vec![d * scale, d * scale * 1.5],
        };
        IfdTable::new(IfdTableSpec {
            zone: zone.to_string(),
            form: ProbabilityForm::Aep,
            durations: vec![DurationClass::new(24), DurationClass::new(48)],
            rows: vec![row(0.5, 50.0), row(0.1, 90.0), row(0.01, 150.0)],
        })
        .unwrap()
    }

    fn setup() -> (ResultTensor, ZoneMap, IfdSet) {
        let catalog =
            EventCatalog::new(vec![DurationClass::new(24), DurationClass::new(48)], 2).unwrap();
        // [d][r][site], sites 0 and 2 in "A", site 1 in "B"
        let data = vec![
            90.0, 180.0, f64::NAN, // 024_0001
            50.0, 100.0, 0.0, // 024_0002
            135.0, 270.0, 135.0, // 048_0001
            75.0, 150.0, 225.0, // 048_0002
        ];
        let depths = ResultTensor::from_vec(catalog, 3, data).unwrap();
        let zones = ZoneMap::new(
            3,
            vec![ZoneGroup::new("A", [0, 2]), ZoneGroup::new("B", [1])],
        )
        .unwrap();
        let tables = [table("A", 1.0), table("B", 2.0)].into_iter().collect();
        (depths, zones, tables)
    }

    #[test]
    fn converts_through_site_zones() {
        let (depths, zones, tables) = setup();
        let aep = rainfall_aep(&depths, &zones, &tables).unwrap();
        let v = aep.values();
        assert_relative_eq!(v[[0, 0, 0]], 0.1, epsilon = 1e-6);
        assert_relative_eq!(v[[0, 0, 1]], 0.1, epsilon = 1e-6);
        assert_relative_eq!(v[[0, 1, 1]], 0.5, epsilon = 1e-6);
        assert_relative_eq!(v[[1, 0, 2]], 0.1, epsilon = 1e-6);
        assert_relative_eq!(v[[1, 1, 2]], 0.01, epsilon = 1e-6);
    }

    #[test]
    fn missing_depths_stay_missing() {
        let (depths, zones, tables) = setup();
        let aep = rainfall_aep(&depths, &zones, &tables).unwrap();
        assert!(aep.values()[[0, 0, 2]].is_nan());
        assert!(aep.values()[[0, 1, 2]].is_nan());
    }

    #[test]
    fn missing_zone_table() {
        let (depths, zones, _) = setup();
        let only_a: IfdSet = [table("A", 1.0)].into_iter().collect();
        assert!(matches!(
            rainfall_aep(&depths, &zones, &only_a),
            Err(IfdError::MissingTable { zone }) if zone == "B"
        ));
    }

    #[test]
    fn site_count_mismatch() {
        let (depths, _, tables) = setup();
        let zones = ZoneMap::new(2, vec![ZoneGroup::new("A", [0, 1])]).unwrap();
        assert!(matches!(
            rainfall_aep(&depths, &zones, &tables),
            Err(IfdError::SiteCountMismatch { tensor: 3, zones: 2 })
        ));
    }
}

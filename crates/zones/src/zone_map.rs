//! Declarative site-to-zone mapping.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::ZoneError;
use crate::validate::ValidationCollector;

/// One row of the grouping table: a zone and the sites it governs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneGroup {
    /// Zone name, usually the representative gauge.
    pub name: String,
    /// Zero-based site indices.
    pub sites: Vec<usize>,
}

impl ZoneGroup {
    /// Creates a group.
    pub fn new(name: impl Into<String>, sites: impl Into<Vec<usize>>) -> Self {
        Self {
            name: name.into(),
            sites: sites.into(),
        }
    }
}

/// A rainfall zone: a set of sites sharing one frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RainfallZone {
    index: usize,
    name: String,
    sites: Vec<usize>,
}

impl RainfallZone {
    /// Position of the zone in the grouping table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Zone name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sites governed by this zone, ascending.
    pub fn sites(&self) -> &[usize] {
        &self.sites
    }
}

/// Validated lookup from site index to rainfall zone.
///
/// Every site in `0..n_sites` maps to exactly one zone.
#[derive(Debug, Clone)]
pub struct ZoneMap {
    zones: Vec<RainfallZone>,
    site_to_zone: Vec<usize>,
}

impl ZoneMap {
    /// Builds and validates a map covering sites `0..n_sites`.
    ///
    /// # Errors
    ///
    /// [`ZoneError::Validation`] listing every problem found: empty or
    /// duplicate zone names, empty zones, out-of-range sites, sites claimed
    /// by more than one zone, and unmapped sites.
    pub fn new(n_sites: usize, groups: Vec<ZoneGroup>) -> Result<Self, ZoneError> {
        let mut c = ValidationCollector::new();
        let mut owner: Vec<Option<usize>> = vec![None; n_sites];
        let mut names = BTreeSet::new();

        if groups.is_empty() {
            c.push("grouping table has no zones");
        }

        for (zi, group) in groups.iter().enumerate() {
            if group.name.trim().is_empty() {
                c.push(format!("zone #{zi} has an empty name"));
            } else if !names.insert(group.name.as_str()) {
                c.push(format!("duplicate zone name '{}'", group.name));
            }
            if group.sites.is_empty() {
                c.push(format!("zone '{}' has no sites", group.name));
            }
            for &site in &group.sites {
                match owner.get_mut(site) {
                    None => c.push(format!(
                        "zone '{}' lists site {site}, outside 0..{n_sites}",
                        group.name
                    )),
                    Some(Some(prev)) => c.push(format!(
                        "site {site} claimed by both '{}' and '{}'",
                        groups[*prev].name, group.name
                    )),
                    Some(slot) => *slot = Some(zi),
                }
            }
        }

        let unmapped: Vec<usize> = owner
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_none())
            .map(|(s, _)| s)
            .collect();
        if !unmapped.is_empty() {
            c.push(format!("sites not mapped to any zone: {unmapped:?}"));
        }

        c.finish()?;

        let zones = groups
            .into_iter()
            .enumerate()
            .map(|(index, g)| {
                let mut sites = g.sites;
                sites.sort_unstable();
                RainfallZone {
                    index,
                    name: g.name,
                    sites,
                }
            })
            .collect::<Vec<_>>();
        // Every slot is filled once validation passes.
        let site_to_zone = owner.into_iter().map(|o| o.unwrap_or(0)).collect();

        tracing::debug!(n_sites, n_zones = zones.len(), "zone map built");
        Ok(Self {
            zones,
            site_to_zone,
        })
    }

    /// Returns the zone governing `site`.
    pub fn zone_for_site(&self, site: usize) -> Result<&RainfallZone, ZoneError> {
        self.site_to_zone
            .get(site)
            .map(|&zi| &self.zones[zi])
            .ok_or(ZoneError::UnknownSite {
                site,
                n_sites: self.n_sites(),
            })
    }

    /// Returns the zone called `name`.
    pub fn zone(&self, name: &str) -> Result<&RainfallZone, ZoneError> {
        self.zones
            .iter()
            .find(|z| z.name == name)
            .ok_or_else(|| ZoneError::UnknownZone {
                name: name.to_string(),
            })
    }

    /// Returns all zones in table order.
    pub fn zones(&self) -> &[RainfallZone] {
        &self.zones
    }

    /// Returns the number of sites covered.
    pub fn n_sites(&self) -> usize {
        self.site_to_zone.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<ZoneGroup> {
        vec![
            ZoneGroup::new("Upper", [0, 2]),
            ZoneGroup::new("Lower", [3, 1]),
        ]
    }

    #[test]
    fn resolves_many_to_one() {
        let map = ZoneMap::new(4, groups()).unwrap();
        assert_eq!(map.zone_for_site(0).unwrap().name(), "Upper");
        assert_eq!(map.zone_for_site(2).unwrap().name(), "Upper");
        assert_eq!(map.zone_for_site(1).unwrap().name(), "Lower");
        assert_eq!(map.zone("Lower").unwrap().sites(), &[1, 3]);
        assert_eq!(map.zone("Lower").unwrap().index(), 1);
    }

    #[test]
    fn unknown_site() {
        let map = ZoneMap::new(4, groups()).unwrap();
        assert_eq!(
            map.zone_for_site(4),
            Err(ZoneError::UnknownSite {
                site: 4,
                n_sites: 4
            })
        );
    }

    #[test]
    fn unknown_zone() {
        let map = ZoneMap::new(4, groups()).unwrap();
        assert!(matches!(map.zone("Middle"), Err(ZoneError::UnknownZone { .. })));
    }

    #[test]
    fn unmapped_site_rejected() {
        let err = ZoneMap::new(5, groups()).unwrap_err();
        match err {
            ZoneError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("[4]"), "{details}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn every_problem_reported() {
        let bad = vec![
            ZoneGroup::new("A", [0, 1]),
            ZoneGroup::new("A", [1, 9]),
            ZoneGroup::new("B", Vec::new()),
        ];
        match ZoneMap::new(3, bad).unwrap_err() {
            ZoneError::Validation { count, details } => {
                // duplicate name, site 1 twice, site 9 out of range, empty B, site 2 unmapped
                assert_eq!(count, 5, "{details}");
                assert!(details.contains("duplicate zone name 'A'"));
                assert!(details.contains("site 1 claimed by both"));
                assert!(details.contains("site 9"));
                assert!(details.contains("zone 'B' has no sites"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn empty_table_rejected() {
        assert!(ZoneMap::new(0, Vec::new()).is_err());
    }
}

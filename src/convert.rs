//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use aepsel_events::{EventCatalog, EventId};
use aepsel_ifd::IfdSet;
use aepsel_io::read_ifd_table;
use aepsel_select::{AepTier, LevelPatch, SelectConfig, SiteOverride};
use aepsel_zones::{ZoneGroup, ZoneMap};

use crate::config::{SelectionToml, ZoneToml};

/// Parses a list of `DDD_RRRR` labels against `catalog`.
pub fn parse_labels(catalog: &EventCatalog, labels: &[String]) -> Result<Vec<EventId>> {
    labels
        .iter()
        .map(|l| {
            catalog
                .parse_label(l)
                .with_context(|| format!("bad event label {l:?}"))
        })
        .collect()
}

/// Builds a [`SelectConfig`] from the TOML selection section.
///
/// Event labels are resolved against the result tensor's `catalog`.
pub fn build_select_config(sel: &SelectionToml, catalog: &EventCatalog) -> Result<SelectConfig> {
    let denylist = parse_labels(catalog, &sel.denylist).context("invalid denylist")?;

    let overrides = sel
        .overrides
        .iter()
        .map(|o| -> Result<SiteOverride> {
            Ok(SiteOverride {
                tier: AepTier::new(o.tier)?,
                site: o.site,
                rank: o.rank,
            })
        })
        .collect::<Result<Vec<_>>>()
        .context("invalid override")?;

    let patches = sel
        .patches
        .iter()
        .map(|p| -> Result<LevelPatch> {
            Ok(LevelPatch {
                event: catalog
                    .parse_label(&p.event)
                    .with_context(|| format!("bad event label {:?}", p.event))?,
                site: p.site,
                level: p.level,
            })
        })
        .collect::<Result<Vec<_>>>()
        .context("invalid level patch")?;

    let cfg = SelectConfig::new()
        .with_accumulation_depth(sel.accumulation_depth)
        .with_parallel(sel.parallel)
        .with_denylist(denylist)
        .with_overrides(overrides)
        .with_patches(patches)
        .with_fail_on_non_monotonic(sel.fail_on_non_monotonic);
    cfg.validate().context("invalid selection config")?;
    Ok(cfg)
}

/// Builds a validated [`ZoneMap`] covering `n_sites` sites.
pub fn build_zone_map(zones: &[ZoneToml], n_sites: usize) -> Result<ZoneMap> {
    if zones.is_empty() {
        bail!("no rainfall zones: add [[zones]] entries to the config");
    }
    let groups = zones
        .iter()
        .map(|z| ZoneGroup::new(z.name.clone(), z.sites.clone()))
        .collect();
    ZoneMap::new(n_sites, groups).context("invalid zone grouping")
}

/// Reads every zone's IFD table.
///
/// Each table must name the zone it is listed under.
pub fn load_ifd_set(zones: &[ZoneToml]) -> Result<IfdSet> {
    let mut set = IfdSet::new();
    for z in zones {
        let table = read_ifd_table(&z.ifd)
            .with_context(|| format!("failed to read IFD table: {}", z.ifd.display()))?;
        if table.zone() != z.name {
            bail!(
                "IFD table {} is for zone {:?}, listed under zone {:?}",
                z.ifd.display(),
                table.zone(),
                z.name
            );
        }
        set.insert(table);
    }
    Ok(set)
}

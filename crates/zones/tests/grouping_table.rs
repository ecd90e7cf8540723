use aepsel_zones::{ZoneError, ZoneGroup, ZoneMap};
use serde::Deserialize;

#[derive(Deserialize)]
struct Table {
    zones: Vec<ZoneGroup>,
}

/// Brisbane River reporting sites grouped by representative rain gauge.
const BRISBANE_TABLE: &str = r#"
[[zones]]
name = "Wivenhoe"
sites = [1]

[[zones]]
name = "Glenore Grove"
sites = [0, 2]

[[zones]]
name = "Savages"
sites = [3, 4]

[[zones]]
name = "Mount Crosby"
sites = [5, 6]

[[zones]]
name = "Walloon"
sites = [18, 19]

[[zones]]
name = "Amberley"
sites = [16]

[[zones]]
name = "Loamside"
sites = [17]

[[zones]]
name = "Ipswich"
sites = [23, 20, 22, 21, 24, 25]

[[zones]]
name = "Moggill"
sites = [7, 26]

[[zones]]
name = "Centenary"
sites = [8, 9, 27]

[[zones]]
name = "Brisbane"
sites = [13, 11, 14, 15, 12, 10]
"#;

fn brisbane() -> ZoneMap {
    let table: Table = toml::from_str(BRISBANE_TABLE).expect("table parses");
    ZoneMap::new(28, table.zones).expect("table covers all 28 sites")
}

#[test]
fn brisbane_table_covers_every_site() {
    let map = brisbane();
    assert_eq!(map.n_sites(), 28);
    assert_eq!(map.zones().len(), 11);
    for site in 0..28 {
        let zone = map.zone_for_site(site).unwrap();
        assert!(zone.sites().contains(&site));
    }
}

#[test]
fn brisbane_groupings() {
    let map = brisbane();
    assert_eq!(map.zone_for_site(1).unwrap().name(), "Wivenhoe");
    assert_eq!(map.zone_for_site(25).unwrap().name(), "Ipswich");
    assert_eq!(map.zone_for_site(10).unwrap().name(), "Brisbane");
    assert_eq!(map.zone("Moggill").unwrap().sites(), &[7, 26]);
}

#[test]
fn unknown_site_outside_table() {
    let map = brisbane();
    assert!(matches!(
        map.zone_for_site(28),
        Err(ZoneError::UnknownSite { site: 28, n_sites: 28 })
    ));
}

#[test]
fn table_rejects_unknown_fields() {
    let bad = r#"
[[zones]]
name = "Wivenhoe"
sites = [0]
gauge = "540177"
"#;
    assert!(toml::from_str::<Table>(bad).is_err());
}

#[test]
fn twenty_nine_sites_needs_one_more_group() {
    let table: Table = toml::from_str(BRISBANE_TABLE).unwrap();
    let err = ZoneMap::new(29, table.zones).unwrap_err();
    assert!(matches!(err, ZoneError::Validation { count: 1, .. }));
}

//! Site-to-zone resolution.
//!
//! Monitoring sites are grouped into rainfall zones, each represented by one
//! gauge whose frequency (IFD) table governs every site in the group. The
//! grouping is a declarative table validated once for total coverage:
//!
//! ```
//! use aepsel_zones::{ZoneGroup, ZoneMap};
//!
//! let map = ZoneMap::new(3, vec![
//!     ZoneGroup::new("Wivenhoe", [1]),
//!     ZoneGroup::new("Glenore Grove", [0, 2]),
//! ]).unwrap();
//! assert_eq!(map.zone_for_site(2).unwrap().name(), "Glenore Grove");
//! ```

mod error;
mod validate;
mod zone_map;

pub use error::ZoneError;
pub use zone_map::{RainfallZone, ZoneGroup, ZoneMap};

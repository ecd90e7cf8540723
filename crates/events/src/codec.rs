//! Event identifier codec.
//!
//! An [`EventId`] packs a duration class and a realization number into one
//! integer: `id = position(duration) * R + realization`, where `position` is
//! the zero-based index of the duration in the catalog and `R` the number of
//! realizations per duration. With the standard catalog (9 durations, 1260
//! realizations) event `048_0143` is id 5183.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::duration::{DurationClass, STANDARD_DURATIONS};
use crate::error::EventError;

/// Realizations per duration class in the standard Monte-Carlo run.
pub const STANDARD_REALIZATIONS: u32 = 1260;

/// Compact identifier of one simulated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    /// Wraps a raw id. No domain check is made; use [`EventCatalog::decode`]
    /// to validate.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// The ordered set of duration classes and the realization count that
/// together define the event domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCatalog {
    durations: Vec<DurationClass>,
    realizations: u32,
}

impl EventCatalog {
    /// Creates a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidCatalog`] if `durations` is empty or not
    /// strictly increasing, if `realizations` is zero, or if the id space
    /// would overflow `u32`.
    pub fn new(durations: Vec<DurationClass>, realizations: u32) -> Result<Self, EventError> {
        if durations.is_empty() {
            return Err(EventError::InvalidCatalog {
                reason: "at least one duration class is required".to_string(),
            });
        }
        if !durations.windows(2).all(|w| w[0] < w[1]) {
            return Err(EventError::InvalidCatalog {
                reason: "duration classes must be strictly increasing".to_string(),
            });
        }
        if realizations == 0 {
            return Err(EventError::InvalidCatalog {
                reason: "realizations must be >= 1".to_string(),
            });
        }
        if (durations.len() as u64) * u64::from(realizations) > u64::from(u32::MAX) {
            return Err(EventError::InvalidCatalog {
                reason: format!(
                    "{} durations x {} realizations overflows the id space",
                    durations.len(),
                    realizations
                ),
            });
        }
        Ok(Self {
            durations,
            realizations,
        })
    }

    /// The standard catalog: 12 to 168 hour durations, 1260 realizations each.
    pub fn standard() -> Self {
        Self {
            durations: STANDARD_DURATIONS.to_vec(),
            realizations: STANDARD_REALIZATIONS,
        }
    }

    /// Returns the duration classes in catalog order.
    pub fn durations(&self) -> &[DurationClass] {
        &self.durations
    }

    /// Returns the number of realizations per duration class.
    pub fn realizations(&self) -> u32 {
        self.realizations
    }

    /// Returns the total number of events in the domain.
    pub fn n_events(&self) -> usize {
        self.durations.len() * self.realizations as usize
    }

    /// Returns the largest valid id.
    pub fn max_id(&self) -> u32 {
        self.durations.len() as u32 * self.realizations
    }

    /// Returns the zero-based catalog position of `duration`.
    pub fn position(&self, duration: DurationClass) -> Result<usize, EventError> {
        self.durations
            .binary_search(&duration)
            .map_err(|_| EventError::UnknownDurationClass {
                hours: duration.hours(),
            })
    }

    /// Encodes a (duration, realization) pair.
    ///
    /// # Errors
    ///
    /// [`EventError::UnknownDurationClass`] or [`EventError::InvalidRealization`].
    pub fn encode(
        &self,
        duration: DurationClass,
        realization: u32,
    ) -> Result<EventId, EventError> {
        let pos = self.position(duration)?;
        if realization == 0 || realization > self.realizations {
            return Err(EventError::InvalidRealization {
                realization,
                max: self.realizations,
            });
        }
        Ok(EventId(pos as u32 * self.realizations + realization))
    }

    /// Decodes an id back into its (duration, realization) pair.
    ///
    /// # Errors
    ///
    /// [`EventError::InvalidEventId`] if `id` is outside `1..=max_id()`.
    pub fn decode(&self, id: EventId) -> Result<(DurationClass, u32), EventError> {
        let (pos, offset) = self.tensor_index(id)?;
        Ok((self.durations[pos], offset as u32 + 1))
    }

    /// Returns the `[duration position, realization offset]` tensor
    /// coordinates of `id`.
    pub fn tensor_index(&self, id: EventId) -> Result<(usize, usize), EventError> {
        let raw = id.get();
        if raw == 0 || raw > self.max_id() {
            return Err(EventError::InvalidEventId {
                id: raw,
                max: self.max_id(),
            });
        }
        let zero_based = raw - 1;
        Ok((
            (zero_based / self.realizations) as usize,
            (zero_based % self.realizations) as usize,
        ))
    }

    /// Returns the id at tensor coordinates. Coordinates must be in range.
    pub(crate) fn id_at(&self, duration_pos: usize, realization_offset: usize) -> EventId {
        debug_assert!(duration_pos < self.durations.len());
        debug_assert!(realization_offset < self.realizations as usize);
        EventId(duration_pos as u32 * self.realizations + realization_offset as u32 + 1)
    }

    /// Formats `id` as `DDD_RRRR`, e.g. `048_0143`.
    pub fn label(&self, id: EventId) -> Result<String, EventError> {
        let (duration, realization) = self.decode(id)?;
        Ok(format!("{duration}_{realization:04}"))
    }

    /// Parses a `DDD_RRRR` label.
    ///
    /// Leading zeros are optional; `48_143` and `048_0143` name the same event.
    pub fn parse_label(&self, label: &str) -> Result<EventId, EventError> {
        let invalid = |reason: &str| EventError::InvalidEventLabel {
            label: label.to_string(),
            reason: reason.to_string(),
        };
        let (dur, real) = label
            .trim()
            .split_once('_')
            .ok_or_else(|| invalid("missing '_' separator"))?;
        let hours: u16 = dur
            .parse()
            .map_err(|_| invalid("duration is not an integer"))?;
        let realization: u32 = real
            .parse()
            .map_err(|_| invalid("realization is not an integer"))?;
        self.encode(DurationClass::new(hours), realization)
    }

    /// Iterates every id in the domain in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EventId> + '_ {
        (1..=self.max_id()).map(EventId)
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_from_standard_catalog() {
        let cat = EventCatalog::standard();
        let cases = [
            ("048_0143", 5183),
            ("168_0033", 10113),
            ("036_0514", 4294),
            ("012_0660", 660),
            ("048_0767", 5807),
            ("120_0706", 9526),
        ];
        for (label, raw) in cases {
            let id = cat.parse_label(label).unwrap();
            assert_eq!(id.get(), raw, "label {label}");
            assert_eq!(cat.label(id).unwrap(), label);
        }
    }

    #[test]
    fn boundaries() {
        let cat = EventCatalog::standard();
        assert_eq!(
            cat.decode(EventId::new(1)).unwrap(),
            (DurationClass::new(12), 1)
        );
        assert_eq!(
            cat.decode(EventId::new(1260)).unwrap(),
            (DurationClass::new(12), 1260)
        );
        assert_eq!(
            cat.decode(EventId::new(1261)).unwrap(),
            (DurationClass::new(18), 1)
        );
        assert_eq!(
            cat.decode(EventId::new(11340)).unwrap(),
            (DurationClass::new(168), 1260)
        );
    }

    #[test]
    fn decode_out_of_domain() {
        let cat = EventCatalog::standard();
        assert!(matches!(
            cat.decode(EventId::new(0)),
            Err(EventError::InvalidEventId { id: 0, .. })
        ));
        assert!(matches!(
            cat.decode(EventId::new(11341)),
            Err(EventError::InvalidEventId { id: 11341, max: 11340 })
        ));
    }

    #[test]
    fn encode_rejects_bad_inputs() {
        let cat = EventCatalog::standard();
        assert!(matches!(
            cat.encode(DurationClass::new(6), 1),
            Err(EventError::UnknownDurationClass { hours: 6 })
        ));
        assert!(matches!(
            cat.encode(DurationClass::new(24), 0),
            Err(EventError::InvalidRealization { .. })
        ));
        assert!(matches!(
            cat.encode(DurationClass::new(24), 1261),
            Err(EventError::InvalidRealization { .. })
        ));
    }

    #[test]
    fn parse_label_errors() {
        let cat = EventCatalog::standard();
        assert!(matches!(
            cat.parse_label("048-0143"),
            Err(EventError::InvalidEventLabel { .. })
        ));
        assert!(matches!(
            cat.parse_label("abc_0143"),
            Err(EventError::InvalidEventLabel { .. })
        ));
        assert!(matches!(
            cat.parse_label("049_0143"),
            Err(EventError::UnknownDurationClass { hours: 49 })
        ));
    }

    #[test]
    fn catalog_validation() {
        assert!(EventCatalog::new(vec![], 10).is_err());
        assert!(EventCatalog::new(vec![DurationClass::new(24)], 0).is_err());
        assert!(
            EventCatalog::new(vec![DurationClass::new(24), DurationClass::new(12)], 10).is_err()
        );
        assert!(EventCatalog::new(vec![DurationClass::new(24)], 10).is_ok());
    }

    #[test]
    fn iter_covers_domain() {
        let cat = EventCatalog::new(vec![DurationClass::new(1), DurationClass::new(2)], 3).unwrap();
        let ids: Vec<u32> = cat.iter().map(EventId::get).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn id_at_matches_tensor_index() {
        let cat = EventCatalog::standard();
        let id = cat.id_at(4, 142);
        assert_eq!(id.get(), 5183);
        assert_eq!(cat.tensor_index(id).unwrap(), (4, 142));
    }
}

//! Accumulated validation for grouping tables.

use crate::error::ZoneError;

/// Accumulates validation errors and converts them into a single
/// [`ZoneError::Validation`].
///
/// Every problem in a grouping table is reported at once, so a misconfigured
/// table can be fixed in one pass.
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// `Ok(())` if nothing was recorded, otherwise one error joining all
    /// messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), ZoneError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ZoneError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collector_is_ok() {
        assert!(ValidationCollector::new().finish().is_ok());
    }

    #[test]
    fn messages_are_joined() {
        let mut c = ValidationCollector::new();
        c.push("first");
        c.push(String::from("second"));
        match c.finish() {
            Err(ZoneError::Validation { count, details }) => {
                assert_eq!(count, 2);
                assert_eq!(details, "first; second");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}

//! Reference widths: assumed real-world width per object class
//!
//! The table is the calibration input to distance estimation. It is built
//! once at startup and never mutated afterwards; classes missing from the
//! table are a normal outcome (label-only output), not an error.

use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Default class widths in inches, consistent with the default focal length.
///
/// Covers the subset of COCO classes the service has calibrated widths for.
/// Anything not listed falls back to label-only output.
const DEFAULT_WIDTHS: &[(&str, f64)] = &[
    ("person", 16.0),
    ("bicycle", 24.0),
    ("car", 70.0),
    ("motorcycle", 32.0),
    ("bus", 100.0),
    ("train", 125.0),
    ("truck", 96.0),
    ("fire hydrant", 12.0),
    ("stop sign", 30.0),
    ("bench", 48.0),
    ("cat", 15.0),
    ("dog", 18.0),
    ("backpack", 14.0),
    ("suitcase", 22.0),
    ("sports ball", 9.0),
    ("bottle", 3.0),
    ("cup", 3.5),
    ("bowl", 6.0),
    ("chair", 20.0),
    ("couch", 72.0),
    ("bed", 60.0),
    ("dining table", 48.0),
    ("toilet", 15.0),
    ("tv", 36.0),
    ("laptop", 13.0),
    ("keyboard", 17.0),
    ("cell phone", 3.0),
    ("microwave", 20.0),
    ("oven", 30.0),
    ("refrigerator", 36.0),
    ("book", 6.0),
    ("clock", 10.0),
];

/// Immutable class -> real-world width mapping.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    widths: HashMap<String, f64>,
}

impl ReferenceTable {
    /// Build a table from the built-in defaults.
    pub fn with_defaults() -> Self {
        let widths = DEFAULT_WIDTHS
            .iter()
            .map(|(name, width)| (name.to_string(), *width))
            .collect();
        Self { widths }
    }

    /// Build a table from explicit entries. Every width must be > 0.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut table = Self {
            widths: HashMap::new(),
        };
        for (name, width) in entries {
            table.insert(name, width)?;
        }
        Ok(table)
    }

    /// Insert or override one entry, rejecting non-positive widths.
    pub fn insert(&mut self, name: String, width: f64) -> Result<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::Configuration(format!(
                "Reference width for '{}' must be a positive number, got {}",
                name, width
            )));
        }
        debug!("Reference width: {} -> {} inches", name, width);
        self.widths.insert(name, width);
        Ok(())
    }

    /// Look up the reference width for a class. Absence is not an error.
    pub fn lookup(&self, class_name: &str) -> Option<f64> {
        self.widths.get(class_name).copied()
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Check that every table key exists in the detector's label set.
    ///
    /// Run once at startup so a table/detector disagreement fails fast
    /// instead of silently producing label-only output forever.
    pub fn validate_against(&self, labels: &[&str]) -> Result<()> {
        for name in self.widths.keys() {
            if !labels.contains(&name.as_str()) {
                return Err(Error::Configuration(format!(
                    "Reference table class '{}' is not in the detector label set",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_contains_person() {
        let table = ReferenceTable::with_defaults();
        assert_eq!(table.lookup("person"), Some(16.0));
    }

    #[test]
    fn test_defaults_all_positive() {
        let table = ReferenceTable::with_defaults();
        for (name, _) in DEFAULT_WIDTHS {
            let width = table.lookup(name).unwrap();
            assert!(width > 0.0, "width for {} must be positive", name);
        }
    }

    #[test]
    fn test_lookup_absent_class() {
        let table = ReferenceTable::with_defaults();
        assert_eq!(table.lookup("umbrella"), None);
        assert_eq!(table.lookup("no-such-class"), None);
    }

    #[test]
    fn test_from_entries_valid() {
        let table =
            ReferenceTable::from_entries(vec![("person".to_string(), 16.0)]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("person"), Some(16.0));
    }

    #[test]
    fn test_from_entries_rejects_zero_width() {
        let result = ReferenceTable::from_entries(vec![("person".to_string(), 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_entries_rejects_negative_width() {
        let result = ReferenceTable::from_entries(vec![("person".to_string(), -1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_rejects_nan() {
        let mut table = ReferenceTable::with_defaults();
        assert!(table.insert("person".to_string(), f64::NAN).is_err());
        assert!(table.insert("person".to_string(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_insert_overrides() {
        let mut table = ReferenceTable::with_defaults();
        table.insert("person".to_string(), 18.0).unwrap();
        assert_eq!(table.lookup("person"), Some(18.0));
    }

    #[test]
    fn test_validate_against_known_labels() {
        let table =
            ReferenceTable::from_entries(vec![("person".to_string(), 16.0)]).unwrap();
        assert!(table.validate_against(&["person", "bicycle"]).is_ok());
    }

    #[test]
    fn test_validate_against_unknown_label_fails() {
        let table =
            ReferenceTable::from_entries(vec![("unicorn".to_string(), 40.0)]).unwrap();
        let result = table.validate_against(&["person", "bicycle"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unicorn"));
    }
}

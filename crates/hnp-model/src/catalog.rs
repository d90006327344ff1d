//! Indicator catalog: which health indicators survive reshaping and the
//! tidy column each one becomes.
//!
//! The catalog doubles as the filter predicate (rows whose indicator code
//! is not a key are dropped) and as the renaming function applied during
//! the pivot. A lookup miss is absence, not an error: the source file
//! carries hundreds of series that are simply not part of the target set.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TidyError};

/// Closed mapping from World Bank indicator code to tidy column name.
///
/// Iteration order is code order (`BTreeMap`), which also fixes the order
/// of the pivoted indicator columns, so every run lays the output out the
/// same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorCatalog {
    entries: BTreeMap<String, String>,
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "SH.XPD.PCAP".to_string(),
            "health_exp_per_capita".to_string(),
        );
        entries.insert(
            "SH.XPD.PCAP.PP.KD".to_string(),
            "health_exp_per_capita_ppp".to_string(),
        );
        entries.insert("SH.XPD.TOTL.CD".to_string(), "health_exp_total".to_string());
        entries.insert("SH.XPD.TOTL.ZS".to_string(), "health_exp_pct_gdp".to_string());
        Self { entries }
    }
}

impl IndicatorCatalog {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load a replacement catalog from a JSON object of code -> column.
    /// An empty object is rejected: a catalog with no keys would silently
    /// reshape everything away.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&text).map_err(|error| {
            TidyError::Message(format!("parse catalog {}: {error}", path.display()))
        })?;
        if catalog.is_empty() {
            return Err(TidyError::EmptyCatalog {
                path: path.display().to_string(),
            });
        }
        Ok(catalog)
    }

    /// Tidy column name for an indicator code, or `None` when the code is
    /// not part of the target set.
    pub fn semantic_name(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code.trim())
    }

    /// Tidy column names in catalog (code-sorted) order.
    pub fn semantic_names(&self) -> Vec<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_four_expenditure_series() {
        let catalog = IndicatorCatalog::default();
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.semantic_name("SH.XPD.PCAP"),
            Some("health_exp_per_capita")
        );
        assert_eq!(
            catalog.semantic_name("SH.XPD.TOTL.ZS"),
            Some("health_exp_pct_gdp")
        );
    }

    #[test]
    fn lookup_miss_is_absence() {
        let catalog = IndicatorCatalog::default();
        assert_eq!(catalog.semantic_name("XYZ.999"), None);
        assert!(!catalog.contains("XYZ.999"));
    }

    #[test]
    fn lookup_trims_whitespace() {
        let catalog = IndicatorCatalog::default();
        assert!(catalog.contains(" SH.XPD.PCAP "));
    }

    #[test]
    fn semantic_names_follow_code_order() {
        let catalog = IndicatorCatalog::default();
        assert_eq!(
            catalog.semantic_names(),
            vec![
                "health_exp_per_capita",
                "health_exp_per_capita_ppp",
                "health_exp_total",
                "health_exp_pct_gdp",
            ]
        );
    }

    #[test]
    fn serde_round_trips_as_plain_map() {
        let catalog = IndicatorCatalog::default();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"SH.XPD.PCAP\":\"health_exp_per_capita\""));
        let back: IndicatorCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}

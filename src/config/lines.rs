//! Static line catalogue: which legs and machines exist on each line.
//!
//! The catalogue only constrains what the operator surfaces (CLI, API) accept
//! when a session is started; the store keeps whatever strings it is given.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpec {
    pub legs: Vec<String>,
    pub machines: Vec<String>,
}

impl LineSpec {
    fn new(leg_count: usize, machines: &[&str]) -> Self {
        Self {
            legs: (1..=leg_count).map(|n| format!("Leg {n}")).collect(),
            machines: machines.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinesConfig {
    /// Reject start requests whose line/leg/machine is not in the catalogue.
    pub enforce: bool,
    pub catalogue: BTreeMap<String, LineSpec>,
}

impl Default for LinesConfig {
    fn default() -> Self {
        let mut catalogue = BTreeMap::new();
        catalogue.insert("Star 1".to_string(), LineSpec::new(6, &["HRM", "TTM"]));
        catalogue.insert("Star 2".to_string(), LineSpec::new(7, &["HRM", "TTM"]));
        catalogue.insert("Star 3".to_string(), LineSpec::new(3, &["HRM", "TTM"]));
        catalogue.insert("Star 5".to_string(), LineSpec::new(4, &["HRM", "TTM"]));
        catalogue.insert("Star 6".to_string(), LineSpec::new(3, &["JTA", "TFR"]));

        Self {
            enforce: true,
            catalogue,
        }
    }
}

impl LinesConfig {
    /// Verify that `leg` and `machine` belong to `line`.
    /// Always succeeds when enforcement is disabled.
    pub fn check(&self, line: &str, leg: &str, machine: &str) -> AppResult<()> {
        if !self.enforce {
            return Ok(());
        }

        let spec = self
            .catalogue
            .get(line)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown line '{line}'")))?;

        if !spec.legs.iter().any(|l| l == leg) {
            return Err(AppError::InvalidInput(format!(
                "Leg '{leg}' is not valid for line '{line}'"
            )));
        }

        if !spec.machines.iter().any(|m| m == machine) {
            return Err(AppError::InvalidInput(format!(
                "Machine '{machine}' is not valid for line '{line}'"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalogue_matches_plant_layout() {
        let lines = LinesConfig::default();
        assert_eq!(lines.catalogue.len(), 5);
        assert_eq!(lines.catalogue["Star 2"].legs.len(), 7);
        assert_eq!(lines.catalogue["Star 6"].machines, vec!["JTA", "TFR"]);
    }

    #[test]
    fn check_accepts_known_combination() {
        let lines = LinesConfig::default();
        assert!(lines.check("Star 1", "Leg 6", "TTM").is_ok());
    }

    #[test]
    fn check_rejects_unknown_values() {
        let lines = LinesConfig::default();
        assert!(matches!(
            lines.check("Star 4", "Leg 1", "HRM"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(lines.check("Star 3", "Leg 4", "HRM").is_err());
        assert!(lines.check("Star 6", "Leg 1", "HRM").is_err());
    }

    #[test]
    fn check_is_skipped_when_not_enforced() {
        let lines = LinesConfig {
            enforce: false,
            ..LinesConfig::default()
        };
        assert!(lines.check("anything", "goes", "here").is_ok());
    }
}

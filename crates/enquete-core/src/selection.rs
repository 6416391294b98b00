//! Which facilities a run imports.

use std::collections::BTreeSet;

use enquete_model::{Config, Corporation, Facility};

use crate::error::SelectionError;

/// Corporation and facility selectors from the command line. Empty lists
/// select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub corporations: Vec<String>,
    /// Facility keys, bare (`tokyo`) or qualified (`acme.tokyo`).
    pub facilities: Vec<String>,
}

/// A selected facility with its corporation.
pub type Target<'c> = (&'c Corporation, &'c Facility);

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_corporation(mut self, key: impl Into<String>) -> Self {
        self.corporations.push(key.into());
        self
    }

    pub fn with_facility(mut self, key: impl Into<String>) -> Self {
        self.facilities.push(key.into());
        self
    }

    /// Facilities matching the selectors, in configuration order.
    ///
    /// A bare facility key matches that facility in every selected
    /// corporation. Every selector must name something configured.
    pub fn resolve<'c>(&self, config: &'c Config) -> Result<Vec<Target<'c>>, SelectionError> {
        let corporations: BTreeSet<&str> = self.corporations.iter().map(|key| key.trim()).collect();
        let unknown: Vec<String> = corporations
            .iter()
            .filter(|key| config.corporation(key).is_none())
            .map(ToString::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(SelectionError::UnknownCorporations(unknown));
        }

        let filters: BTreeSet<&str> = self.facilities.iter().map(|key| key.trim()).collect();
        let known: BTreeSet<String> = config
            .facilities()
            .flat_map(|(corp, facility)| {
                [facility.key.clone(), qualified_key(corp, facility)]
            })
            .collect();
        let unknown: Vec<String> = filters
            .iter()
            .filter(|key| !known.contains(**key))
            .map(ToString::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(SelectionError::UnknownFacilities(unknown));
        }

        Ok(config
            .facilities()
            .filter(|(corp, _)| corporations.is_empty() || corporations.contains(corp.key.as_str()))
            .filter(|(corp, facility)| {
                filters.is_empty()
                    || filters.contains(facility.key.as_str())
                    || filters.contains(qualified_key(corp, facility).as_str())
            })
            .collect())
    }
}

/// `corporation.facility`.
pub fn qualified_key(corporation: &Corporation, facility: &Facility) -> String {
    format!("{}.{}", corporation.key, facility.key)
}

#[cfg(test)]
mod tests {
    use enquete_model::{DbConfig, FacilityCode, MappingScope};

    use super::*;

    fn corporation(key: &str, facilities: &[&str]) -> Corporation {
        Corporation {
            key: key.to_string(),
            db: DbConfig::default(),
            mappings: MappingScope::new(),
            mapping: None,
            facilities: facilities
                .iter()
                .enumerate()
                .map(|(i, name)| Facility::new(*name, FacilityCode::Integer(i as i64 + 1), "sheet"))
                .collect(),
        }
    }

    fn config() -> Config {
        Config::new(vec![
            corporation("acme", &["tokyo", "osaka"]),
            corporation("globex", &["tokyo", "sendai"]),
        ])
    }

    fn keys(targets: &[Target<'_>]) -> Vec<String> {
        targets
            .iter()
            .map(|(corp, facility)| qualified_key(corp, facility))
            .collect()
    }

    #[test]
    fn test_empty_selection_targets_everything() {
        let config = config();
        let targets = Selection::all().resolve(&config).unwrap();
        assert_eq!(
            keys(&targets),
            vec!["acme.tokyo", "acme.osaka", "globex.tokyo", "globex.sendai"]
        );
    }

    #[test]
    fn test_bare_facility_key_matches_every_corporation() {
        let config = config();
        let targets = Selection::all().with_facility("tokyo").resolve(&config).unwrap();
        assert_eq!(keys(&targets), vec!["acme.tokyo", "globex.tokyo"]);
    }

    #[test]
    fn test_qualified_key_and_corporation_filters() {
        let config = config();
        let targets = Selection::all()
            .with_facility("globex.tokyo")
            .resolve(&config)
            .unwrap();
        assert_eq!(keys(&targets), vec!["globex.tokyo"]);

        let targets = Selection::all()
            .with_corporation("acme")
            .with_facility("sendai")
            .resolve(&config)
            .unwrap();
        assert!(targets.is_empty());

        let targets = Selection::all().with_corporation("acme").resolve(&config).unwrap();
        assert_eq!(keys(&targets), vec!["acme.tokyo", "acme.osaka"]);
    }

    #[test]
    fn test_unknown_selectors_are_rejected() {
        let config = config();
        assert_eq!(
            Selection::all().with_corporation("initech").resolve(&config),
            Err(SelectionError::UnknownCorporations(vec!["initech".to_string()]))
        );
        assert_eq!(
            Selection::all()
                .with_facility("acme.sendai")
                .with_facility("nagoya")
                .resolve(&config),
            Err(SelectionError::UnknownFacilities(vec![
                "acme.sendai".to_string(),
                "nagoya".to_string()
            ]))
        );
    }
}

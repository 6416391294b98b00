//! Mapping catalog resolution.
//!
//! The effective catalog for a facility is the first hit of an ordered list
//! of lookups:
//!
//! 1. the selected `mapping` key (the facility's, else the corporation's),
//!    looked up in the facility's catalogs and then in the corporation's;
//! 2. the facility `default` catalog;
//! 3. the corporation `default` catalog;
//! 4. the root `default` catalog.
//!
//! A selected key that names no catalog is logged and falls through to the
//! default tiers.

use std::fmt;

use enquete_model::{
    ColumnName, ConversionTable, Corporation, Facility, ImportJobSpec, IntRange, MappingCatalog,
    MappingReference, MappingScope, ValueType,
};
use tracing::{debug, warn};

use crate::error::MappingError;

/// Where a resolved catalog was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSource {
    /// Selected key found among the facility's catalogs.
    FacilitySelected,
    /// Selected key found among the corporation's catalogs.
    CorporationSelected,
    FacilityDefault,
    CorporationDefault,
    RootDefault,
    /// Catalog written inline in an `imports` entry.
    Inline,
}

impl CatalogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FacilitySelected => "facility",
            Self::CorporationSelected => "corporation",
            Self::FacilityDefault => "facility default",
            Self::CorporationDefault => "corporation default",
            Self::RootDefault => "root default",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog field with its conversion table and clamp range attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    pub value_type: ValueType,
    pub column: ColumnName,
    pub header: String,
    pub conversion: Option<ConversionTable>,
    pub clamp: Option<IntRange>,
}

/// The effective catalog of one import job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    catalog: String,
    source: CatalogSource,
    fields: Vec<BoundField>,
}

impl ResolvedMapping {
    /// Name of the resolved catalog.
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    /// Fields in section order (string, text, integer, date, datetime),
    /// then declaration order.
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn field(&self, column: &str) -> Option<&BoundField> {
        self.fields.iter().find(|field| field.column.as_str() == column)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.column.as_str()).collect()
    }

    /// Non-empty headers the sheet must contain.
    pub fn required_headers(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|field| field.header.as_str())
            .filter(|header| !header.is_empty())
    }
}

type Lookup<'c> = Box<dyn Fn() -> Option<(&'c MappingCatalog, CatalogSource)> + 'c>;

/// Resolves catalogs against the root, corporation and facility scopes.
#[derive(Debug, Clone, Copy)]
pub struct MappingResolver<'c> {
    root: &'c MappingScope,
}

impl<'c> MappingResolver<'c> {
    pub fn new(root: &'c MappingScope) -> Self {
        Self { root }
    }

    /// Resolves the facility's own catalog selection.
    pub fn resolve(
        &self,
        corporation: &'c Corporation,
        facility: &'c Facility,
    ) -> Result<ResolvedMapping, MappingError> {
        self.resolve_key(corporation, facility, facility.mapping.as_deref())
    }

    /// Resolves one import job; a named job catalog takes the place of the
    /// facility's `mapping` key.
    pub fn resolve_job(
        &self,
        corporation: &'c Corporation,
        facility: &'c Facility,
        job: &'c ImportJobSpec,
    ) -> Result<ResolvedMapping, MappingError> {
        match &job.mapping {
            Some(MappingReference::Inline(catalog)) => {
                Ok(self.bind(corporation, facility, catalog, CatalogSource::Inline))
            }
            Some(MappingReference::Named(key)) => {
                self.resolve_key(corporation, facility, Some(key.as_str()))
            }
            None => self.resolve_key(corporation, facility, None),
        }
    }

    /// Resolves with an explicit selected key. Without one, the
    /// corporation's `mapping` key is selected.
    pub fn resolve_key(
        &self,
        corporation: &'c Corporation,
        facility: &'c Facility,
        key: Option<&'c str>,
    ) -> Result<ResolvedMapping, MappingError> {
        let key = key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or(corporation.mapping.as_deref());
        let (catalog, source) = self
            .tiers(corporation, facility, key)
            .iter()
            .find_map(|lookup| lookup())
            .ok_or_else(|| MappingError::NoCatalog {
                corporation: corporation.key.clone(),
                facility: facility.key.clone(),
            })?;

        if let Some(key) = key
            && !matches!(
                source,
                CatalogSource::FacilitySelected | CatalogSource::CorporationSelected
            )
        {
            warn!(
                corporation = %corporation.key,
                facility = %facility.key,
                mapping = key,
                fallback = %source,
                "selected mapping catalog not found, falling back"
            );
        }
        debug!(
            corporation = %corporation.key,
            facility = %facility.key,
            catalog = catalog.name(),
            source = %source,
            "mapping catalog resolved"
        );
        Ok(self.bind(corporation, facility, catalog, source))
    }

    fn tiers(
        &self,
        corporation: &'c Corporation,
        facility: &'c Facility,
        key: Option<&'c str>,
    ) -> [Lookup<'c>; 4] {
        let root = self.root;
        [
            Box::new(move || {
                let key = key?;
                facility
                    .mappings
                    .catalog(key)
                    .map(|catalog| (catalog, CatalogSource::FacilitySelected))
                    .or_else(|| {
                        corporation
                            .mappings
                            .catalog(key)
                            .map(|catalog| (catalog, CatalogSource::CorporationSelected))
                    })
            }),
            Box::new(move || {
                facility
                    .mappings
                    .default_catalog()
                    .map(|catalog| (catalog, CatalogSource::FacilityDefault))
            }),
            Box::new(move || {
                corporation
                    .mappings
                    .default_catalog()
                    .map(|catalog| (catalog, CatalogSource::CorporationDefault))
            }),
            Box::new(move || {
                root.default_catalog()
                    .map(|catalog| (catalog, CatalogSource::RootDefault))
            }),
        ]
    }

    fn bind(
        &self,
        corporation: &Corporation,
        facility: &Facility,
        catalog: &MappingCatalog,
        source: CatalogSource,
    ) -> ResolvedMapping {
        let fields = catalog
            .iter_fields()
            .map(|(value_type, field)| BoundField {
                value_type,
                column: field.column.clone(),
                header: field.header.clone(),
                conversion: self
                    .conversion_for(corporation, facility, catalog, &field.variant)
                    .cloned(),
                clamp: catalog.field_clamp(value_type, &field.variant),
            })
            .collect();
        ResolvedMapping {
            catalog: catalog.name().to_string(),
            source,
            fields,
        }
    }

    /// Conversion table for a section variant: catalog, then facility,
    /// corporation and root scopes. The plain sections use the unsuffixed
    /// `conversion` table.
    fn conversion_for<'s>(
        &'s self,
        corporation: &'s Corporation,
        facility: &'s Facility,
        catalog: &'s MappingCatalog,
        variant: &str,
    ) -> Option<&'s ConversionTable> {
        catalog
            .conversion(variant)
            .or_else(|| facility.mappings.conversion(variant))
            .or_else(|| corporation.mappings.conversion(variant))
            .or_else(|| self.root.conversion(variant))
    }
}

#[cfg(test)]
mod tests {
    use enquete_model::{DbConfig, FacilityCode};

    use super::*;

    fn catalog(name: &str, column: &str) -> MappingCatalog {
        MappingCatalog::new(name)
            .with_field(ValueType::String, column, column)
            .unwrap()
    }

    fn corporation(mappings: MappingScope, facility: Facility) -> Corporation {
        Corporation {
            key: "acme".to_string(),
            db: DbConfig::default(),
            mappings,
            mapping: None,
            facilities: vec![facility],
        }
    }

    #[test]
    fn selected_key_prefers_facility_catalogs() {
        let mut facility = Facility::new("tokyo", FacilityCode::Integer(1), "sheet");
        facility.mapping = Some("seasonal".to_string());
        facility.mappings = MappingScope::new().with_catalog(catalog("seasonal", "from_facility"));
        let corp = corporation(
            MappingScope::new().with_catalog(catalog("seasonal", "from_corporation")),
            facility,
        );
        let root = MappingScope::new();

        let resolved = MappingResolver::new(&root)
            .resolve(&corp, &corp.facilities[0])
            .unwrap();
        assert_eq!(resolved.source(), CatalogSource::FacilitySelected);
        assert_eq!(resolved.column_names(), vec!["from_facility"]);
    }

    #[test]
    fn unknown_key_falls_through_to_defaults() {
        let mut facility = Facility::new("tokyo", FacilityCode::Integer(1), "sheet");
        facility.mapping = Some("missing".to_string());
        let corp = corporation(
            MappingScope::new().with_catalog(catalog("default", "corp_default")),
            facility,
        );
        let root = MappingScope::new().with_catalog(catalog("default", "root_default"));

        let resolved = MappingResolver::new(&root)
            .resolve(&corp, &corp.facilities[0])
            .unwrap();
        assert_eq!(resolved.source(), CatalogSource::CorporationDefault);
    }

    #[test]
    fn nothing_resolvable_is_an_error() {
        let corp = corporation(
            MappingScope::new(),
            Facility::new("tokyo", FacilityCode::Integer(1), "sheet"),
        );
        let root = MappingScope::new();
        let err = MappingResolver::new(&root)
            .resolve(&corp, &corp.facilities[0])
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::NoCatalog {
                corporation: "acme".to_string(),
                facility: "tokyo".to_string(),
            }
        );
    }
}

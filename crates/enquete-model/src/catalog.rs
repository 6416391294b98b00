//! Mapping catalogs: column-to-header associations grouped by value type.
//!
//! A catalog section may carry a variant suffix (`string_yesno`, `integer2`).
//! Fields declared in a suffixed section are bound to the conversion table
//! and clamp range registered under the same suffix. The empty suffix
//! belongs to the plain sections (`string`, `integer`, ...).

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ModelError, Result};
use crate::ids::ColumnName;
use crate::record::GENERATED_COLUMNS;
use crate::value::ValueType;

/// One declared column: database column key, spreadsheet header, variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: ColumnName,
    pub header: String,
    pub variant: String,
}

impl FieldSpec {
    pub fn new(column: ColumnName, header: impl Into<String>) -> Self {
        Self {
            column,
            header: header.into(),
            variant: String::new(),
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }
}

/// Exact-match value translation applied to a cell before coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionTable {
    entries: BTreeMap<String, String>,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    /// Returns the translated value, or the input when no entry matches.
    pub fn apply<'a>(&'a self, value: &'a str) -> &'a str {
        self.entries.get(value).map_or(value, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConversionTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (from, to) in iter {
            table.insert(from, to);
        }
        table
    }
}

/// Bounds of `integer2` fields when the catalog declares no `clamp2`.
pub const INTEGER2_CLAMP: IntRange = IntRange { min: 0, max: 100 };

/// Inclusive integer bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(ModelError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

/// A named bundle of typed column mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingCatalog {
    name: String,
    sections: BTreeMap<ValueType, Vec<FieldSpec>>,
    conversions: BTreeMap<String, ConversionTable>,
    clamps: BTreeMap<String, IntRange>,
}

impl MappingCatalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: BTreeMap::new(),
            conversions: BTreeMap::new(),
            clamps: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a field to a section.
    ///
    /// Rejects a column already declared anywhere in the catalog and the
    /// importer-generated column names.
    pub fn push_field(&mut self, value_type: ValueType, field: FieldSpec) -> Result<()> {
        if GENERATED_COLUMNS.contains(&field.column.as_str()) {
            return Err(ModelError::ReservedColumn {
                catalog: self.name.clone(),
                column: field.column.to_string(),
            });
        }
        if let Some(existing) = self.type_of(field.column.as_str()) {
            return Err(ModelError::DuplicateColumn {
                catalog: self.name.clone(),
                column: field.column.to_string(),
                first: existing,
                second: value_type,
            });
        }
        self.sections.entry(value_type).or_default().push(field);
        Ok(())
    }

    /// Builder form of [`push_field`](Self::push_field).
    pub fn with_field(
        mut self,
        value_type: ValueType,
        column: &str,
        header: &str,
    ) -> Result<Self> {
        let column = ColumnName::new(column)?;
        self.push_field(value_type, FieldSpec::new(column, header))?;
        Ok(self)
    }

    pub fn set_conversion(&mut self, variant: impl Into<String>, table: ConversionTable) {
        self.conversions.insert(variant.into(), table);
    }

    pub fn set_clamp(&mut self, variant: impl Into<String>, range: IntRange) {
        self.clamps.insert(variant.into(), range);
    }

    pub fn fields(&self, value_type: ValueType) -> &[FieldSpec] {
        self.sections.get(&value_type).map_or(&[], Vec::as_slice)
    }

    /// All fields in section order, then declaration order.
    pub fn iter_fields(&self) -> impl Iterator<Item = (ValueType, &FieldSpec)> {
        ValueType::ALL
            .into_iter()
            .flat_map(move |value_type| self.fields(value_type).iter().map(move |f| (value_type, f)))
    }

    pub fn field(&self, value_type: ValueType, column: &str) -> Option<&FieldSpec> {
        self.fields(value_type)
            .iter()
            .find(|field| field.column.as_str() == column)
    }

    pub fn type_of(&self, column: &str) -> Option<ValueType> {
        self.iter_fields()
            .find(|(_, field)| field.column.as_str() == column)
            .map(|(value_type, _)| value_type)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.iter_fields().map(|(_, f)| f.column.as_str()).collect()
    }

    pub fn required_headers(&self) -> BTreeSet<&str> {
        self.iter_fields()
            .map(|(_, f)| f.header.as_str())
            .filter(|header| !header.is_empty())
            .collect()
    }

    pub fn conversion(&self, variant: &str) -> Option<&ConversionTable> {
        self.conversions.get(variant)
    }

    /// Clamp declared for `variant` (`clamp<variant>`).
    pub fn clamp(&self, variant: &str) -> Option<IntRange> {
        self.clamps.get(variant).copied()
    }

    /// Clamp applied to a field: the declared one, else [`INTEGER2_CLAMP`]
    /// for `integer2` fields.
    pub fn field_clamp(&self, value_type: ValueType, variant: &str) -> Option<IntRange> {
        self.clamp(variant).or_else(|| {
            (value_type == ValueType::Integer && variant == "2").then_some(INTEGER2_CLAMP)
        })
    }

    pub fn field_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

/// Catalogs and shared conversion tables defined at one configuration level
/// (root, corporation or facility).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingScope {
    catalogs: BTreeMap<String, MappingCatalog>,
    conversions: BTreeMap<String, ConversionTable>,
}

impl MappingScope {
    pub const DEFAULT_CATALOG: &'static str = "default";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_catalog(&mut self, catalog: MappingCatalog) {
        self.catalogs.insert(catalog.name().to_string(), catalog);
    }

    pub fn with_catalog(mut self, catalog: MappingCatalog) -> Self {
        self.insert_catalog(catalog);
        self
    }

    pub fn insert_conversion(&mut self, variant: impl Into<String>, table: ConversionTable) {
        self.conversions.insert(variant.into(), table);
    }

    pub fn catalog(&self, name: &str) -> Option<&MappingCatalog> {
        self.catalogs.get(name)
    }

    pub fn default_catalog(&self) -> Option<&MappingCatalog> {
        self.catalog(Self::DEFAULT_CATALOG)
    }

    pub fn conversion(&self, variant: &str) -> Option<&ConversionTable> {
        self.conversions.get(variant)
    }

    pub fn catalog_names(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty() && self.conversions.is_empty()
    }
}

//! Alias resolution and column renaming.

use super::fields::CanonicalField;
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Which raw header was matched for each canonical field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    sources: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    /// Raw header matched for `field`, if any.
    pub fn source(&self, field: CanonicalField) -> Option<&str> {
        self.sources.get(&field).map(String::as_str)
    }

    /// Whether `field` was matched.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.sources.contains_key(&field)
    }

    /// Labels of required fields with no matching alias, in field order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| f.is_required() && !self.contains(*f))
            .map(CanonicalField::missing_label)
            .collect()
    }

    /// Matched `(field, raw header)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.sources.iter().map(|(f, s)| (*f, s.as_str()))
    }
}

/// Feature switches derived from which optional columns exist.
///
/// Computed once at load time so the presentation layer never re-probes
/// column presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub has_ship_date: bool,
    pub has_region: bool,
    pub has_category: bool,
    pub has_product: bool,
}

impl Capabilities {
    pub fn from_mapping(mapping: &ColumnMapping) -> Self {
        Self {
            has_ship_date: mapping.contains(CanonicalField::ShipDate),
            has_region: mapping.contains(CanonicalField::Region),
            has_category: mapping.contains(CanonicalField::Category),
            has_product: mapping.contains(CanonicalField::Product),
        }
    }

    /// Whether the optional column for `field` is available.
    ///
    /// Required fields are always available on a canonical record set.
    pub fn supports(&self, field: CanonicalField) -> bool {
        match field {
            CanonicalField::OrderDate | CanonicalField::Sales => true,
            CanonicalField::ShipDate => self.has_ship_date,
            CanonicalField::Region => self.has_region,
            CanonicalField::Category => self.has_category,
            CanonicalField::Product => self.has_product,
        }
    }
}

/// Pick, for every canonical field, the first alias present in `present`.
///
/// When several aliases of one field are present, list order decides: with
/// both `Sales` and `Total` in the header, `Sales` is used and `Total` passes
/// through untouched.
pub fn resolve_columns<S: AsRef<str>>(present: &[S]) -> ColumnMapping {
    let present: HashSet<&str> = present.iter().map(|s| s.as_ref()).collect();

    let sources = CanonicalField::ALL
        .into_iter()
        .filter_map(|field| {
            field
                .aliases()
                .iter()
                .find(|alias| present.contains(**alias))
                .map(|alias| (field, alias.to_string()))
        })
        .collect();

    ColumnMapping { sources }
}

/// Maps raw headers onto the canonical schema.
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// Rename matched columns to their canonical names.
    ///
    /// Fails with [`DashboardError::MissingRequiredColumn`] listing every
    /// missing required field; nothing is renamed in that case. Unmatched
    /// columns pass through unchanged.
    pub fn normalize(mut df: DataFrame) -> Result<(DataFrame, ColumnMapping)> {
        let headers: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mapping = resolve_columns(headers.as_slice());

        let missing = mapping.missing_required();
        if !missing.is_empty() {
            return Err(DashboardError::MissingRequiredColumn {
                fields: missing.into_iter().map(String::from).collect(),
            });
        }

        for (field, source) in mapping.iter() {
            debug!("Matched '{}' -> '{}'", source, field);
            if source != field.canonical_name() {
                df.rename(source, field.canonical_name().into())?;
            }
        }

        Ok((df, mapping))
    }
}

//! Narrows the catalog to the entries a run asked for.

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{FlightError, Result};

/// Checks every requested name against the catalog.
///
/// Fails on the first name with no entry, before anything runs.
pub fn validate<S: AsRef<str>>(catalog: &Catalog, requested: &[S]) -> Result<()> {
    match requested.iter().find(|name| !catalog.contains(name.as_ref())) {
        Some(unknown) => Err(FlightError::UnknownSimulator(unknown.as_ref().to_string())),
        None => Ok(()),
    }
}

/// Returns the requested entries in catalog order.
///
/// The order of `requested` never matters. An empty request selects the
/// whole catalog. Names are assumed valid; see [`validate`].
pub fn select<'a, S: AsRef<str>>(catalog: &'a Catalog, requested: &[S]) -> Vec<&'a CatalogEntry> {
    if requested.is_empty() {
        return catalog.entries().iter().collect();
    }

    catalog
        .entries()
        .iter()
        .filter(|entry| requested.iter().any(|name| name.as_ref() == entry.name()))
        .collect()
}

/// Validates then selects.
pub fn resolve<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    requested: &[S],
) -> Result<Vec<&'a CatalogEntry>> {
    validate(catalog, requested)?;
    Ok(select(catalog, requested))
}

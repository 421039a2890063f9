//! Catalog-backed resolver.

use time::OffsetDateTime;

use crate::catalog::Catalog;
use crate::{sidereal, ObjectPosition, Resolver, Site};

/// Resolves object names against the fixed-object catalog and derives the
/// horizon state for the observatory site.
///
/// Objects missing from the catalog come back marked unresolved; full name
/// resolution against online services is a separate collaborator.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    catalog: Catalog,
    site: Site,
}

impl CatalogResolver {
    pub fn new(catalog: Catalog, site: Site) -> Self {
        Self { catalog, site }
    }

    pub fn site(&self) -> Site {
        self.site
    }
}

impl Resolver for CatalogResolver {
    fn resolve(&self, name: &str, when: OffsetDateTime) -> ObjectPosition {
        let name = normalize_name(name);
        match self.catalog.find(&name) {
            Some(entry) => {
                let eq = entry.equatorial();
                let horizon = sidereal::horizon_state(&eq, &self.site, when);
                ObjectPosition {
                    name,
                    found: true,
                    equatorial: Some(eq),
                    horizon: Some(horizon),
                }
            }
            None => ObjectPosition::unresolved(name),
        }
    }
}

/// Trim and collapse internal whitespace in an object name.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Celestial object information
//!
//! This crate provides the position types and the resolver seam used by the
//! queue manager: equatorial and horizon coordinates, sexagesimal
//! formatting, the fixed-object position catalog, and a catalog-backed
//! resolver that derives hour angle, altitude and azimuth for "now" from
//! local sidereal time.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub mod catalog;
mod resolver;
pub mod sexagesimal;
pub mod sidereal;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use resolver::{normalize_name, CatalogResolver};

/// Observatory location used for horizon-coordinate derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Geodetic latitude in degrees, north positive
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive
    pub longitude_deg: f64,
}

/// Equatorial coordinates qualified by their reference epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equatorial {
    /// Right ascension in degrees
    pub ra_deg: f64,
    /// Declination in degrees
    pub dec_deg: f64,
    /// Reference epoch year, e.g. 2000.0
    pub epoch: f64,
}

impl Equatorial {
    /// Epoch label in the usual Julian form, e.g. "J2000".
    pub fn epoch_label(&self) -> String {
        format!("J{:.0}", self.epoch)
    }
}

/// Horizon-frame state of an object at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonState {
    /// Hour angle in degrees, negative east of the meridian
    pub ha_deg: f64,
    /// Altitude above the horizon in degrees
    pub alt_deg: f64,
    /// Azimuth in degrees, from north through east
    pub az_deg: f64,
}

/// Resolved (or marked unresolved) position of one object.
///
/// Recomputed on demand and never persisted. An unresolved object keeps its
/// name and the `found` flag; both coordinate blocks stay empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPosition {
    /// Normalized object name
    pub name: String,
    /// Whether the name matched a catalog entry
    pub found: bool,
    pub equatorial: Option<Equatorial>,
    pub horizon: Option<HorizonState>,
}

impl ObjectPosition {
    /// An unresolved position: name kept, coordinates empty.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            found: false,
            equatorial: None,
            horizon: None,
        }
    }

    /// Right ascension as sexagesimal hours, e.g. "00 42 44.33".
    pub fn ra_sexagesimal(&self) -> Option<String> {
        self.equatorial.map(|eq| sexagesimal::hours(eq.ra_deg))
    }

    /// Declination as signed sexagesimal degrees, e.g. "+41 16 09.0".
    pub fn dec_sexagesimal(&self) -> Option<String> {
        self.equatorial.map(|eq| sexagesimal::degrees(eq.dec_deg))
    }

    /// Hour angle as signed sexagesimal hours, e.g. "-03 25 11.2".
    pub fn ha_sexagesimal(&self) -> Option<String> {
        self.horizon.map(|h| sexagesimal::hours_signed(h.ha_deg))
    }
}

/// Maps an object name to its sky position for a given instant.
///
/// This is the seam to external resolution services; the built-in
/// [`CatalogResolver`] resolves against the fixed-object catalog only.
/// Resolution failure is not an error: unknown objects come back marked
/// unresolved.
pub trait Resolver {
    fn resolve(&self, name: &str, when: OffsetDateTime) -> ObjectPosition;
}

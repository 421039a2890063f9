//! Fixed-object position catalog (objpos format).
//!
//! Whitespace-delimited columns:
//! `Object RAd RAm RAs DECd DECm DECs Epoch PierSide GuidingStar GuiderPos`,
//! the RA triple in hours/minutes/seconds, the DEC triple in degrees.
//! Comment lines start with `#`. Malformed lines are skipped with a
//! warning; a missing file is the caller's signal to degrade to an empty
//! catalog.

use std::fs;
use std::path::Path;

use log::warn;
use thiserror::Error;

use crate::Equatorial;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error reading catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// One fixed-object entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub object: String,
    /// Right ascension in degrees
    pub ra_deg: f64,
    /// Declination in degrees
    pub dec_deg: f64,
    /// Coordinate epoch year
    pub epoch: f64,
    /// Telescope pier side hint
    pub pier_side: String,
    pub guiding_star: String,
    pub guider_position: String,
}

impl CatalogEntry {
    pub fn equatorial(&self) -> Equatorial {
        Equatorial {
            ra_deg: self.ra_deg,
            dec_deg: self.dec_deg,
            epoch: self.epoch,
        }
    }
}

/// All known fixed-object positions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// A catalog with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Look up an object by exact name.
    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.object == name)
    }

    /// Parse catalog text, skipping comments and malformed lines.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_entry(line) {
                Some(entry) => entries.push(entry),
                None => warn!("objpos line {} malformed, skipping: {}", idx + 1, line),
            }
        }
        Self { entries }
    }

    /// Load a catalog from a file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }
}

fn parse_entry(line: &str) -> Option<CatalogEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 11 {
        return None;
    }

    let ra_h: f64 = fields[1].parse().ok()?;
    let ra_m: f64 = fields[2].parse().ok()?;
    let ra_s: f64 = fields[3].parse().ok()?;
    let dec_d: f64 = fields[4].parse().ok()?;
    let dec_m: f64 = fields[5].parse().ok()?;
    let dec_s: f64 = fields[6].parse().ok()?;
    let epoch: f64 = fields[7].parse().ok()?;

    // RA columns are hours; the sign of the declination comes from the
    // degrees token so "-00 12 30" keeps its sign
    let ra_deg = (ra_h + ra_m / 60.0 + ra_s / 3600.0) * 15.0;
    let dec_sign = if fields[4].starts_with('-') { -1.0 } else { 1.0 };
    let dec_deg = dec_sign * (dec_d.abs() + dec_m / 60.0 + dec_s / 3600.0);

    Some(CatalogEntry {
        object: fields[0].to_string(),
        ra_deg,
        dec_deg,
        epoch,
        pier_side: fields[8].to_string(),
        guiding_star: fields[9].to_string(),
        guider_position: fields[10].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Object  RAh RAm RAs  DECd DECm DECs  Epoch  Pier  Guide  GuiderPos
M31       00  42  44.3  +41  16  09    2000.0  E     HIP3881  120,80
BD-051234 05  30  00.0  -05  30  00    2000.0  W     none     0,0
";

    #[test]
    fn test_parse_entries() {
        let catalog = Catalog::parse(SAMPLE);
        assert_eq!(catalog.len(), 2);

        let m31 = catalog.find("M31").unwrap();
        assert!((m31.ra_deg - 10.684583).abs() < 1e-4);
        assert!((m31.dec_deg - 41.269167).abs() < 1e-4);
        assert_eq!(m31.epoch, 2000.0);
        assert_eq!(m31.pier_side, "E");
    }

    #[test]
    fn test_negative_declination_sign() {
        let catalog = Catalog::parse(SAMPLE);
        let entry = catalog.find("BD-051234").unwrap();
        assert!((entry.dec_deg + 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_negative_zero_degrees_keeps_sign() {
        let catalog = Catalog::parse("X 12 00 00 -00 30 00 2000.0 E none 0,0\n");
        let entry = catalog.find("X").unwrap();
        assert!((entry.dec_deg + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "M31 00 42 44.3 +41 16 09 2000.0 E HIP3881\nM42 05 35 17.3 -05 23 28 2000.0 E none 0,0\n";
        let catalog = Catalog::parse(text);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("M31").is_none());
        assert!(catalog.find("M42").is_some());
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let catalog = Catalog::parse("# header only\n\n");
        assert!(catalog.is_empty());
        assert!(catalog.find("M31").is_none());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = Catalog::load_from_file("/nonexistent/objpos.dat");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}

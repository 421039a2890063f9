//! Filter-name aliasing
//!
//! Two filters have long-form names with an embedded space ("Ha narrow",
//! "Ha wide"). Queue rows are whitespace-delimited, so in memory and on
//! row lines the single-token short codes "Han"/"Haw" are used; the long
//! forms are restored when rows are written out.

/// (long form, short code) alias pairs.
const ALIASES: [(&str, &str); 2] = [("Ha narrow", "Han"), ("Ha wide", "Haw")];

/// Replace long-form filter names with their short codes.
///
/// Substring replacement, intended for a row line before field splitting.
/// Header lines must not be passed through here.
pub fn normalize(text: &str) -> String {
    let mut out = text.to_string();
    for (long, short) in ALIASES {
        if out.contains(long) {
            out = out.replace(long, short);
        }
    }
    out
}

/// Restore the long form of a short filter code.
///
/// Exact-token match; any other filter string passes through unchanged.
pub fn denormalize(token: &str) -> &str {
    for (long, short) in ALIASES {
        if token == short {
            return long;
        }
    }
    token
}

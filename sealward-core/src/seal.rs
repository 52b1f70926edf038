//! Seal identifier normalization.

use crate::schema::COMPOUND_SEPARATOR;

/// Joins the per-trailer values of a double-trailer unit.
pub fn compose_compound(first: &str, second: &str) -> String {
    format!("{}{}{}", first.trim(), COMPOUND_SEPARATOR, second.trim())
}

/// Key used by the duplicate check on registration. Internal whitespace is kept.
pub fn registration_key(seal: &str) -> String {
    seal.trim().to_uppercase()
}

/// Key used when searching for a pending arrival: all whitespace removed.
pub fn lookup_key(seal: &str) -> String {
    seal.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

pub fn void_seal(prefix: &str, number: &str) -> String {
    format!("{}{}", prefix, number.trim()).to_uppercase()
}

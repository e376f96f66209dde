//! Unit code parsing.
//!
//! Codes are a short alphabetic subject prefix followed by a numeric part whose
//! first digit is the unit level, e.g. `FIT2004` is a level-2 FIT unit.

/// Subject prefix of a unit code, upper-cased ("fit1045" -> "FIT").
pub fn subject_prefix(code: &str) -> String {
    code.trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Level of a unit: the first digit after the subject prefix, 0 if absent.
pub fn unit_level(code: &str) -> u32 {
    code.trim()
        .chars()
        .skip_while(|c| c.is_ascii_alphabetic())
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0)
}

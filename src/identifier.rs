//! Derivation of C identifiers from file names.

use crate::bitmap::BitmapRecord;
use log::{info, warn};
use std::collections::HashSet;

/// Fallback identifier for names without any usable character.
pub const DEFAULT_IDENTIFIER: &str = "_var";

/// Turn an arbitrary name into a camelCase C identifier.
///
/// Characters outside `[A-Za-z0-9_]` separate words. The first word is
/// lower-cased, later words are capitalized, and a leading digit gets an
/// underscore prefix. Never fails.
///
/// ```
/// use c_bitmap::to_camel_case_identifier;
///
/// assert_eq!(to_camel_case_identifier("foo bar"), "fooBar");
/// assert_eq!(to_camel_case_identifier("3cats"), "_3cats");
/// assert_eq!(to_camel_case_identifier(""), "_var");
/// ```
pub fn to_camel_case_identifier(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut words = cleaned.split_whitespace();

    let first = match words.next() {
        Some(word) => word,
        None => return DEFAULT_IDENTIFIER.to_string(),
    };

    let mut ident = String::with_capacity(cleaned.len() + 1);
    if first.starts_with(|c: char| c.is_ascii_digit()) {
        ident.push('_');
    }
    ident.push_str(&first.to_ascii_lowercase());

    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            ident.push(c.to_ascii_uppercase());
            ident.push_str(&chars.as_str().to_ascii_lowercase());
        }
    }

    ident
}

/// Detect identifiers shared by several records.
///
/// With `rename` set, every record after the first one holding a given
/// identifier is renamed to `<ident>_<n>`, `n` counting up from 1 and
/// skipping names already taken. Otherwise collisions are only reported.
pub fn uniquify_identifiers(records: Vec<BitmapRecord>, rename: bool) -> Vec<BitmapRecord> {
    let mut taken: HashSet<String> = records
        .iter()
        .map(|r| r.identifier().to_string())
        .collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(record.identifier().to_string()) {
            result.push(record);
            continue;
        }

        if !rename {
            warn!(
                "{} collides with an earlier bitmap as {}",
                record.label(),
                record.identifier()
            );
            result.push(record);
            continue;
        }

        let mut n = 1;
        let ident = loop {
            let candidate = format!("{}_{}", record.identifier(), n);
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        info!(
            "{} renamed from {} to {}",
            record.label(),
            record.identifier(),
            ident
        );

        taken.insert(ident.clone());
        seen.insert(ident.clone());
        result.push(record.with_identifier(ident));
    }

    result
}

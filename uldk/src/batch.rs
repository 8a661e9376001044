//! Identifier batch parsing
//!
//! Raw user input (pasted text or a file) becomes an ordered, deduplicated
//! list of parcel keys. Individual malformed identifiers are not rejected
//! here: the registry is the authority on the identifier grammar and unknown
//! keys surface as per-key fetch failures, not batch errors.

use crate::types::ParcelKey;
use crate::UldkError;

/// Parses raw identifier input into an ordered set of parcel keys.
///
/// Splits on commas and newlines, trims whitespace, drops empty tokens and
/// deduplicates keeping the first occurrence.
///
/// # Errors
///
/// Returns [`UldkError::EmptyInput`] when nothing remains after splitting.
pub fn parse_identifiers(raw: &str) -> Result<Vec<ParcelKey>, UldkError> {
    let mut keys: Vec<ParcelKey> = Vec::new();

    for token in raw.split(['\n', ',']) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if keys.iter().any(|k| k.as_str() == token) {
            continue;
        }
        keys.push(ParcelKey::new(token));
    }

    if keys.is_empty() {
        return Err(UldkError::EmptyInput);
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(keys: &[ParcelKey]) -> Vec<&str> {
        keys.iter().map(|k| k.as_str()).collect()
    }

    #[test]
    fn test_split_on_commas_and_newlines() {
        let keys = parse_identifiers("123, 456\n789").unwrap();
        assert_eq!(strs(&keys), vec!["123", "456", "789"]);
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let keys = parse_identifiers("456, 123, 456, 123, 789").unwrap();
        assert_eq!(strs(&keys), vec!["456", "123", "789"]);
    }

    #[test]
    fn test_trims_and_drops_empty_tokens() {
        let keys = parse_identifiers("  123 ,, \n , 456  \n\n").unwrap();
        assert_eq!(strs(&keys), vec!["123", "456"]);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(parse_identifiers(""), Err(UldkError::EmptyInput)));
        assert!(matches!(
            parse_identifiers(" , \n , "),
            Err(UldkError::EmptyInput)
        ));
    }

    #[test]
    fn test_malformed_tokens_pass_through() {
        // Grammar enforcement belongs to the registry
        let keys = parse_identifiers("not-a-real-id").unwrap();
        assert_eq!(strs(&keys), vec!["not-a-real-id"]);
    }
}

//! Request symbol normalization

use std::collections::HashSet;

/// Trim and uppercase each symbol, dropping blanks and later duplicates
///
/// Duplicates are detected case-insensitively; the first occurrence keeps
/// its position.
pub fn normalize_symbols<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_dedupe_keeps_first_order() {
        assert_eq!(normalize_symbols(&["aapl", "AAPL", "msft"]), vec!["AAPL", "MSFT"]);
        assert_eq!(normalize_symbols(&["msft", "aapl", "Msft"]), vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn test_trims_and_drops_blank_entries() {
        let raw = vec![" tsla ".to_string(), String::new(), "   ".to_string(), "\tnvda\n".to_string()];
        assert_eq!(normalize_symbols(&raw), vec!["TSLA", "NVDA"]);
    }

    #[test]
    fn test_all_blank() {
        assert!(normalize_symbols(&["", " "]).is_empty());
        assert!(normalize_symbols::<&str>(&[]).is_empty());
    }
}

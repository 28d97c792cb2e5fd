//! Product name normalization.
//!
//! Folds free text to a canonical comparison form (no diacritics, no case,
//! no punctuation), strips dosage-form filler words, then resolves the
//! remainder against the synonym table with typo tolerance.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::fuzzy::within_typo_distance;
use crate::synonyms::SynonymTable;

/// Dosage-form and packaging words that never identify a substance.
/// Stored folded.
const FILLER_WORDS: &[&str] = &[
    "capsule",
    "capsules",
    "gelule",
    "gelules",
    "comprime",
    "comprimes",
    "cure",
    "cures",
    "mois",
    "complement",
    "complements",
    "alimentaire",
];

/// Fold text for comparison: NFD, strip combining marks, lowercase,
/// replace punctuation with spaces, collapse whitespace.
pub fn fold_text(input: &str) -> String {
    let folded: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop filler tokens from already-folded text.
pub fn strip_filler(folded: &str) -> String {
    folded
        .split_whitespace()
        .filter(|token| !FILLER_WORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Match folded text against one folded synonym: exact substring first,
/// then whole-string typo distance, then token-level typo distance.
pub fn text_matches_synonym(folded_text: &str, folded_synonym: &str) -> bool {
    if folded_synonym.is_empty() {
        return false;
    }
    if folded_text.contains(folded_synonym) {
        return true;
    }
    if within_typo_distance(folded_text, folded_synonym) {
        return true;
    }
    folded_text
        .split_whitespace()
        .any(|token| within_typo_distance(token, folded_synonym))
}

/// Outcome of normalization: the canonical name plus its known synonyms
/// when the table recognized the product, the trimmed raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProduct {
    pub canonical: String,
    pub synonyms: Vec<String>,
}

/// Resolve raw user text to a canonical product name.
pub fn normalize_product(raw: &str, table: &SynonymTable) -> NormalizedProduct {
    let stripped = strip_filler(&fold_text(raw));
    for row in table.rows() {
        for synonym in &row.synonyms {
            if text_matches_synonym(&stripped, &fold_text(synonym)) {
                return NormalizedProduct {
                    canonical: row.canonical.clone(),
                    synonyms: row.synonyms.clone(),
                };
            }
        }
    }
    NormalizedProduct {
        canonical: raw.trim().to_string(),
        synonyms: Vec::new(),
    }
}

use sha2::{Digest, Sha256};

use crate::model::Language;

/// Folds case and whitespace so near-identical terms share an index bucket.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Secondary index key for `(index, language)`.
///
/// Buckets are coarse (normalized text); callers still compare the exact
/// fields of every candidate.
pub fn term_key(index: &str, language: Language) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(index).as_bytes());
    hasher.update([0u8]);
    hasher.update(language.iso3().as_bytes());
    hex::encode(hasher.finalize())
}

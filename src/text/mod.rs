//! Text normalization and tokenization
//!
//! Shared by index construction and query execution: both sides must agree
//! on casing, diacritics, and the stop-word set or lexical scores drift.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fixed Spanish stop-word set: articles, prepositions, interrogatives, and
/// domain fillers that appear in every flattened catalog line.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Articles and pronouns
        "el", "la", "los", "las", "un", "una", "unos", "unas", "lo", "le",
        "les", "me", "mi", "tu", "te", "su", "sus", "se", "yo",
        // Prepositions and conjunctions
        "de", "del", "a", "al", "en", "y", "o", "u", "con", "por", "para",
        "sin", "sobre", "entre", "desde", "hasta",
        // Interrogatives and connectives
        "que", "cual", "cuales", "cuanto", "cuantos", "cuanta", "cuantas",
        "quien", "quienes", "donde", "cuando", "como", "porque", "si", "no",
        "pero", "mas",
        // Common verbs
        "es", "son", "esta", "estan", "ser", "estar", "hay", "tiene",
        "tienen", "lleva", "llevan",
        // Domain fillers present in nearly every record
        "curso", "cursos", "obligatorio",
    ]
    .into_iter()
    .collect()
});

/// Normalize a string for matching: lower-case, strip diacritics, collapse
/// any run of non-alphanumeric characters into a single space, trim.
///
/// Total over all inputs (including empty) and idempotent.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.to_lowercase().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Split normalized text on whitespace and drop stop words.
pub fn tokenize(s: &str) -> Vec<String> {
    normalize(s)
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

//! Deterministic intent router
//!
//! Keyword/regex dispatch, checked in priority order: course-code
//! verification beats arithmetic beats retrieval. One tool per query.

use once_cell::sync::Lazy;
use regex::Regex;

static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2}\d{3}\b").expect("valid course-code regex"));

static ARITHMETIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s*[+\-*/]").expect("valid arithmetic regex"));

/// Which tool the query should be dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Verification,
    Calculator,
    Retrieval,
}

impl Intent {
    /// Tool name the intent dispatches to
    pub fn tool_name(&self) -> &'static str {
        match self {
            Intent::Verification => "verification",
            Intent::Calculator => "calculator",
            Intent::Retrieval => "rag",
        }
    }
}

/// Route a raw user query to one intent.
pub fn route(query: &str) -> Intent {
    let upper = query.to_uppercase();
    if COURSE_CODE_RE.is_match(&upper) || query.to_lowercase().contains("requisito") {
        return Intent::Verification;
    }
    if query.to_lowercase().contains("calcular") || ARITHMETIC_RE.is_match(query) {
        return Intent::Calculator;
    }
    Intent::Retrieval
}

//! Prerequisite verification
//!
//! Checks a course code against an in-memory catalog and the student's
//! approved-course history. The catalog is a stand-in for a registrar
//! system query.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::Result;
use crate::tools::Tool;

static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2}\d{3}\b").expect("valid course-code regex"));

struct CatalogEntry {
    name: &'static str,
    prereqs: &'static [&'static str],
}

pub struct VerificationTool {
    catalog: HashMap<&'static str, CatalogEntry>,
    approved: HashSet<&'static str>,
}

impl VerificationTool {
    pub fn new() -> Self {
        let mut catalog = HashMap::new();
        catalog.insert(
            "CS101",
            CatalogEntry {
                name: "Intro to CS",
                prereqs: &[],
            },
        );
        catalog.insert(
            "CS102",
            CatalogEntry {
                name: "Object Oriented Programming",
                prereqs: &["CS101"],
            },
        );
        catalog.insert(
            "CS202",
            CatalogEntry {
                name: "Algorithms",
                prereqs: &["CS102", "MA101"],
            },
        );
        catalog.insert(
            "MA101",
            CatalogEntry {
                name: "Calculus I",
                prereqs: &[],
            },
        );
        catalog.insert(
            "AI301",
            CatalogEntry {
                name: "Artificial Intelligence",
                prereqs: &["CS202", "MA101"],
            },
        );

        let approved = ["CS101", "MA101"].into_iter().collect();

        Self { catalog, approved }
    }
}

impl Default for VerificationTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for VerificationTool {
    fn name(&self) -> &str {
        "verification"
    }

    async fn run(&self, input: &str) -> Result<String> {
        let upper = input.to_uppercase();
        let Some(code_match) = COURSE_CODE_RE.find(&upper) else {
            return Ok("Error: No course code detected (format example: CS101).".to_string());
        };
        let code = code_match.as_str();

        let Some(entry) = self.catalog.get(code) else {
            return Ok(format!("Error: Course {code} not found in catalog."));
        };

        if self.approved.contains(code) {
            return Ok(format!("Status: You have already passed {code}."));
        }

        let missing: Vec<&str> = entry
            .prereqs
            .iter()
            .filter(|req| !self.approved.contains(*req))
            .copied()
            .collect();

        if missing.is_empty() {
            Ok(format!(
                "APPROVED: You are eligible to enroll in {code} ({}).",
                entry.name
            ))
        } else {
            Ok(format!(
                "REJECTED: You cannot take {code}. Missing prerequisites: {}",
                missing.join(", ")
            ))
        }
    }
}

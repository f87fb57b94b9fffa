//! Institution resolution from source identifiers
//!
//! Each source document belongs to one university catalog. The UNI catalog
//! is the only layout the table state machine understands; every other
//! source takes the generic tagged-line path.

/// Which catalog a source document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Institution {
    /// Universidad Nacional de Ingeniería: tabular plan with cycle headers
    Uni,
    /// Any other catalog, carrying its display tag
    Generic(String),
}

/// Source-identifier substring -> institution tag
const TAG_MAP: &[(&str, &str)] = &[
    ("Plan-estudios", "[UCSP]"),
    ("sanMarcos", "[UNMSM]"),
    ("2018-N6", "[UNI]"),
    ("FDM", "[UPC]"),
];

impl Institution {
    /// Resolve the institution once per source document by substring match
    /// against the identifier. Unmatched sources get the generic tag.
    pub fn resolve(source_id: &str) -> Self {
        for (needle, tag) in TAG_MAP {
            if source_id.contains(needle) {
                return if *tag == "[UNI]" {
                    Institution::Uni
                } else {
                    Institution::Generic((*tag).to_string())
                };
            }
        }
        Institution::Generic("[GENERAL]".to_string())
    }

    /// Display tag injected into every emitted line
    pub fn tag(&self) -> &str {
        match self {
            Institution::Uni => "[UNI]",
            Institution::Generic(tag) => tag,
        }
    }
}

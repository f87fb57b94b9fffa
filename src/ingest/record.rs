//! Structured course records extracted from catalog tables
//!
//! A record exists only during ingestion: it is flattened into a single
//! catalog line before indexing and the typed fields are not retained.

use serde::{Deserialize, Serialize};

/// Curricular category of a course, assigned from the section header that
/// was active when the row was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Part of a numbered cycle ("Tercer ciclo", ...)
    Mandatory,
    /// Specialty elective block
    SpecialtyElective,
    /// Complementary elective block
    ComplementaryElective,
    /// No recognizable section header was in effect
    Unknown,
}

impl Category {
    /// Spanish label used in the flattened line
    pub fn label(&self) -> &'static str {
        match self {
            Category::Mandatory => "Obligatorio",
            Category::SpecialtyElective => "Electivo de Especialidad",
            Category::ComplementaryElective => "Electivo Complementario",
            Category::Unknown => "Desconocido",
        }
    }
}

/// One course row extracted from a catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Bracketed university label, e.g. "[UNI]"
    pub institution_tag: String,
    pub code: String,
    pub name: String,
    /// Cycle or elective-block name shown to the user
    pub location_label: String,
    pub category: Category,
    /// First digit run of the credits cell, or "N/A"
    pub credits: String,
    /// Cleaned prerequisite text, "Ninguno" when absent
    pub prerequisite: String,
}

impl CourseRecord {
    /// Render the record as the flat catalog line that gets indexed.
    pub fn to_line(&self) -> String {
        format!(
            "{} Curso: {} ({}) | Ubicación: {} | Tipo: {} | Créditos: {} | Pre-requisito: {}",
            self.institution_tag,
            self.name,
            self.code,
            self.location_label,
            self.category.label(),
            self.credits,
            self.prerequisite,
        )
    }
}

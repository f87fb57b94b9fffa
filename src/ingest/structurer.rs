//! Table structurer: noisy tabular rows -> flat catalog lines
//!
//! Parsing state (active section header, detected column layout) is an
//! explicit struct threaded through row processing so individual rows can be
//! unit-tested without constructing a whole source document. State is
//! carried across pages and never reset mid-document.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ingest::institution::Institution;
use crate::ingest::record::{Category, CourseRecord};
use crate::ingest::source::{Row, SourceContent, SourceDocument};
use crate::text::normalize;

/// Course-code shape: 2-4 letters then a digit-led run of 2-4 alphanumerics.
/// The digit requirement keeps ordinary words from passing as codes.
static CODE_CELL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,4}[0-9][0-9A-Za-z]{1,3}$").expect("valid code regex")
});

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));

/// Emitted when the corpus would otherwise be empty, so the indices are
/// never built over zero documents.
pub const EMPTY_CORPUS_SENTINEL: &str = "[GENERAL] No hay documentos cargados en el catálogo.";

/// Column layout detected from a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub code: usize,
    pub name: usize,
    pub credits: usize,
    pub prerequisite: Option<usize>,
}

/// Per-source parsing state, mutated row by row and discarded afterwards
#[derive(Debug, Default)]
pub struct ParseState {
    /// Original (non-normalized) text of the last section header seen
    pub current_section: Option<String>,
    pub column_map: Option<ColumnMap>,
}

fn cell_text(row: &Row, idx: usize) -> &str {
    row.get(idx)
        .and_then(|c| c.as_deref())
        .unwrap_or_default()
}

/// Reduce a credits cell to its first digit run, else "N/A".
fn clean_credits(raw: &str) -> String {
    DIGIT_RUN_RE
        .find(raw)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Clean a prerequisite cell: trim, drop a trailing ".pdf", map recognized
/// "none" spellings and blanks to "Ninguno".
fn clean_prerequisite(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".pdf").unwrap_or(trimmed).trim();
    let norm = normalize(trimmed);
    if matches!(norm.as_str(), "" | "ninguno" | "ninguna" | "none" | "no" | "nan") {
        "Ninguno".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Try to interpret a row as a section header; returns true when consumed.
fn detect_section_header(state: &mut ParseState, first_cell: &str) -> bool {
    let norm = normalize(first_cell);
    if norm.contains("ciclo") && !norm.contains("total") {
        state.current_section = Some(first_cell.trim().to_string());
        return true;
    }
    if norm.contains("electivos de especialidad") {
        state.current_section = Some("Electivos de Especialidad".to_string());
        return true;
    }
    if norm.contains("electivos complementarios") {
        state.current_section = Some("Electivos Complementarios".to_string());
        return true;
    }
    false
}

/// Try to interpret a row as a column-header row. Installs a new column map
/// (overwriting any prior one) when at least code, name, and credits are
/// present; returns true when consumed.
fn detect_column_header(state: &mut ParseState, row: &Row) -> bool {
    let mut code = None;
    let mut name = None;
    let mut credits = None;
    let mut prerequisite = None;

    for (idx, cell) in row.iter().enumerate() {
        let norm = normalize(cell.as_deref().unwrap_or_default());
        if norm.is_empty() {
            continue;
        }
        if norm.contains("codigo") {
            code.get_or_insert(idx);
        } else if norm.contains("requisito") {
            prerequisite.get_or_insert(idx);
        } else if norm.contains("credito") || norm == "cred" {
            credits.get_or_insert(idx);
        } else if norm.contains("nombre") || norm.contains("asignatura") || norm.contains("curso") {
            name.get_or_insert(idx);
        }
    }

    match (code, name, credits) {
        (Some(code), Some(name), Some(credits)) => {
            state.column_map = Some(ColumnMap {
                code,
                name,
                credits,
                prerequisite,
            });
            true
        }
        _ => false,
    }
}

/// Extract (code, name, credits, prerequisite) from a data row, using the
/// detected column map or the code-shaped-cell fallback for layouts without
/// headers.
fn extract_fields(state: &ParseState, row: &Row) -> Option<(String, String, String, String)> {
    if let Some(map) = &state.column_map {
        let code = cell_text(row, map.code).trim().to_string();
        let name = cell_text(row, map.name).trim().to_string();
        let credits = clean_credits(cell_text(row, map.credits));
        let prerequisite = map
            .prerequisite
            .map(|idx| clean_prerequisite(cell_text(row, idx)))
            .unwrap_or_else(|| "Ninguno".to_string());
        return Some((code, name, credits, prerequisite));
    }

    // No header row seen: look for a code-shaped cell, take the next cell
    // as the course name.
    for (idx, cell) in row.iter().enumerate() {
        let candidate = cell.as_deref().unwrap_or_default().trim();
        if CODE_CELL_RE.is_match(candidate) {
            let name = cell_text(row, idx + 1).trim().to_string();
            return Some((
                candidate.to_string(),
                name,
                "N/A".to_string(),
                "Ninguno".to_string(),
            ));
        }
    }
    None
}

/// Category and display location from the active section header.
fn classify(state: &ParseState) -> (Category, String) {
    let section = match &state.current_section {
        Some(s) => s,
        None => return (Category::Unknown, "N/A".to_string()),
    };
    let norm = normalize(section);
    if norm.contains("ciclo") {
        (Category::Mandatory, section.clone())
    } else if norm.contains("especialidad") {
        (Category::SpecialtyElective, "Electivos".to_string())
    } else if norm.contains("complementarios") {
        (Category::ComplementaryElective, "Electivos".to_string())
    } else {
        (Category::Unknown, section.clone())
    }
}

/// Process one table row, updating the parse state and emitting a flattened
/// catalog line for data rows. Header rows, totals rows, and noise return
/// `None`; skipping them is not an error.
pub fn process_row(state: &mut ParseState, row: &Row, tag: &str) -> Option<String> {
    if row
        .iter()
        .all(|c| c.as_deref().unwrap_or_default().trim().is_empty())
    {
        return None;
    }

    let first = cell_text(row, 0).trim().to_string();

    // Header checks run first: a row is never both a header and a data row.
    if detect_section_header(state, &first) {
        return None;
    }
    if detect_column_header(state, row) {
        return None;
    }
    if normalize(&first).contains("total") {
        return None;
    }

    let (code, name, credits, prerequisite) = extract_fields(state, row)?;

    // Reject residual header fragments and malformed rows.
    let code_norm = normalize(&code);
    if code.is_empty()
        || code_norm.contains("codigo")
        || code_norm.contains("total")
        || code.chars().count() < 4
        || name.is_empty()
    {
        return None;
    }

    let (category, location_label) = classify(state);
    let record = CourseRecord {
        institution_tag: tag.to_string(),
        code,
        name,
        location_label,
        category,
        credits,
        prerequisite,
    };
    Some(record.to_line())
}

/// Structure one source document into indexable lines.
fn structure_source(doc: &SourceDocument) -> Vec<String> {
    let institution = Institution::resolve(&doc.id);
    let tag = institution.tag().to_string();
    let mut lines = Vec::new();

    match (&institution, &doc.content) {
        (Institution::Uni, SourceContent::Pages(pages)) => {
            // One state for the whole document, carried across pages.
            let mut state = ParseState::default();
            for page in pages {
                for table in page {
                    for row in table {
                        if let Some(line) = process_row(&mut state, row, &tag) {
                            lines.push(line);
                        }
                    }
                }
            }
        }
        (_, SourceContent::Pages(pages)) => {
            // Generic tabular source: rows are kept verbatim, tag-prefixed.
            for page in pages {
                for table in page {
                    for row in table {
                        let cells: Vec<&str> = row
                            .iter()
                            .map(|c| c.as_deref().unwrap_or_default().trim())
                            .collect();
                        if cells.iter().all(|c| c.is_empty()) {
                            continue;
                        }
                        lines.push(format!("{tag} {}", cells.join(" | ")));
                    }
                }
            }
        }
        (_, SourceContent::Lines(raw_lines)) => {
            for line in raw_lines {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    lines.push(format!("{tag} {trimmed}"));
                }
            }
        }
    }

    lines
}

/// Structure every loaded source into the corpus text sequence; an empty
/// result is replaced by a single sentinel record. Unreadable sources are
/// already dropped at load time, before they reach this stage.
pub fn build_corpus_texts(sources: &[SourceDocument]) -> Vec<String> {
    let mut texts = Vec::new();
    for source in sources {
        let lines = structure_source(source);
        debug!(source_id = %source.id, lines = lines.len(), "structured source");
        texts.extend(lines);
    }
    if texts.is_empty() {
        texts.push(EMPTY_CORPUS_SENTINEL.to_string());
    }
    texts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| Some((*c).to_string())).collect()
    }

    #[test]
    fn test_empty_row_skipped() {
        let mut state = ParseState::default();
        assert_eq!(process_row(&mut state, &vec![None, None], "[UNI]"), None);
        assert_eq!(process_row(&mut state, &row(&["", "  "]), "[UNI]"), None);
    }

    #[test]
    fn test_section_header_updates_state() {
        let mut state = ParseState::default();
        assert_eq!(
            process_row(&mut state, &row(&["TERCER CICLO", ""]), "[UNI]"),
            None
        );
        assert_eq!(state.current_section.as_deref(), Some("TERCER CICLO"));
    }

    #[test]
    fn test_total_row_is_not_a_section_header() {
        let mut state = ParseState::default();
        process_row(&mut state, &row(&["TOTAL TERCER CICLO", "22"]), "[UNI]");
        assert!(state.current_section.is_none());
    }

    #[test]
    fn test_elective_headers_map_to_fixed_labels() {
        let mut state = ParseState::default();
        process_row(
            &mut state,
            &row(&["CURSOS ELECTIVOS DE ESPECIALIDAD"]),
            "[UNI]",
        );
        assert_eq!(
            state.current_section.as_deref(),
            Some("Electivos de Especialidad")
        );
        process_row(&mut state, &row(&["Electivos Complementarios 2018"]), "[UNI]");
        assert_eq!(
            state.current_section.as_deref(),
            Some("Electivos Complementarios")
        );
    }

    #[test]
    fn test_column_header_installs_map() {
        let mut state = ParseState::default();
        let consumed = process_row(
            &mut state,
            &row(&["Código", "Nombre del Curso", "Créditos", "Pre-requisito"]),
            "[UNI]",
        );
        assert_eq!(consumed, None);
        let map = state.column_map.as_ref().expect("map installed");
        assert_eq!(map.code, 0);
        assert_eq!(map.name, 1);
        assert_eq!(map.credits, 2);
        assert_eq!(map.prerequisite, Some(3));
    }

    #[test]
    fn test_column_header_overwrites_prior_map() {
        let mut state = ParseState::default();
        process_row(&mut state, &row(&["Código", "Curso", "Créditos"]), "[UNI]");
        process_row(
            &mut state,
            &row(&["", "Código", "Asignatura", "Créd.", "Requisitos"]),
            "[UNI]",
        );
        let map = state.column_map.as_ref().expect("map installed");
        assert_eq!(map.code, 1);
        assert_eq!(map.name, 2);
        assert_eq!(map.prerequisite, Some(4));
    }

    #[test]
    fn test_data_row_with_map() {
        let mut state = ParseState::default();
        process_row(&mut state, &row(&["TERCER CICLO"]), "[UNI]");
        process_row(
            &mut state,
            &row(&["Código", "Curso", "Créditos", "Pre-requisito"]),
            "[UNI]",
        );
        let line = process_row(
            &mut state,
            &row(&["BFI01", "Física I", "5 cr.", "Ninguno.pdf"]),
            "[UNI]",
        )
        .expect("data row emitted");
        assert_eq!(
            line,
            "[UNI] Curso: Física I (BFI01) | Ubicación: TERCER CICLO | \
             Tipo: Obligatorio | Créditos: 5 | Pre-requisito: Ninguno"
        );
    }

    #[test]
    fn test_prerequisite_cleanup() {
        assert_eq!(clean_prerequisite("  BMA01.pdf "), "BMA01");
        assert_eq!(clean_prerequisite("ninguno"), "Ninguno");
        assert_eq!(clean_prerequisite("NONE"), "Ninguno");
        assert_eq!(clean_prerequisite(""), "Ninguno");
        assert_eq!(clean_prerequisite("BMA01 y BFI01"), "BMA01 y BFI01");
    }

    #[test]
    fn test_credits_first_digit_run() {
        assert_eq!(clean_credits("5 (3T 2P)"), "5");
        assert_eq!(clean_credits("sin datos"), "N/A");
    }

    #[test]
    fn test_fallback_code_shaped_cell() {
        let mut state = ParseState::default();
        process_row(&mut state, &row(&["QUINTO CICLO"]), "[UNI]");
        let line = process_row(
            &mut state,
            &row(&["", "BMA15", "Matemática Avanzada"]),
            "[UNI]",
        )
        .expect("fallback row emitted");
        assert!(line.contains("(BMA15)"));
        assert!(line.contains("Créditos: N/A"));
        assert!(line.contains("Pre-requisito: Ninguno"));
    }

    #[test]
    fn test_rejects_short_code_and_missing_name() {
        let mut state = ParseState::default();
        process_row(&mut state, &row(&["Código", "Curso", "Créditos"]), "[UNI]");
        // code too short
        assert_eq!(
            process_row(&mut state, &row(&["AB1", "Curso X", "3"]), "[UNI]"),
            None
        );
        // name empty
        assert_eq!(
            process_row(&mut state, &row(&["BFI01", "", "3"]), "[UNI]"),
            None
        );
        // residual header fragment
        assert_eq!(
            process_row(&mut state, &row(&["Código", "Curso", "3"]), "[UNI]"),
            None
        );
    }

    #[test]
    fn test_elective_rows_force_generic_location() {
        let mut state = ParseState::default();
        process_row(&mut state, &row(&["ELECTIVOS DE ESPECIALIDAD"]), "[UNI]");
        process_row(&mut state, &row(&["Código", "Curso", "Créditos"]), "[UNI]");
        let line = process_row(
            &mut state,
            &row(&["EE501", "Robótica", "4"]),
            "[UNI]",
        )
        .expect("elective row emitted");
        assert!(line.contains("Ubicación: Electivos"));
        assert!(line.contains("Tipo: Electivo de Especialidad"));
    }

    #[test]
    fn test_unknown_category_without_section() {
        let mut state = ParseState::default();
        process_row(&mut state, &row(&["Código", "Curso", "Créditos"]), "[UNI]");
        let line = process_row(&mut state, &row(&["BFI01", "Física I", "5"]), "[UNI]")
            .expect("row emitted");
        assert!(line.contains("Tipo: Desconocido"));
    }

    #[test]
    fn test_build_corpus_sentinel_when_empty() {
        let texts = build_corpus_texts(&[]);
        assert_eq!(texts, vec![EMPTY_CORPUS_SENTINEL.to_string()]);
    }

    #[test]
    fn test_generic_source_lines_are_tagged() {
        let source = SourceDocument {
            id: "malla_sanMarcos.json".to_string(),
            content: SourceContent::Lines(vec![
                "El curso de Algoritmos requiere Matemáticas Básicas.".to_string(),
                "   ".to_string(),
            ]),
        };
        let texts = build_corpus_texts(&[source]);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("[UNMSM] El curso de Algoritmos"));
    }

    #[test]
    fn test_generic_table_rows_joined() {
        let source = SourceDocument {
            id: "FDM-plan.json".to_string(),
            content: SourceContent::Pages(vec![vec![vec![
                vec![Some("Curso".to_string()), None, Some("Créditos".to_string())],
                vec![Some("Diseño".to_string()), Some("4".to_string()), None],
            ]]]),
        };
        let texts = build_corpus_texts(&[source]);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], "[UPC] Curso |  | Créditos");
        assert_eq!(texts[1], "[UPC] Diseño | 4 | ");
    }
}

//! Product-table anchor location.
//!
//! The product table starts right after a header phrase ("DADOS DO
//! PRODUTO/SERVIÇO" and template variations). Lines above it (titles,
//! addresses, totals) must never reach the classifier; without an anchor the
//! document yields no records rather than risking false positives from
//! summary sections.

/// Map accented Portuguese characters to their ASCII base so header matching
/// survives both accented and already-stripped extractions.
pub fn strip_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'A',
            'é' | 'ê' | 'É' | 'Ê' => 'E',
            'í' | 'Í' => 'I',
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'O',
            'ú' | 'ü' | 'Ú' | 'Ü' => 'U',
            'ç' | 'Ç' => 'C',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Locate the product-table header among `lines`.
///
/// Returns the index of the first line AFTER the anchor, or `None` when no
/// anchor exists. Matching runs over an accent-stripped, uppercased copy of
/// each line: either the product and service tokens co-occur, or the fixed
/// header phrase appears.
pub fn find_anchor(lines: &[&str]) -> Option<usize> {
    for (idx, line) in lines.iter().enumerate() {
        let normalized = strip_accents(line);
        let is_anchor = (normalized.contains("PRODUTO") && normalized.contains("SERVICO"))
            || normalized.contains("DADOS DO PRODUTO");
        if is_anchor {
            return Some(idx + 1);
        }
    }
    None
}

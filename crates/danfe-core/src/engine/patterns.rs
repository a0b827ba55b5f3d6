//! Common regex patterns for DANFE text extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Token shapes used by the line classifier

    /// Numeric-shaped token: digits with Brazilian separators, optional sign,
    /// no letters. Matches "1.234,56", "5102", "-0,18".
    pub static ref NUMERIC_SHAPE: Regex = Regex::new(
        r"^-?\d[\d.,]*$"
    ).unwrap();

    /// Product-code shape at line start: at least five consecutive digits.
    pub static ref CODE_PREFIX: Regex = Regex::new(
        r"^\d{5,}"
    ).unwrap();

    /// A token that is nothing but a product code.
    pub static ref CODE_TOKEN: Regex = Regex::new(
        r"^\d{5,}$"
    ).unwrap();

    /// Unit-of-measure shape: short alphabetic token (UN, PC, KG, CX, MT).
    pub static ref UNIT_SHAPE: Regex = Regex::new(
        r"^[A-Za-z]{1,3}$"
    ).unwrap();

    // Document-level metadata labels. Accented characters are matched
    // explicitly so these run against the original (unstripped) text.

    pub static ref EMISSAO_LABEL: Regex = Regex::new(
        r"(?i)DATA\s+(?:D[AE]\s+)?EMISS[ÃA]O|DT\.?\s*EMISS[ÃA]O"
    ).unwrap();

    pub static ref CHAVE_LABEL: Regex = Regex::new(
        r"(?i)CHAVE\s+DE\s+ACESSO"
    ).unwrap();

    pub static ref VALOR_TOTAL_LABEL: Regex = Regex::new(
        r"(?i)VALOR\s+TOTAL\s+DA\s+NOTA"
    ).unwrap();

    pub static ref EMITENTE_LABEL: Regex = Regex::new(
        r"(?i)(?:IDENTIFICA[ÇC][ÃA]O\s+DO\s+)?EMITENTE"
    ).unwrap();

    pub static ref DESTINATARIO_LABEL: Regex = Regex::new(
        r"(?i)DESTINAT[ÁA]RIO(?:\s*/\s*REMETENTE)?"
    ).unwrap();

    /// Brazilian date: dd/mm/yyyy.
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{2})/(\d{2})/(\d{4})\b"
    ).unwrap();

    /// Brazilian amount: 1.234,56 (thousands optional).
    pub static ref AMOUNT: Regex = Regex::new(
        r"\d{1,3}(?:\.\d{3})*,\d{2}|\d+,\d{2}"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_shape_accepts_brazilian_tokens() {
        for token in ["5102", "1.234,56", "-0,18", "000", "10,00"] {
            assert!(NUMERIC_SHAPE.is_match(token), "{token}");
        }
    }

    #[test]
    fn numeric_shape_rejects_text_and_mixed_tokens() {
        for token in ["UN", "M6", "ABC123", "", "-", "R$10"] {
            assert!(!NUMERIC_SHAPE.is_match(token), "{token:?}");
        }
    }

    #[test]
    fn code_prefix_requires_five_digits() {
        assert!(CODE_PREFIX.is_match("123456 PARAFUSO"));
        assert!(!CODE_PREFIX.is_match("1234 PARAFUSO"));
    }

    #[test]
    fn labels_match_accented_and_stripped_variants() {
        assert!(EMISSAO_LABEL.is_match("DATA DE EMISSÃO: 05/03/2024"));
        assert!(EMISSAO_LABEL.is_match("data da emissao 05/03/2024"));
        assert!(DESTINATARIO_LABEL.is_match("DESTINATÁRIO/REMETENTE"));
        assert!(CHAVE_LABEL.is_match("CHAVE DE ACESSO"));
    }
}

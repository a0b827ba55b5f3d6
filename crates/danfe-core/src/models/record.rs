//! Record types produced by the extraction engine.
//!
//! Field names follow the DANFE column labels (NCM, CST, CFOP, ...) so the
//! serialized output matches what operators see on the printed document.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Count of trailing tokens treated as the technical field block.
///
/// Some DANFE templates keep the product code (and one discount/placeholder
/// slot) inside the trailing block; others keep code and description entirely
/// to the left of it. The arity is detected once per document and then used
/// for every line of that document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Thirteen trailing tokens: the tax/value fields only.
    Thirteen,
    /// Fifteen trailing tokens: product code and a placeholder slot are
    /// absorbed into the head of the block.
    Fifteen,
}

impl Arity {
    /// Number of tax/value fields in the technical block, common to both
    /// template variants.
    pub const TECH_FIELDS: usize = 13;

    /// Window width in tokens.
    pub const fn width(self) -> usize {
        match self {
            Arity::Thirteen => 13,
            Arity::Fifteen => 15,
        }
    }
}

/// One reconstructed product line of an invoice.
///
/// Serde field order is the export column order. Code fields stay as raw
/// strings (they are identifiers, not magnitudes); value fields are decimals
/// with zero as the sentinel for anything that failed to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Source document identifier (file name).
    pub arquivo: String,
    /// Issuance date, shared by every record of one document.
    #[serde(with = "br_date")]
    pub data_emissao: Option<NaiveDate>,
    /// Invoice-local product code.
    pub codigo: String,
    /// Product description, possibly merged from multiple source lines.
    pub descricao: String,
    pub ncm: String,
    pub cst: String,
    pub cfop: String,
    pub unid: String,
    pub qtd: Decimal,
    pub vlr_unit: Decimal,
    pub vlr_desc: Decimal,
    pub vlr_total: Decimal,
    pub bc_icms: Decimal,
    pub vlr_icms: Decimal,
    pub vlr_ipi: Decimal,
    pub aliq_icms: Decimal,
    pub aliq_ipi: Decimal,
}

/// Document-level fields pulled from the full text, each independently
/// optional. One value is broadcast into every record of its document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(with = "br_date")]
    pub data_emissao: Option<NaiveDate>,
    /// 44-digit NFe access key, empty when not found.
    pub chave_acesso: String,
    pub valor_total_nota: Decimal,
    pub emissor: String,
    pub destinatario: String,
}

/// Brazilian `dd/mm/yyyy` date representation, empty string when absent.
pub(crate) mod br_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(s, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn date_serializes_in_brazilian_format() {
        let record = ProductRecord {
            arquivo: "nfe.pdf".to_string(),
            data_emissao: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["data_emissao"], "05/03/2024");
    }

    #[test]
    fn missing_date_serializes_as_empty_string() {
        let metadata = DocumentMetadata::default();
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["data_emissao"], "");

        let back: DocumentMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back.data_emissao, None);
    }

    #[test]
    fn arity_width() {
        assert_eq!(Arity::Thirteen.width(), 13);
        assert_eq!(Arity::Fifteen.width(), 15);
    }
}

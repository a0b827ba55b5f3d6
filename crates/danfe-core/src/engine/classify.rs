//! Line classification for the post-anchor region.
//!
//! Product-data lines are recognized by the density of numeric-shaped tokens
//! in the trailing window, not by a fixed column offset: extraction templates
//! insert or omit the product code from the trailing block and descriptions
//! vary in word count.

use tracing::debug;

use super::patterns::{CODE_PREFIX, NUMERIC_SHAPE, UNIT_SHAPE};
use crate::models::record::Arity;

/// Tag attached to one line of the post-anchor region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Carries the fixed-arity trailing field block.
    ProductData,
    /// Likely wrapped description text.
    Continuation,
    /// Blank or too short to carry data.
    Noise,
}

/// Per-document line classifier.
///
/// Detects and locks the technical-window arity (13 vs 15) at the first
/// confidently classified product line, then applies that decision for the
/// rest of the document.
pub struct LineClassifier {
    min_line_chars: usize,
    locked: Option<Arity>,
}

impl LineClassifier {
    pub fn new(min_line_chars: usize, arity_hint: Option<Arity>) -> Self {
        Self {
            min_line_chars,
            locked: arity_hint,
        }
    }

    /// The locked arity, once a product line has been seen (or a hint was
    /// configured).
    pub fn arity(&self) -> Option<Arity> {
        self.locked
    }

    /// Classify one line. First match in the cascade wins.
    pub fn classify(&mut self, line: &str, tokens: &[&str]) -> LineClass {
        let trimmed = line.trim();
        if trimmed.len() < self.min_line_chars {
            return LineClass::Noise;
        }

        // Density check runs against the minimum arity: a line dense enough
        // for the smaller window still reaches the assignor, which then
        // enforces the locked width and reports the mismatch as a skip.
        let numeric_count = tokens.iter().filter(|t| NUMERIC_SHAPE.is_match(t)).count();
        let threshold = self.locked.map(Arity::width).unwrap_or(Arity::TECH_FIELDS);

        let is_product = numeric_count >= Arity::TECH_FIELDS
            // Guard against thousand-separator tokens that fall outside the
            // numeric shape: a long-enough line opening with a product code
            // is still a data line.
            || (tokens.len() >= threshold && CODE_PREFIX.is_match(tokens[0]));

        if !is_product {
            return LineClass::Continuation;
        }

        if self.locked.is_none() {
            let arity = detect_arity(tokens);
            debug!(?arity, "locked technical window arity");
            self.locked = Some(arity);
        }

        LineClass::ProductData
    }
}

/// Decide the window arity from the first confidently classified line.
///
/// A line made entirely of technical tokens (numeric shapes plus one short
/// unit token) with fifteen or more tokens carries its code inside the
/// window; anything with free-text description words keeps code and
/// description to the left of a thirteen-token window.
fn detect_arity(tokens: &[&str]) -> Arity {
    let all_technical = tokens
        .iter()
        .all(|t| NUMERIC_SHAPE.is_match(t) || UNIT_SHAPE.is_match(t));

    if all_technical && tokens.len() >= 15 {
        Arity::Fifteen
    } else {
        Arity::Thirteen
    }
}

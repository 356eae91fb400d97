//! Masked code generator.
//!
//! A mask is expanded character by character:
//! - `@` - random uppercase ASCII letter
//! - `#` - random ASCII digit
//! - anything else is copied as is

use std::{fmt, str::FromStr};

use rand::Rng;

use crate::BatchError;

const LETTER: char = '@';
const DIGIT: char = '#';

/// Mask used to generate SKU codes such as `AB1234CDEF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuMask {
    pattern: String,
}

impl SkuMask {
    /// Parses a mask, rejecting masks that would not generate anything random.
    pub fn parse(pattern: &str) -> Result<Self, BatchError> {
        if pattern.is_empty() {
            return Err(BatchError::Configuration("sku mask is empty".to_string()));
        }
        if !pattern.chars().any(|c| c == LETTER || c == DIGIT) {
            return Err(BatchError::Configuration(format!(
                "sku mask '{pattern}' has no '{LETTER}' or '{DIGIT}' placeholder"
            )));
        }
        Ok(Self {
            pattern: pattern.to_string(),
        })
    }

    pub fn expand<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.pattern
            .chars()
            .map(|c| match c {
                LETTER => char::from(rng.random_range(b'A'..=b'Z')),
                DIGIT => char::from(rng.random_range(b'0'..=b'9')),
                literal => literal,
            })
            .collect()
    }

    /// Returns true when `code` could have been produced by this mask.
    pub fn matches(&self, code: &str) -> bool {
        code.chars().count() == self.pattern.chars().count()
            && self.pattern.chars().zip(code.chars()).all(|(m, c)| match m {
                LETTER => c.is_ascii_uppercase(),
                DIGIT => c.is_ascii_digit(),
                literal => literal == c,
            })
    }
}

impl Default for SkuMask {
    fn default() -> Self {
        Self {
            pattern: "@@####@@@@".to_string(),
        }
    }
}

impl FromStr for SkuMask {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SkuMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

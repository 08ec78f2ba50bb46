use crate::error::{IdentityError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issn {
    pub raw: String,
    /// `NNNN-NNNC`, check character upper-cased.
    pub normalized: String,
}

fn strip_issn(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

fn check_char(digits: &[u32]) -> char {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| (8 - i as u32) * d)
        .sum();
    match (11 - sum % 11) % 11 {
        10 => 'X',
        n => char::from_digit(n, 10).unwrap_or('0'),
    }
}

impl Issn {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let stripped = input
            .strip_prefix("ISSN")
            .or_else(|| input.strip_prefix("issn"))
            .map(strip_issn)
            .unwrap_or_else(|| strip_issn(input));

        if stripped.len() != 8 {
            return Err(IdentityError::InvalidIssn(input.to_string()));
        }

        let digits: Vec<u32> = stripped[..7]
            .chars()
            .map(|c| c.to_digit(10))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| IdentityError::InvalidIssn(input.to_string()))?;

        let check = stripped.chars().last().unwrap_or_default();
        if check != check_char(&digits) {
            return Err(IdentityError::InvalidIssn(input.to_string()));
        }

        Ok(Self {
            raw: input.to_string(),
            normalized: format!("{}-{}", &stripped[..4], &stripped[4..]),
        })
    }
}

impl std::fmt::Display for Issn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.normalized)
    }
}

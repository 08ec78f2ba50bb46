use crate::error::{IdentityError, Result};
use serde::{Deserialize, Serialize};

// Matched against the lower-cased input.
const PREFIXES: [&str; 7] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://www.doi.org/",
    "http://www.doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doi {
    pub raw: String,
    pub normalized: String,
}

impl Doi {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let lowered = input.to_lowercase();

        let stripped = PREFIXES
            .iter()
            .find_map(|prefix| lowered.strip_prefix(prefix))
            .map(str::trim_start)
            .unwrap_or(lowered.as_str());

        // Must start with "10.", contain "/", and have a non-empty suffix
        if !stripped.starts_with("10.") {
            return Err(IdentityError::InvalidDoi(input.to_string()));
        }
        let slash_pos = stripped
            .find('/')
            .ok_or_else(|| IdentityError::InvalidDoi(input.to_string()))?;
        if stripped[slash_pos + 1..].trim().is_empty() {
            return Err(IdentityError::InvalidDoi(input.to_string()));
        }

        Ok(Self {
            raw: input.to_string(),
            normalized: stripped.to_string(),
        })
    }
}

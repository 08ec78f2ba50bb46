use thiserror::Error;

use crate::keys::DisambiguationKeySet;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("not enough attributes to disambiguate ({reason}): {key_set}")]
    InsufficientEvidence {
        reason: EvidenceGap,
        key_set: Box<DisambiguationKeySet>,
    },

    #[error("invalid ISSN: {0}")]
    InvalidIssn(String),

    #[error("invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("record lookup failed: {0}")]
    Lookup(String),

    #[error(transparent)]
    Core(#[from] pidmatch_core::CoreError),
}

/// Which minimum-evidence rule a key set failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceGap {
    MissingJournal,
    MissingYear,
    MissingIdentity,
}

impl std::fmt::Display for EvidenceGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingJournal => "no journal ISSN",
            Self::MissingYear => "no publication year",
            Self::MissingIdentity => "no identifying attribute",
        };
        write!(f, "{s}")
    }
}

impl IdentityError {
    pub fn is_insufficient_evidence(&self) -> bool {
        matches!(self, Self::InsufficientEvidence { .. })
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;

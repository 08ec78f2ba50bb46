//! Minimum-evidence policy applied before a key set reaches the store.
//!
//! A lookup with too little evidence can match an unrelated record, so a key
//! set that fails here is returned as [`IdentityError::InsufficientEvidence`]
//! and the caller should treat the document as new.

use crate::error::{EvidenceGap, IdentityError, Result};
use crate::keys::{DisambiguationKeySet, KeyName};

/// Any of these makes the evidence sufficient on its own.
pub const STRONG_KEYS: [KeyName; 3] = [KeyName::MainDoi, KeyName::Fpage, KeyName::ElocationId];

/// At least one of these is required when no strong key is present.
pub const IDENTITY_KEYS: [KeyName; 4] = [
    KeyName::Surnames,
    KeyName::Collab,
    KeyName::Links,
    KeyName::PkgName,
];

const JOURNAL_KEYS: [KeyName; 2] = [KeyName::JournalIssnPrint, KeyName::JournalIssnElectronic];
const YEAR_KEYS: [KeyName; 2] = [KeyName::ArticlePubYear, KeyName::IssuePubYear];

pub fn validate(key_set: &DisambiguationKeySet) -> Result<()> {
    match evidence_gap(key_set) {
        None => Ok(()),
        Some(reason) => Err(IdentityError::InsufficientEvidence {
            reason,
            key_set: Box::new(key_set.clone()),
        }),
    }
}

/// The first rule `key_set` breaks, if any.
pub fn evidence_gap(key_set: &DisambiguationKeySet) -> Option<EvidenceGap> {
    let any = |keys: &[KeyName]| keys.iter().any(|k| key_set.has_value(*k));

    if !any(&JOURNAL_KEYS) {
        return Some(EvidenceGap::MissingJournal);
    }
    if !any(&YEAR_KEYS) {
        return Some(EvidenceGap::MissingYear);
    }
    if any(&STRONG_KEYS) || any(&IDENTITY_KEYS) {
        return None;
    }
    Some(EvidenceGap::MissingIdentity)
}

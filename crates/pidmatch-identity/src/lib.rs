//! Disambiguation keys and the lookup cascade for scholarly documents that
//! lack a guaranteed unique identifier.

pub mod cascade;
pub mod error;
pub mod evidence;
pub mod identifiers;
pub mod keys;
pub mod normalize;
pub mod pid;

pub use cascade::{Cascade, QueryCascadeGenerator, RecordLookup, ResolvedRecord, cascade};
pub use error::{EvidenceGap, IdentityError, Result};
pub use evidence::validate;
pub use identifiers::{Canonicalize, Doi, Issn};
pub use keys::{
    DisambiguationKeyBuilder, DisambiguationKeySet, FilteringMode, KeyName, KeyValue, PrimaryKey,
};
pub use normalize::NormalizedFields;
pub use pid::v2_prefix;

pub mod doi;
pub mod issn;

pub use doi::Doi;
pub use issn::Issn;

use pidmatch_core::DocumentMetadata;
use tracing::warn;

/// Rewrites identifiers into their normal form so that two submissions of
/// the same document produce the same verbatim keys.
pub trait Canonicalize {
    fn canonicalized(&self) -> Self;
}

impl Canonicalize for DocumentMetadata {
    fn canonicalized(&self) -> Self {
        let mut out = self.clone();
        canonical_issn(&mut out.issns.print);
        canonical_issn(&mut out.issns.electronic);
        if let Some(raw) = out.main_doi.as_mut() {
            match Doi::parse(raw) {
                Ok(doi) => *raw = doi.normalized,
                Err(e) => warn!(error = %e, "keeping main DOI as extracted"),
            }
        }
        out
    }
}

fn canonical_issn(value: &mut Option<String>) {
    let Some(raw) = value.as_mut() else {
        return;
    };
    if raw.trim().is_empty() {
        return;
    }
    match Issn::parse(raw) {
        Ok(issn) => *raw = issn.normalized,
        Err(e) => warn!(error = %e, "keeping ISSN as extracted"),
    }
}

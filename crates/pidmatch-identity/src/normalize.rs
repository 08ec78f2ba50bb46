//! Bounded comparison keys for unbounded free-text fields.
//!
//! Free text is trimmed and upper-cased before hashing, so submissions that
//! differ only in case or surrounding whitespace produce the same key. Absent
//! input never produces a digest: `None` and the hash of `""` must stay
//! distinguishable for records that stored "absent".

use pidmatch_core::MetadataView;
use sha2::{Digest, Sha256};

pub const JOIN_SEPARATOR: &str = "|";

/// Trim and upper-case.
pub fn standardize(text: &str) -> String {
    text.trim().to_uppercase()
}

/// SHA-256 of the raw bytes as 64 lowercase hex characters.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Digest of the standardized text, or `None` when there is no text.
pub fn digest(text: Option<&str>) -> Option<String> {
    let standardized = standardize(text?);
    if standardized.is_empty() {
        return None;
    }
    Some(sha256_hex(standardized.as_bytes()))
}

/// Standardizes every item and digests the `|`-joined list. Blank items
/// keep their position, so `["", "Silva"]` hashes `"|SILVA"`.
pub fn digest_joined<S: AsRef<str>>(items: &[S]) -> Option<String> {
    let joined = items
        .iter()
        .map(|item| standardize(item.as_ref()))
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR);
    digest(Some(&joined))
}

/// Digests the `|`-joined items as given; only the joined text is trimmed.
pub fn digest_raw_joined<S: AsRef<str>>(items: &[S]) -> Option<String> {
    let joined = items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<&str>>()
        .join(JOIN_SEPARATOR);
    digest(Some(&joined))
}

/// Order-insensitive digest with blank items dropped.
///
/// Items are standardized before sorting. Digests therefore differ from
/// stores that sorted the raw texts before upper-casing, so existing
/// `z_article_titles_texts` values from such stores are not comparable.
pub fn digest_sorted<S: AsRef<str>>(items: &[S]) -> Option<String> {
    let mut standardized: Vec<String> = items
        .iter()
        .map(|item| standardize(item.as_ref()))
        .filter(|item| !item.is_empty())
        .collect();
    standardized.sort();
    digest(Some(&standardized.join(JOIN_SEPARATOR)))
}

/// Digests of every free-text field of one view, computed once and shared
/// by all key sets built for that view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub surnames: Option<String>,
    pub collab: Option<String>,
    pub links: Option<String>,
    pub partial_body: Option<String>,
    pub article_titles_texts: Option<String>,
}

impl NormalizedFields {
    pub fn from_view<V: MetadataView + ?Sized>(view: &V) -> Self {
        Self {
            surnames: digest_joined(view.author_surnames()),
            collab: digest(view.collab()),
            links: digest_raw_joined(view.links()),
            partial_body: digest(view.partial_body()),
            article_titles_texts: digest_sorted(view.article_titles_texts()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidmatch_core::DocumentMetadata;

    #[test]
    fn digest_is_64_hex_chars() {
        let d = digest(Some("Nobody inspects the spammish repetition")).unwrap();
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_hashes_standardized_text() {
        assert_eq!(digest(Some("who group")), Some(sha256_hex(b"WHO GROUP")));
    }

    #[test]
    fn digest_ignores_case_and_surrounding_whitespace() {
        let a = digest(Some("  Silva|Souza "));
        let b = digest(Some("SILVA|souza"));
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn absent_text_is_none_not_hash_of_empty() {
        let empty_hash = Some(sha256_hex(b""));
        assert_eq!(digest(None), None);
        assert_eq!(digest(Some("")), None);
        assert_eq!(digest(Some("   ")), None);
        assert_ne!(digest(None), empty_hash);
        assert_eq!(digest_joined::<String>(&[]), None);
        assert_eq!(digest_joined(&[""]), None);
        assert_eq!(digest_raw_joined::<String>(&[]), None);
    }

    #[test]
    fn joined_digest_standardizes_each_item() {
        assert_eq!(
            digest_joined(&[" silva", "Souza "]),
            digest(Some("SILVA|SOUZA"))
        );
    }

    #[test]
    fn joined_digest_keeps_blank_items_in_place() {
        assert_eq!(digest_joined(&["", "Silva"]), Some(sha256_hex(b"|SILVA")));
        assert_eq!(digest_joined(&["Silva", ""]), Some(sha256_hex(b"SILVA|")));
        assert_ne!(digest_joined(&["", "Silva"]), digest_joined(&["Silva"]));
        assert_ne!(digest_joined(&["", "Silva"]), digest_joined(&["Silva", ""]));
        assert_eq!(digest_joined(&["", "  "]), Some(sha256_hex(b"|")));
    }

    #[test]
    fn raw_joined_digest_only_trims_the_ends() {
        assert_eq!(
            digest_raw_joined(&[" http://a ", "http://b "]),
            Some(sha256_hex(b"HTTP://A |HTTP://B"))
        );
    }

    #[test]
    fn links_digest_keeps_inner_whitespace() {
        let meta = DocumentMetadata {
            links: vec!["http://a ".into(), "http://b".into()],
            ..Default::default()
        };
        assert_eq!(
            NormalizedFields::from_view(&meta).links,
            Some(sha256_hex(b"HTTP://A |HTTP://B"))
        );
    }

    #[test]
    fn joined_digest_keeps_order() {
        assert_ne!(
            digest_joined(&["Silva", "Souza"]),
            digest_joined(&["Souza", "Silva"])
        );
    }

    #[test]
    fn sorted_digest_ignores_order_and_case() {
        let a = digest_sorted(&["Título em português", "English title"]);
        let b = digest_sorted(&["english TITLE", "título em português"]);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn fields_from_view_with_differently_cased_surnames_match() {
        let lower = DocumentMetadata {
            surnames: vec!["silva".into(), "souza".into()],
            ..Default::default()
        };
        let upper = DocumentMetadata {
            surnames: vec!["SILVA".into(), "Souza".into()],
            ..Default::default()
        };
        let a = NormalizedFields::from_view(&lower);
        let b = NormalizedFields::from_view(&upper);
        assert!(a.surnames.is_some());
        assert_eq!(a.surnames, b.surnames);
    }

    #[test]
    fn fields_from_empty_view_are_all_none() {
        let fields = NormalizedFields::from_view(&DocumentMetadata::default());
        assert_eq!(fields, NormalizedFields::default());
    }
}

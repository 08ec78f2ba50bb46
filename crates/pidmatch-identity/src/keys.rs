use std::fmt;

use pidmatch_core::{MatchConfig, MetadataView};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use tracing::debug;

use crate::normalize::NormalizedFields;

/// Which issue-related constraints a key set carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilteringMode {
    /// Issue position fields are part of the lookup.
    IssueScoped,
    /// Issue position fields are left out and the record must have no issue.
    AheadOfPrint,
}

impl fmt::Display for FilteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::IssueScoped => "issue_scoped",
            Self::AheadOfPrint => "ahead_of_print",
        };
        write!(f, "{s}")
    }
}

/// Key names shared with the records store. The wire names must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    Surnames,
    Collab,
    MainDoi,
    Links,
    PartialBody,
    PkgName,
    ElocationId,
    IssueIsNull,
    IssuePubYear,
    IssueVolume,
    IssueNumber,
    IssueSuppl,
    Fpage,
    FpageSeq,
    Lpage,
    JournalIssnPrint,
    JournalIssnElectronic,
    ArticlePubYear,
    ArticleTitlesTexts,
}

impl KeyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surnames => "z_surnames",
            Self::Collab => "z_collab",
            Self::MainDoi => "main_doi",
            Self::Links => "z_links",
            Self::PartialBody => "z_partial_body",
            Self::PkgName => "pkg_name",
            Self::ElocationId => "elocation_id",
            Self::IssueIsNull => "issue__isnull",
            Self::IssuePubYear => "issue__pub_year",
            Self::IssueVolume => "issue__volume",
            Self::IssueNumber => "issue__number",
            Self::IssueSuppl => "issue__suppl",
            Self::Fpage => "fpage",
            Self::FpageSeq => "fpage_seq",
            Self::Lpage => "lpage",
            Self::JournalIssnPrint => "journal__issn_print",
            Self::JournalIssnElectronic => "journal__issn_electronic",
            Self::ArticlePubYear => "article_pub_year",
            Self::ArticleTitlesTexts => "z_article_titles_texts",
        }
    }

    /// Issue position keys, only sent with [`FilteringMode::IssueScoped`].
    pub const ISSUE_POSITION: [KeyName; 7] = [
        Self::IssuePubYear,
        Self::IssueVolume,
        Self::IssueNumber,
        Self::IssueSuppl,
        Self::Fpage,
        Self::FpageSeq,
        Self::Lpage,
    ];
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    Null,
    Text(String),
    Flag(bool),
}

impl KeyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<&str>> for KeyValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Null, |v| Self::Text(v.to_string()))
    }
}

impl From<Option<String>> for KeyValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

impl Serialize for KeyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Flag(b) => serializer.serialize_bool(*b),
        }
    }
}

/// The identity candidate that won the priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKey {
    Authors,
    MainDoi,
    Links,
    PartialBody,
    PkgName,
}

/// Named lookup values for one filtering mode. A key missing from the set
/// means "not filtered on"; a key present with [`KeyValue::Null`] means the
/// field was absent from the document and must be absent in the record too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisambiguationKeySet {
    mode: FilteringMode,
    primary: Option<PrimaryKey>,
    entries: Vec<(KeyName, KeyValue)>,
}

impl DisambiguationKeySet {
    fn new(mode: FilteringMode) -> Self {
        Self {
            mode,
            primary: None,
            entries: Vec::with_capacity(16),
        }
    }

    fn insert(&mut self, key: KeyName, value: impl Into<KeyValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn mode(&self) -> FilteringMode {
        self.mode
    }

    pub fn primary(&self) -> Option<PrimaryKey> {
        self.primary
    }

    /// `None` when the key is not part of this set.
    pub fn get(&self, key: KeyName) -> Option<&KeyValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: KeyName) -> bool {
        self.get(key).is_some()
    }

    /// True when the key is in the set with a non-null value.
    pub fn has_value(&self, key: KeyName) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn text(&self, key: KeyName) -> Option<&str> {
        self.get(key).and_then(KeyValue::as_text)
    }

    /// Whether the set asserts that the matching record has no issue.
    pub fn requires_issue_absent(&self) -> bool {
        self.get(KeyName::IssueIsNull) == Some(&KeyValue::Flag(true))
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyName, &KeyValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for DisambiguationKeySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl fmt::Display for DisambiguationKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "<{} key set>", self.mode),
        }
    }
}

/// Derives key sets from a [`MetadataView`].
#[derive(Debug, Clone)]
pub struct DisambiguationKeyBuilder {
    log_key_sets: bool,
}

impl Default for DisambiguationKeyBuilder {
    fn default() -> Self {
        Self { log_key_sets: true }
    }
}

impl DisambiguationKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self {
            log_key_sets: config.logging.log_key_sets,
        }
    }

    pub fn build<V: MetadataView + ?Sized>(
        &self,
        view: &V,
        mode: FilteringMode,
    ) -> DisambiguationKeySet {
        let fields = NormalizedFields::from_view(view);
        self.build_with(view, &fields, mode)
    }

    /// Builds a key set from digests that were already computed for `view`.
    pub fn build_with<V: MetadataView + ?Sized>(
        &self,
        view: &V,
        fields: &NormalizedFields,
        mode: FilteringMode,
    ) -> DisambiguationKeySet {
        let mut keys = DisambiguationKeySet::new(mode);

        keys.insert(KeyName::Surnames, fields.surnames.as_deref());
        keys.insert(KeyName::Collab, fields.collab.as_deref());
        keys.insert(KeyName::MainDoi, view.main_doi());
        keys.insert(KeyName::Links, fields.links.as_deref());
        keys.insert(KeyName::PartialBody, fields.partial_body.as_deref());
        keys.insert(KeyName::PkgName, view.pkg_name());
        keys.primary = primary_key(&keys);

        keys.insert(KeyName::ElocationId, view.elocation_id());

        match mode {
            FilteringMode::AheadOfPrint => {
                keys.insert(KeyName::IssueIsNull, KeyValue::Flag(true));
            }
            FilteringMode::IssueScoped => {
                let issue = view.issue();
                keys.insert(KeyName::IssuePubYear, issue.pub_year());
                keys.insert(KeyName::IssueVolume, issue.volume());
                keys.insert(KeyName::IssueNumber, issue.number());
                keys.insert(KeyName::IssueSuppl, issue.suppl());
                keys.insert(KeyName::Fpage, issue.fpage());
                keys.insert(KeyName::FpageSeq, issue.fpage_seq());
                keys.insert(KeyName::Lpage, issue.lpage());
            }
        }

        keys.insert(KeyName::JournalIssnPrint, view.journal_issn_print());
        keys.insert(KeyName::JournalIssnElectronic, view.journal_issn_electronic());
        keys.insert(KeyName::ArticlePubYear, view.article_pub_year());
        keys.insert(
            KeyName::ArticleTitlesTexts,
            fields.article_titles_texts.as_deref(),
        );

        if self.log_key_sets {
            debug!(mode = %mode, primary = ?keys.primary, key_set = %keys, "built disambiguation key set");
        }
        keys
    }
}

fn primary_key(keys: &DisambiguationKeySet) -> Option<PrimaryKey> {
    if keys.has_value(KeyName::Surnames) || keys.has_value(KeyName::Collab) {
        Some(PrimaryKey::Authors)
    } else if keys.has_value(KeyName::MainDoi) {
        Some(PrimaryKey::MainDoi)
    } else if keys.has_value(KeyName::Links) {
        Some(PrimaryKey::Links)
    } else if keys.has_value(KeyName::PartialBody) {
        Some(PrimaryKey::PartialBody)
    } else if keys.has_value(KeyName::PkgName) {
        Some(PrimaryKey::PkgName)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::digest;
    use pidmatch_core::{DocumentMetadata, IssueDescriptor, JournalIssns};

    fn issue_bound() -> DocumentMetadata {
        DocumentMetadata {
            surnames: vec!["Silva".into(), "Souza".into()],
            main_doi: Some("10.1590/0074-02762021".into()),
            pkg_name: Some("0074-0276-mioc-95-3-300".into()),
            issue: IssueDescriptor {
                pub_year: Some("2000".into()),
                volume: Some("95".into()),
                number: Some("3".into()),
                fpage: Some("300".into()),
                lpage: Some("310".into()),
                ..Default::default()
            },
            article_pub_year: Some("2000".into()),
            article_titles: vec!["Título".into(), "Title".into()],
            issns: JournalIssns {
                print: Some("0074-0276".into()),
                electronic: Some("1678-8060".into()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn issue_scoped_includes_issue_position() {
        let keys = DisambiguationKeyBuilder::new().build(&issue_bound(), FilteringMode::IssueScoped);
        assert_eq!(keys.mode(), FilteringMode::IssueScoped);
        for key in KeyName::ISSUE_POSITION {
            assert!(keys.contains_key(key), "{key}");
        }
        assert_eq!(keys.text(KeyName::IssueVolume), Some("95"));
        assert_eq!(keys.text(KeyName::Fpage), Some("300"));
        assert_eq!(keys.get(KeyName::IssueSuppl), Some(&KeyValue::Null));
        assert!(!keys.contains_key(KeyName::IssueIsNull));
        assert!(!keys.requires_issue_absent());
    }

    #[test]
    fn ahead_of_print_asserts_issue_absent() {
        let keys =
            DisambiguationKeyBuilder::new().build(&issue_bound(), FilteringMode::AheadOfPrint);
        assert_eq!(keys.mode(), FilteringMode::AheadOfPrint);
        assert!(keys.requires_issue_absent());
        for key in KeyName::ISSUE_POSITION {
            assert!(!keys.contains_key(key), "{key}");
        }
    }

    #[test]
    fn journal_and_elocation_keys_always_present() {
        let empty = DocumentMetadata::default();
        for mode in [FilteringMode::IssueScoped, FilteringMode::AheadOfPrint] {
            let keys = DisambiguationKeyBuilder::new().build(&empty, mode);
            assert_eq!(keys.get(KeyName::JournalIssnPrint), Some(&KeyValue::Null));
            assert_eq!(keys.get(KeyName::JournalIssnElectronic), Some(&KeyValue::Null));
            assert_eq!(keys.get(KeyName::ElocationId), Some(&KeyValue::Null));
            assert_eq!(keys.primary(), None);
        }
    }

    #[test]
    fn all_identity_candidates_are_kept() {
        let keys = DisambiguationKeyBuilder::new().build(&issue_bound(), FilteringMode::IssueScoped);
        assert_eq!(keys.primary(), Some(PrimaryKey::Authors));
        assert_eq!(
            keys.text(KeyName::Surnames),
            digest(Some("SILVA|SOUZA")).as_deref()
        );
        assert_eq!(keys.text(KeyName::MainDoi), Some("10.1590/0074-02762021"));
        assert_eq!(keys.text(KeyName::PkgName), Some("0074-0276-mioc-95-3-300"));
        assert_eq!(keys.get(KeyName::Collab), Some(&KeyValue::Null));
        assert_eq!(keys.get(KeyName::Links), Some(&KeyValue::Null));
    }

    #[test]
    fn primary_key_follows_priority() {
        let mut meta = DocumentMetadata {
            pkg_name: Some("pkg".into()),
            partial_body: Some("First paragraph".into()),
            links: vec!["https://example.org/related".into()],
            main_doi: Some("10.1590/x".into()),
            ..Default::default()
        };
        let builder = DisambiguationKeyBuilder::new();
        let mode = FilteringMode::AheadOfPrint;
        assert_eq!(builder.build(&meta, mode).primary(), Some(PrimaryKey::MainDoi));

        meta.main_doi = None;
        assert_eq!(builder.build(&meta, mode).primary(), Some(PrimaryKey::Links));

        meta.links.clear();
        assert_eq!(builder.build(&meta, mode).primary(), Some(PrimaryKey::PartialBody));

        meta.partial_body = None;
        assert_eq!(builder.build(&meta, mode).primary(), Some(PrimaryKey::PkgName));

        meta.collab = Some("WHO Group".into());
        assert_eq!(builder.build(&meta, mode).primary(), Some(PrimaryKey::Authors));
    }

    #[test]
    fn json_uses_wire_names_in_order() {
        let meta = DocumentMetadata {
            collab: Some("WHO Group".into()),
            article_pub_year: Some("2021".into()),
            issns: JournalIssns {
                print: None,
                electronic: Some("1678-8060".into()),
            },
            ..Default::default()
        };
        let keys = DisambiguationKeyBuilder::new().build(&meta, FilteringMode::AheadOfPrint);
        let value: serde_json::Value = serde_json::from_str(&keys.to_json().unwrap()).unwrap();
        assert_eq!(value["issue__isnull"], serde_json::Value::Bool(true));
        assert_eq!(value["journal__issn_print"], serde_json::Value::Null);
        assert_eq!(value["journal__issn_electronic"], "1678-8060");
        assert_eq!(value["article_pub_year"], "2021");
        assert!(value["z_collab"].is_string());

        let names: Vec<&str> = keys.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            [
                "z_surnames",
                "z_collab",
                "main_doi",
                "z_links",
                "z_partial_body",
                "pkg_name",
                "elocation_id",
                "issue__isnull",
                "journal__issn_print",
                "journal__issn_electronic",
                "article_pub_year",
                "z_article_titles_texts",
            ]
        );
    }

    #[test]
    fn build_with_reuses_precomputed_fields() {
        let meta = issue_bound();
        let fields = NormalizedFields::from_view(&meta);
        let builder = DisambiguationKeyBuilder::new();
        assert_eq!(
            builder.build_with(&meta, &fields, FilteringMode::IssueScoped),
            builder.build(&meta, FilteringMode::IssueScoped)
        );
    }
}

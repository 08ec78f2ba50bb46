use serde::{Deserialize, Serialize};

/// Read-only projection of the bibliographic facts extracted from one
/// document. Blank strings are reported as absent.
pub trait MetadataView {
    /// Author surnames in document order. Empty when the document only
    /// declares a collaboration.
    fn author_surnames(&self) -> &[String];
    fn collab(&self) -> Option<&str>;
    fn main_doi(&self) -> Option<&str>;
    /// Hrefs of related-article links.
    fn links(&self) -> &[String];
    /// First non-empty paragraph of the body.
    fn partial_body(&self) -> Option<&str>;
    /// Package name, used as a last-resort label.
    fn pkg_name(&self) -> Option<&str>;
    fn elocation_id(&self) -> Option<&str>;
    fn issue(&self) -> &IssueDescriptor;
    fn article_pub_year(&self) -> Option<&str>;
    /// Non-empty title texts, in any language order.
    fn article_titles_texts(&self) -> &[String];
    fn journal_issn_print(&self) -> Option<&str>;
    fn journal_issn_electronic(&self) -> Option<&str>;

    /// Ahead-of-print documents have no volume, number or supplement.
    fn is_aop(&self) -> bool {
        self.issue().is_aop()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_year: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppl: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpage_seq: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lpage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elocation_id: Option<String>,
}

impl IssueDescriptor {
    pub fn pub_year(&self) -> Option<&str> {
        non_blank(&self.pub_year)
    }

    pub fn volume(&self) -> Option<&str> {
        non_blank(&self.volume)
    }

    pub fn number(&self) -> Option<&str> {
        non_blank(&self.number)
    }

    pub fn suppl(&self) -> Option<&str> {
        non_blank(&self.suppl)
    }

    pub fn fpage(&self) -> Option<&str> {
        non_blank(&self.fpage)
    }

    pub fn fpage_seq(&self) -> Option<&str> {
        non_blank(&self.fpage_seq)
    }

    pub fn lpage(&self) -> Option<&str> {
        non_blank(&self.lpage)
    }

    pub fn elocation_id(&self) -> Option<&str> {
        non_blank(&self.elocation_id)
    }

    pub fn is_aop(&self) -> bool {
        self.volume().is_none() && self.number().is_none() && self.suppl().is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalIssns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electronic: Option<String>,
}

/// Metadata as handed over by the extraction layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub surnames: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collab: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_doi: Option<String>,

    #[serde(default)]
    pub links: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg_name: Option<String>,

    #[serde(default)]
    pub issue: IssueDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_pub_year: Option<String>,

    #[serde(default)]
    pub article_titles: Vec<String>,

    #[serde(default)]
    pub issns: JournalIssns,
}

impl DocumentMetadata {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl MetadataView for DocumentMetadata {
    fn author_surnames(&self) -> &[String] {
        &self.surnames
    }

    fn collab(&self) -> Option<&str> {
        non_blank(&self.collab)
    }

    fn main_doi(&self) -> Option<&str> {
        non_blank(&self.main_doi)
    }

    fn links(&self) -> &[String] {
        &self.links
    }

    fn partial_body(&self) -> Option<&str> {
        non_blank(&self.partial_body)
    }

    fn pkg_name(&self) -> Option<&str> {
        non_blank(&self.pkg_name)
    }

    fn elocation_id(&self) -> Option<&str> {
        self.issue.elocation_id()
    }

    fn issue(&self) -> &IssueDescriptor {
        &self.issue
    }

    fn article_pub_year(&self) -> Option<&str> {
        non_blank(&self.article_pub_year)
    }

    fn article_titles_texts(&self) -> &[String] {
        &self.article_titles
    }

    fn journal_issn_print(&self) -> Option<&str> {
        non_blank(&self.issns.print)
    }

    fn journal_issn_electronic(&self) -> Option<&str> {
        non_blank(&self.issns.electronic)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

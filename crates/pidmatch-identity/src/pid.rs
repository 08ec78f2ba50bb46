use pidmatch_core::MetadataView;

/// Prefix shared by the legacy v2 PIDs of a journal-year:
/// `S{ISSN}{year}`, preferring the electronic ISSN and the issue year.
pub fn v2_prefix<V: MetadataView + ?Sized>(view: &V) -> Option<String> {
    let issn = view
        .journal_issn_electronic()
        .or_else(|| view.journal_issn_print())?;
    let year = view.issue().pub_year()?;
    Some(format!("S{}{}", issn.trim(), year.trim()))
}

use std::collections::VecDeque;
use std::fmt;

use pidmatch_core::{MatchConfig, MetadataView};
use tracing::{debug, info, warn};

use crate::error::{IdentityError, Result};
use crate::evidence;
use crate::keys::{DisambiguationKeyBuilder, DisambiguationKeySet, FilteringMode};
use crate::normalize::NormalizedFields;

/// Plans the ordered lookups for a document.
///
/// Issue-bound documents are probed issue-scoped first and then as
/// ahead-of-print, which catches records registered before the issue was
/// assigned. Ahead-of-print documents get a single ahead-of-print probe.
#[derive(Debug, Clone)]
pub struct QueryCascadeGenerator {
    builder: DisambiguationKeyBuilder,
    aop_fallback: bool,
}

impl Default for QueryCascadeGenerator {
    fn default() -> Self {
        Self {
            builder: DisambiguationKeyBuilder::default(),
            aop_fallback: true,
        }
    }
}

impl QueryCascadeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self {
            builder: DisambiguationKeyBuilder::from_config(config),
            aop_fallback: config.cascade.aop_fallback,
        }
    }

    /// Generator configured from the standard config file.
    pub fn load() -> Result<Self> {
        let config = MatchConfig::load()?;
        Ok(Self::from_config(&config))
    }

    pub fn cascade<'a, V: MetadataView + ?Sized>(&self, view: &'a V) -> Cascade<'a, V> {
        let is_aop = view.is_aop();
        info!(is_aop, "planning disambiguation cascade");

        let mut modes = VecDeque::with_capacity(2);
        if is_aop {
            modes.push_back(FilteringMode::AheadOfPrint);
        } else {
            modes.push_back(FilteringMode::IssueScoped);
            if self.aop_fallback {
                modes.push_back(FilteringMode::AheadOfPrint);
            }
        }

        Cascade {
            view,
            builder: self.builder.clone(),
            fields: None,
            modes,
            rejections: Vec::new(),
        }
    }

    /// Runs the cascade against `lookup` and stops at the first record found.
    ///
    /// Returns the first `InsufficientEvidence` error when no candidate could
    /// be validated, and `Ok(None)` when candidates were tried without a hit.
    pub fn first_match<V, L>(
        &self,
        view: &V,
        lookup: &mut L,
    ) -> Result<Option<ResolvedRecord<L::Record>>>
    where
        V: MetadataView + ?Sized,
        L: RecordLookup,
    {
        let mut cascade = self.cascade(view);
        let mut attempted = 0usize;
        let mut first_rejection = None;

        loop {
            match cascade.try_next() {
                Ok(Some(key_set)) => {
                    attempted += 1;
                    let found = lookup
                        .find(&key_set)
                        .map_err(|e| IdentityError::Lookup(e.to_string()))?;
                    if let Some(record) = found {
                        debug!(mode = %key_set.mode(), "record matched");
                        return Ok(Some(ResolvedRecord { record, key_set }));
                    }
                }
                Ok(None) => break,
                Err(err) if err.is_insufficient_evidence() => {
                    if first_rejection.is_none() {
                        first_rejection = Some(err);
                    }
                }
                Err(err) => return Err(err),
            }
        }

        match first_rejection {
            Some(err) if attempted == 0 => Err(err),
            _ => Ok(None),
        }
    }
}

/// Shorthand for [`QueryCascadeGenerator::cascade`] with default settings.
pub fn cascade<V: MetadataView + ?Sized>(view: &V) -> Cascade<'_, V> {
    QueryCascadeGenerator::default().cascade(view)
}

/// Lazy sequence of validated key sets for one document.
///
/// Each candidate is built and validated only when requested. Iterating
/// skips rejected candidates and keeps their errors in
/// [`Cascade::rejections`]; [`Cascade::try_next`] returns them instead.
pub struct Cascade<'a, V: ?Sized> {
    view: &'a V,
    builder: DisambiguationKeyBuilder,
    fields: Option<NormalizedFields>,
    modes: VecDeque<FilteringMode>,
    rejections: Vec<IdentityError>,
}

impl<V: MetadataView + ?Sized> Cascade<'_, V> {
    /// Next candidate, or the error that rejected it.
    pub fn try_next(&mut self) -> Result<Option<DisambiguationKeySet>> {
        let Some(mode) = self.modes.pop_front() else {
            return Ok(None);
        };
        let view = self.view;
        let fields = self
            .fields
            .get_or_insert_with(|| NormalizedFields::from_view(view));
        let key_set = self.builder.build_with(view, fields, mode);
        evidence::validate(&key_set)?;
        Ok(Some(key_set))
    }

    /// Modes not yet built, in probe order.
    pub fn remaining_modes(&self) -> impl Iterator<Item = FilteringMode> + '_ {
        self.modes.iter().copied()
    }

    /// Errors of the candidates skipped so far.
    pub fn rejections(&self) -> &[IdentityError] {
        &self.rejections
    }
}

impl<V: MetadataView + ?Sized> Iterator for Cascade<'_, V> {
    type Item = DisambiguationKeySet;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.try_next() {
                Ok(next) => return next,
                Err(err) => {
                    warn!(error = %err, "skipping disambiguation candidate");
                    self.rejections.push(err);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.modes.len()))
    }
}

impl<V: ?Sized> fmt::Debug for Cascade<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cascade")
            .field("modes", &self.modes)
            .field("rejections", &self.rejections.len())
            .finish()
    }
}

/// Store access used by [`QueryCascadeGenerator::first_match`].
pub trait RecordLookup {
    type Record;
    type Error: fmt::Display;

    fn find(
        &mut self,
        key_set: &DisambiguationKeySet,
    ) -> std::result::Result<Option<Self::Record>, Self::Error>;
}

#[derive(Debug, Clone)]
pub struct ResolvedRecord<R> {
    pub record: R,
    /// The key set that produced the match.
    pub key_set: DisambiguationKeySet,
}

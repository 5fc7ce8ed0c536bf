//! The head-count table a computation runs on.
//!
//! A [`Case`] records how many individuals of each [`HeirClass`] survive the
//! deceased. It is assembled once by [`CaseBuilder`], merging partial counts
//! over an all-zero default, validated, and read-only afterwards. The derived
//! predicates here are the building blocks of every blocking rule.

use std::collections::BTreeMap;

use tracing::trace;

use crate::doctrine::Doctrine;
use crate::error::{FaraidError, Result};
use crate::hash_utils::Fingerprint;
use crate::heir::HeirClass;

/// Validated, immutable head-counts per heir class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Case {
    counts: [u32; HeirClass::COUNT],
}

/// Collects partial head-counts and validates them into a [`Case`].
///
/// Unspecified classes count zero. Setting the same class twice keeps the
/// later value.
#[derive(Debug, Clone, Default)]
pub struct CaseBuilder {
    counts: [u32; HeirClass::COUNT],
}

impl CaseBuilder {
    /// Start from an all-zero table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the head-count of one class.
    pub fn with(mut self, heir: HeirClass, count: u32) -> Self {
        self.counts[heir.index()] = count;
        self
    }

    /// Validate and freeze the table.
    ///
    /// Fails with [`FaraidError::ConflictingSpouses`] when both a husband and
    /// a wife are present.
    pub fn build(self) -> Result<Case> {
        let husbands = self.counts[HeirClass::Husband.index()];
        let wives = self.counts[HeirClass::Wife.index()];
        if husbands > 0 && wives > 0 {
            return Err(FaraidError::ConflictingSpouses);
        }
        Ok(Case {
            counts: self.counts,
        })
    }
}

impl Case {
    /// An empty [`CaseBuilder`].
    pub fn builder() -> CaseBuilder {
        CaseBuilder::new()
    }

    /// Merge `(class, count)` pairs over the all-zero default and validate.
    pub fn from_counts<I>(partial: I) -> Result<Case>
    where
        I: IntoIterator<Item = (HeirClass, u32)>,
    {
        partial
            .into_iter()
            .fold(CaseBuilder::new(), |b, (heir, count)| b.with(heir, count))
            .build()
    }

    /// Parse a JSON object of snake_case class names to counts, e.g.
    /// `{"wife": 1, "son": 2}`.
    pub fn from_json(json: &str) -> Result<Case> {
        let raw: BTreeMap<String, u32> =
            serde_json::from_str(json).map_err(|e| FaraidError::MalformedCase(e.to_string()))?;
        let mut builder = CaseBuilder::new();
        for (name, count) in raw {
            builder = builder.with(name.parse()?, count);
        }
        builder.build()
    }

    /// Number of individuals of `heir`.
    pub fn count(&self, heir: HeirClass) -> u32 {
        self.counts[heir.index()]
    }

    /// Whether at least one individual of `heir` survives.
    pub fn exists(&self, heir: HeirClass) -> bool {
        self.count(heir) > 0
    }

    /// Present classes with their counts, in declaration order.
    pub fn present(&self) -> impl Iterator<Item = (HeirClass, u32)> + '_ {
        HeirClass::ALL
            .into_iter()
            .map(|h| (h, self.count(h)))
            .filter(|&(_, c)| c > 0)
    }

    /// `true` if no heir of any class is present.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// The surviving spouse class, if any.
    pub fn spouse(&self) -> Option<HeirClass> {
        [HeirClass::Husband, HeirClass::Wife]
            .into_iter()
            .find(|&h| self.exists(h))
    }

    /// A child or son's child exists.
    pub fn has_descendant(&self) -> bool {
        HeirClass::ALL
            .into_iter()
            .any(|h| h.is_descendant() && self.exists(h))
    }

    /// A son or son's son exists.
    pub fn has_male_descendant(&self) -> bool {
        self.exists(HeirClass::Son) || self.exists(HeirClass::PaternalGrandSon)
    }

    /// Individuals across all five sibling classes.
    pub fn sibling_count(&self) -> u64 {
        HeirClass::ALL
            .into_iter()
            .filter(|h| h.is_sibling())
            .map(|h| u64::from(self.count(h)))
            .sum()
    }

    /// Two or more siblings of any kind: enough to reduce the mother.
    pub fn has_sibling_group(&self) -> bool {
        self.sibling_count() >= 2
    }

    /// The father exists, or the paternal grandfather exists and `doctrine`
    /// lets him block siblings in the father's place.
    pub fn has_paternal_male_ascendant(&self, doctrine: Doctrine) -> bool {
        self.exists(HeirClass::Father)
            || (doctrine.profile().grandfather_blocks_siblings
                && self.exists(HeirClass::PaternalGrandFather))
    }

    /// Deterministic FNV-1a digest of the head-counts under `doctrine`.
    pub fn fingerprint(&self, doctrine: Doctrine) -> u64 {
        let digest = self
            .counts
            .iter()
            .fold(Fingerprint::new(), |fp, &count| fp.count(count))
            .byte(doctrine as u8)
            .finish();
        trace!(digest, %doctrine, "case fingerprint");
        digest
    }
}

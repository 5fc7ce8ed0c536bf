//! Entitlement records and the final distribution.
//!
//! Every pipeline stage speaks in [`EntitlementRecord`]s: one class, its
//! head-count, the phase that granted the share, and the share itself. A
//! record's `share` is the aggregate for the whole class; the per-person
//! value is derived through [`EntitlementRecord::per_individual`].
//!
//! [`EstateDistribution`] is the finished product: the surviving records,
//! the doctrine that produced them and the trace of stages that ran.

use std::fmt;

use serde::Serialize;

use crate::adjust::Adjustment;
use crate::doctrine::Doctrine;
use crate::hash_utils::Fingerprint;
use crate::heir::HeirClass;
use crate::quota::{Quota, NOTHING};
use crate::trace::CalculationTrace;

/// The stage that granted a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// A predetermined fraction (fard).
    Fixed,
    /// A part of the remainder (tasib).
    Residuary,
    /// Set by a special-case override rather than the generic rules.
    Exception,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Fixed => "fixed",
            Phase::Residuary => "residuary",
            Phase::Exception => "exception",
        })
    }
}

/// One class's entitlement from one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntitlementRecord {
    pub heir: HeirClass,
    /// Individuals of `heir` sharing this record.
    pub count: u32,
    pub phase: Phase,
    /// Aggregate share of the whole class.
    pub share: Quota,
}

impl EntitlementRecord {
    /// A record granting `share` to all `count` heads of `heir`.
    pub fn new(heir: HeirClass, count: u32, phase: Phase, share: Quota) -> Self {
        Self {
            heir,
            count,
            phase,
            share,
        }
    }

    /// Copy of the record with a different share.
    pub fn with_share(self, share: Quota) -> Self {
        Self { share, ..self }
    }

    /// Copy of the record moved to another phase.
    pub fn with_phase(self, phase: Phase) -> Self {
        Self { phase, ..self }
    }

    /// Share of a single individual of the class.
    pub fn per_individual(&self) -> Quota {
        self.share.divide_among(self.count)
    }
}

impl fmt::Display for EntitlementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} ({}): {}",
            self.heir, self.count, self.phase, self.share
        )
    }
}

/// Sum of the shares in `records`.
pub fn total_share(records: &[EntitlementRecord]) -> Quota {
    records.iter().map(|r| r.share).sum()
}

/// First record for `heir`, in any phase.
pub fn find_record(records: &[EntitlementRecord], heir: HeirClass) -> Option<&EntitlementRecord> {
    records.iter().find(|r| r.heir == heir)
}

/// The final division of the estate.
#[derive(Debug, Clone, Serialize)]
pub struct EstateDistribution {
    doctrine: Doctrine,
    records: Vec<EntitlementRecord>,
    trace: CalculationTrace,
}

impl EstateDistribution {
    pub(crate) fn new(
        doctrine: Doctrine,
        records: Vec<EntitlementRecord>,
        trace: CalculationTrace,
    ) -> Self {
        Self {
            doctrine,
            records,
            trace,
        }
    }

    /// The doctrine the distribution was computed under.
    pub fn doctrine(&self) -> Doctrine {
        self.doctrine
    }

    /// Final records. Zero shares have already been dropped.
    pub fn records(&self) -> &[EntitlementRecord] {
        &self.records
    }

    /// Iterate over the final records.
    pub fn iter(&self) -> std::slice::Iter<'_, EntitlementRecord> {
        self.records.iter()
    }

    /// Number of records. The father may account for two.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` only when the case had no recognised heirs.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all shares: exactly one, or zero for an empty distribution.
    pub fn total(&self) -> Quota {
        total_share(&self.records)
    }

    /// First record for `heir`, regardless of phase.
    pub fn find(&self, heir: HeirClass) -> Option<&EntitlementRecord> {
        find_record(&self.records, heir)
    }

    /// The record for `heir` granted in `phase`.
    pub fn find_in_phase(&self, heir: HeirClass, phase: Phase) -> Option<&EntitlementRecord> {
        self.records
            .iter()
            .find(|r| r.heir == heir && r.phase == phase)
    }

    /// Aggregate share of `heir` across every phase; [`NOTHING`] if absent.
    ///
    /// Only the father can hold more than one record (a fixed sixth plus
    /// residue), so for every other class this equals `find(heir).share`.
    pub fn share_of(&self, heir: HeirClass) -> Quota {
        self.records
            .iter()
            .filter(|r| r.heir == heir)
            .map(|r| r.share)
            .sum()
    }

    /// Share of one individual of `heir` across every phase.
    pub fn per_individual_share(&self, heir: HeirClass) -> Option<Quota> {
        let count = self.find(heir)?.count;
        Some(self.share_of(heir).divide_among(count))
    }

    /// Special-case rules that fired, in chain order.
    pub fn adjustments(&self) -> Vec<Adjustment> {
        self.trace.adjustments()
    }

    /// The stage-by-stage log of the computation.
    pub fn trace(&self) -> &CalculationTrace {
        &self.trace
    }

    /// FNV-1a digest over doctrine, classes, counts, phases and shares.
    pub fn fingerprint(&self) -> u64 {
        self.records
            .iter()
            .fold(Fingerprint::new().byte(self.doctrine as u8), |fp, r| {
                fp.byte(r.heir as u8)
                    .byte(r.phase as u8)
                    .count(r.count)
                    .quota(r.share)
            })
            .finish()
    }
}

impl<'a> IntoIterator for &'a EstateDistribution {
    type Item = &'a EntitlementRecord;
    type IntoIter = std::slice::Iter<'a, EntitlementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Aligned table, one line per record, with a closing total.
impl fmt::Display for EstateDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "doctrine: {}", self.doctrine)?;
        if self.records.is_empty() {
            return writeln!(f, "(no heirs)");
        }
        writeln!(
            f,
            "{:<24} {:>5} {:<10} {:>8} {:>12}",
            "heir", "count", "phase", "share", "each"
        )?;
        for r in &self.records {
            writeln!(
                f,
                "{:<24} {:>5} {:<10} {:>8} {:>12}",
                r.heir,
                r.count,
                r.phase,
                r.share.to_string(),
                r.per_individual().to_string()
            )?;
        }
        let adjustments = self.adjustments();
        if !adjustments.is_empty() {
            let names: Vec<String> = adjustments.iter().map(|a| a.to_string()).collect();
            writeln!(f, "adjustments: {}", names.join(", "))?;
        }
        write!(f, "total: {}", self.total())
    }
}

impl Default for EstateDistribution {
    fn default() -> Self {
        Self::new(Doctrine::default(), Vec::new(), CalculationTrace::new(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::{EIGHTH, HALF, SIXTH, THIRD};
    use crate::trace::Stage;

    fn sample() -> EstateDistribution {
        let records = vec![
            EntitlementRecord::new(HeirClass::Wife, 2, Phase::Fixed, EIGHTH),
            EntitlementRecord::new(HeirClass::Father, 1, Phase::Fixed, SIXTH),
            EntitlementRecord::new(HeirClass::Daughter, 1, Phase::Fixed, HALF),
            EntitlementRecord::new(HeirClass::Father, 1, Phase::Residuary, Quota::new(5, 24)),
        ];
        let mut trace = CalculationTrace::new(7);
        trace.record(Stage::Finalised, &records);
        EstateDistribution::new(Doctrine::Hanafi, records, trace)
    }

    #[test]
    fn test_per_individual_divides_by_count() {
        let r = EntitlementRecord::new(HeirClass::Wife, 2, Phase::Fixed, EIGHTH);
        assert_eq!(r.per_individual(), Quota::new(1, 16));
        let none = EntitlementRecord::new(HeirClass::Son, 0, Phase::Residuary, HALF);
        assert_eq!(none.per_individual(), NOTHING);
    }

    #[test]
    fn test_copy_with_override() {
        let r = EntitlementRecord::new(HeirClass::Mother, 1, Phase::Fixed, THIRD);
        let moved = r.with_phase(Phase::Exception).with_share(SIXTH);
        assert_eq!(moved.heir, HeirClass::Mother);
        assert_eq!(moved.phase, Phase::Exception);
        assert_eq!(moved.share, SIXTH);
        assert_eq!(r.share, THIRD);
    }

    #[test]
    fn test_lookup_by_class_and_phase() {
        let d = sample();
        assert_eq!(d.find(HeirClass::Father).unwrap().phase, Phase::Fixed);
        assert_eq!(
            d.find_in_phase(HeirClass::Father, Phase::Residuary).unwrap().share,
            Quota::new(5, 24)
        );
        assert!(d.find_in_phase(HeirClass::Wife, Phase::Residuary).is_none());
        assert!(d.find(HeirClass::Son).is_none());
    }

    #[test]
    fn test_share_of_aggregates_phases() {
        let d = sample();
        assert_eq!(d.share_of(HeirClass::Father), Quota::new(3, 8));
        assert_eq!(d.share_of(HeirClass::Son), NOTHING);
        assert_eq!(d.per_individual_share(HeirClass::Wife), Some(Quota::new(1, 16)));
        assert_eq!(d.per_individual_share(HeirClass::Son), None);
        assert_eq!(d.total(), Quota::new(1, 1));
    }

    #[test]
    fn test_display_table() {
        let text = sample().to_string();
        assert!(text.starts_with("doctrine: hanafi"));
        assert!(text.contains("wife"));
        assert!(text.contains("1/16"));
        assert!(text.ends_with("total: 1"));
    }

    #[test]
    fn test_empty_distribution_display() {
        let d = EstateDistribution::default();
        assert!(d.is_empty());
        assert_eq!(d.total(), NOTHING);
        assert!(d.to_string().contains("(no heirs)"));
    }

    #[test]
    fn test_serializes_shares_as_fractions() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["doctrine"], "hanafi");
        assert_eq!(json["records"][0]["heir"], "wife");
        assert_eq!(json["records"][0]["share"], "1/8");
        assert_eq!(json["records"][3]["phase"], "residuary");
    }

    #[test]
    fn test_fingerprint_tracks_shares() {
        let a = sample();
        let mut records = a.records().to_vec();
        records[2] = records[2].with_share(THIRD);
        let b = EstateDistribution::new(a.doctrine(), records, a.trace().clone());
        assert_eq!(a.fingerprint(), sample().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}

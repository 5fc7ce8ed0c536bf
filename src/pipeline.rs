//! Pipeline orchestration.
//!
//! `partial counts → Case → fixed → residuary → adjustment chain → final`.
//! Each stage consumes the previous stage's records and produces a new list;
//! the trace records a snapshot after every stage. Finalisation drops
//! zero-share records and verifies that the shares sum to exactly one.

use tracing::{debug, warn};

use crate::adjust::apply_chain_with;
use crate::case::Case;
use crate::config::CalculatorConfig;
use crate::doctrine::Doctrine;
use crate::error::{FaraidError, Result};
use crate::fixed::resolve_fixed;
use crate::heir::HeirClass;
use crate::record::{total_share, EntitlementRecord, EstateDistribution};
use crate::residuary::resolve_residuary;
use crate::trace::{CalculationTrace, Stage};

/// Merge `partial` over all-zero defaults, validate, and distribute the
/// estate under `doctrine`.
///
/// # Errors
///
/// [`FaraidError::ConflictingSpouses`] before anything is computed if both
/// husband and wife are present. Invariant violations surface as
/// [`FaraidError::ResiduaryTierOverflow`] or
/// [`FaraidError::ConservationViolated`].
pub fn compute<I>(partial: I, doctrine: Doctrine) -> Result<EstateDistribution>
where
    I: IntoIterator<Item = (HeirClass, u32)>,
{
    let case = Case::from_counts(partial)?;
    compute_case(&case, doctrine)
}

/// Distribute the estate for an already validated case.
pub fn compute_case(case: &Case, doctrine: Doctrine) -> Result<EstateDistribution> {
    let mut trace = CalculationTrace::new(case.fingerprint(doctrine));
    trace.record(Stage::CaseValidated, &[]);

    let fixed = resolve_fixed(case, doctrine);
    trace.record(Stage::FixedResolved, &fixed);

    let residuary = resolve_residuary(case, doctrine, &fixed)?;
    let combined: Vec<EntitlementRecord> = fixed.iter().chain(&residuary).copied().collect();
    trace.record(Stage::ResiduaryResolved, &combined);

    let adjusted = apply_chain_with(combined, |adjustment, records| {
        debug!(%adjustment, "special case applied");
        trace.record(Stage::Adjusted(adjustment), records);
    });

    let records = finalise(adjusted)?;
    trace.record(Stage::Finalised, &records);
    debug!(%doctrine, heirs = records.len(), "estate distributed");
    Ok(EstateDistribution::new(doctrine, records, trace))
}

/// Drop zero shares and check conservation.
fn finalise(records: Vec<EntitlementRecord>) -> Result<Vec<EntitlementRecord>> {
    let records: Vec<EntitlementRecord> = records
        .into_iter()
        .filter(|r| !r.share.is_zero())
        .collect();
    let total = total_share(&records);
    if !records.is_empty() && !total.is_whole() {
        warn!(%total, "distribution does not sum to one");
        return Err(FaraidError::ConservationViolated { total });
    }
    Ok(records)
}

/// Front door bundling a [`CalculatorConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator {
    config: CalculatorConfig,
}

impl Calculator {
    /// A calculator driven by an explicit configuration.
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// A calculator using `doctrine` by default.
    pub fn with_doctrine(doctrine: Doctrine) -> Self {
        Self::new(CalculatorConfig::new(doctrine))
    }

    /// A calculator configured from the environment.
    pub fn from_env() -> Result<Self> {
        CalculatorConfig::from_env().map(Self::new)
    }

    /// The doctrine used when the caller does not pass one.
    pub fn doctrine(&self) -> Doctrine {
        self.config.doctrine
    }

    /// [`compute`] under the configured doctrine.
    pub fn compute<I>(&self, partial: I) -> Result<EstateDistribution>
    where
        I: IntoIterator<Item = (HeirClass, u32)>,
    {
        compute(partial, self.config.doctrine)
    }

    /// [`compute_case`] under the configured doctrine.
    pub fn compute_case(&self, case: &Case) -> Result<EstateDistribution> {
        compute_case(case, self.config.doctrine)
    }

    /// Parse a JSON head-count object and compute under the configured
    /// doctrine.
    pub fn compute_json(&self, json: &str) -> Result<EstateDistribution> {
        compute_case(&Case::from_json(json)?, self.config.doctrine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjust::Adjustment;
    use crate::quota::{Quota, EIGHTH, HALF, THIRD, TWO_THIRDS, WHOLE};
    use crate::record::Phase;

    #[test]
    fn test_wife_and_son() {
        for d in Doctrine::ALL {
            let dist = compute([(HeirClass::Wife, 1), (HeirClass::Son, 1)], d).unwrap();
            assert_eq!(dist.share_of(HeirClass::Wife), EIGHTH);
            assert_eq!(dist.share_of(HeirClass::Son), Quota::new(7, 8));
            assert_eq!(dist.total(), WHOLE);
            assert!(dist.adjustments().is_empty());
        }
    }

    #[test]
    fn test_spouse_conflict_fails_before_resolving() {
        let err = compute([(HeirClass::Husband, 1), (HeirClass::Wife, 1)], Doctrine::Shafii)
            .unwrap_err();
        assert_eq!(err, FaraidError::ConflictingSpouses);
    }

    #[test]
    fn test_empty_case_yields_empty_distribution() {
        let dist = compute(std::iter::empty(), Doctrine::Hanafi).unwrap();
        assert!(dist.is_empty());
        assert_eq!(dist.doctrine(), Doctrine::Hanafi);
    }

    #[test]
    fn test_zero_shares_are_dropped() {
        let dist = compute(
            [
                (HeirClass::Husband, 1),
                (HeirClass::FullSister, 2),
                (HeirClass::PaternalBrother, 1),
            ],
            Doctrine::Shafii,
        )
        .unwrap();
        assert!(dist.find(HeirClass::PaternalBrother).is_none());
        assert_eq!(dist.share_of(HeirClass::Husband), Quota::new(3, 7));
        assert_eq!(dist.adjustments(), vec![Adjustment::Excess]);
    }

    #[test]
    fn test_father_holds_fixed_and_residuary_records() {
        let dist =
            compute([(HeirClass::Father, 1), (HeirClass::Daughter, 1)], Doctrine::Shafii).unwrap();
        assert_eq!(dist.len(), 3);
        assert_eq!(
            dist.find_in_phase(HeirClass::Father, Phase::Residuary).unwrap().share,
            THIRD
        );
        assert_eq!(dist.share_of(HeirClass::Father), HALF);
    }

    #[test]
    fn test_trace_follows_stages() {
        let entries = [(HeirClass::Husband, 1), (HeirClass::FullSister, 2)];
        let dist = compute(entries, Doctrine::Shafii).unwrap();
        let trace = dist.trace();
        assert!(trace.verify_sequence());
        let stages: Vec<Stage> = trace.entries.iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::CaseValidated,
                Stage::FixedResolved,
                Stage::ResiduaryResolved,
                Stage::Adjusted(Adjustment::Excess),
                Stage::Finalised,
            ]
        );
        assert_eq!(trace.entries[2].total, HALF + TWO_THIRDS);
        assert_eq!(trace.entries[4].total, WHOLE);
        let case = Case::from_counts(entries).unwrap();
        assert_eq!(trace.case_fingerprint, case.fingerprint(Doctrine::Shafii));
    }

    #[test]
    fn test_finalise_rejects_broken_total() {
        let records = vec![EntitlementRecord::new(HeirClass::Son, 1, Phase::Residuary, HALF)];
        let err = finalise(records).unwrap_err();
        assert_eq!(err, FaraidError::ConservationViolated { total: HALF });
    }

    #[test]
    fn test_calculator_uses_configured_doctrine() {
        let hanafi = Calculator::with_doctrine(Doctrine::Hanafi);
        let dist = hanafi
            .compute([(HeirClass::MaternalSibling, 1), (HeirClass::FullBrother, 1)])
            .unwrap();
        assert_eq!(dist.doctrine(), Doctrine::Hanafi);
        assert_eq!(dist.share_of(HeirClass::MaternalSibling), Quota::new(1, 6));

        let default = Calculator::default();
        assert_eq!(default.doctrine(), Doctrine::Shafii);
        let dist = default
            .compute_json(r#"{"maternal_sibling": 1, "full_brother": 1}"#)
            .unwrap();
        assert!(dist.find(HeirClass::MaternalSibling).is_none());
        assert_eq!(dist.share_of(HeirClass::FullBrother), WHOLE);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let case = Case::from_counts([
            (HeirClass::Wife, 2),
            (HeirClass::Mother, 1),
            (HeirClass::Daughter, 2),
            (HeirClass::FullBrother, 1),
        ])
        .unwrap();
        let a = compute_case(&case, Doctrine::Maliki).unwrap();
        let b = Calculator::with_doctrine(Doctrine::Maliki).compute_case(&case).unwrap();
        assert_eq!(a.records(), b.records());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}

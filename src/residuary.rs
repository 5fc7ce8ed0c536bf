//! Residuary resolver (tasib).
//!
//! Whatever the fixed entitlements leave over goes to the residuary classes,
//! strictly by rank: only the highest-priority rank present takes anything.
//! Within a rank a male class and its female counterpart split 2:1 per head.
//!
//! A class that already holds a fixed share drops out of the residue, except
//! the father, who takes his sixth first and then competes for the rest.
//! A female class only takes residue through a companion: her brother, or
//! for sisters a female descendant. Otherwise a fixed-phase block is final.

use tracing::{debug, trace, warn};

use crate::case::Case;
use crate::doctrine::{Doctrine, GrandfatherShare};
use crate::error::{FaraidError, Result};
use crate::heir::HeirClass;
use crate::quota::{apportion, Quota, WHOLE};
use crate::record::{find_record, total_share, EntitlementRecord, Phase};

/// A residuary class and its priority. Lower ranks win.
#[derive(Debug, Clone, Copy)]
struct ResiduaryClass {
    heir: HeirClass,
    rank: u8,
}

const fn rc(heir: HeirClass, rank: u8) -> ResiduaryClass {
    ResiduaryClass { heir, rank }
}

/// Sorted by rank; within a rank the male class comes first.
const RESIDUARY_CATALOG: [ResiduaryClass; 16] = [
    rc(HeirClass::Son, 1),
    rc(HeirClass::Daughter, 1),
    rc(HeirClass::PaternalGrandSon, 2),
    rc(HeirClass::PaternalGrandDaughter, 2),
    rc(HeirClass::Father, 3),
    rc(HeirClass::PaternalGrandFather, 4),
    rc(HeirClass::FullBrother, 5),
    rc(HeirClass::FullSister, 5),
    rc(HeirClass::PaternalBrother, 6),
    rc(HeirClass::PaternalSister, 6),
    rc(HeirClass::FullNephew, 7),
    rc(HeirClass::PaternalNephew, 8),
    rc(HeirClass::FullPaternalUncle, 9),
    rc(HeirClass::PaternalPaternalUncle, 10),
    rc(HeirClass::FullCousin, 11),
    rc(HeirClass::PaternalCousin, 12),
];


/// Distribute the remainder left by `fixed` among the winning residuary tier.
///
/// # Arguments
///
/// * `case` — The validated head-counts.
/// * `doctrine` — Selects the grandfather/brother variant.
/// * `fixed` — Output of [`crate::fixed::resolve_fixed`] for the same case.
///
/// # Errors
///
/// [`FaraidError::ResiduaryTierOverflow`] if the winning rank holds more than
/// a male/female pair. That indicates a catalog defect, not bad input.
pub fn resolve_residuary(
    case: &Case,
    doctrine: Doctrine,
    fixed: &[EntitlementRecord],
) -> Result<Vec<EntitlementRecord>> {
    let eligible: Vec<ResiduaryClass> = RESIDUARY_CATALOG
        .iter()
        .copied()
        .filter(|c| case.exists(c.heir))
        .filter(|c| c.heir == HeirClass::Father || find_record(fixed, c.heir).is_none())
        .filter(|c| has_residuary_companion(case, c.heir))
        .collect();
    let remaining = WHOLE.saturating_sub(total_share(fixed));

    let Some(top) = eligible.first().copied() else {
        debug!(%remaining, "no residuary heir");
        return Ok(Vec::new());
    };

    if let Some(records) = grandfather_with_brothers(case, doctrine, &eligible, remaining) {
        debug!(%doctrine, %remaining, "grandfather shares residue with full brothers");
        return Ok(records);
    }

    let tier: Vec<HeirClass> = eligible
        .iter()
        .take_while(|c| c.rank == top.rank)
        .map(|c| c.heir)
        .collect();
    trace!(rank = top.rank, ?tier, "residuary tier selected");
    let records = distribute_tier(case, top.rank, &tier, remaining)?;
    debug!(%remaining, records = records.len(), "residue distributed");
    Ok(records)
}

/// Whether a female class has someone to take residue through. Male classes
/// always qualify.
fn has_residuary_companion(case: &Case, heir: HeirClass) -> bool {
    let female_descendant =
        || case.exists(HeirClass::Daughter) || case.exists(HeirClass::PaternalGrandDaughter);
    match heir {
        HeirClass::Daughter => case.exists(HeirClass::Son),
        HeirClass::PaternalGrandDaughter => case.exists(HeirClass::PaternalGrandSon),
        HeirClass::FullSister => case.exists(HeirClass::FullBrother) || female_descendant(),
        HeirClass::PaternalSister => {
            case.exists(HeirClass::PaternalBrother) || female_descendant()
        }
        _ => true,
    }
}

/// Split `remaining` across a single tier.
fn distribute_tier(
    case: &Case,
    rank: u8,
    tier: &[HeirClass],
    remaining: Quota,
) -> Result<Vec<EntitlementRecord>> {
    match *tier {
        [] => Ok(Vec::new()),
        [only] => Ok(vec![residuary(case, only, remaining)]),
        [male, female] => {
            let parts = apportion(
                remaining,
                &[2 * u64::from(case.count(male)), u64::from(case.count(female))],
            );
            Ok(vec![
                residuary(case, male, parts[0]),
                residuary(case, female, parts[1]),
            ])
        }
        _ => {
            warn!(rank, ?tier, "residuary tier holds more than a male/female pair");
            Err(FaraidError::ResiduaryTierOverflow {
                rank,
                classes: tier.to_vec(),
            })
        }
    }
}

/// The doctrine-specific pairing of the paternal grandfather with full
/// brothers. `None` when it does not apply and plain rank order decides.
fn grandfather_with_brothers(
    case: &Case,
    doctrine: Doctrine,
    eligible: &[ResiduaryClass],
    remaining: Quota,
) -> Option<Vec<EntitlementRecord>> {
    let rule = doctrine.profile().grandfather_share;
    if rule == GrandfatherShare::Excludes {
        return None;
    }
    if eligible.first()?.heir != HeirClass::PaternalGrandFather {
        return None;
    }
    let is_eligible = |heir: HeirClass| eligible.iter().any(|c| c.heir == heir);
    if !is_eligible(HeirClass::FullBrother) {
        return None;
    }

    let grandfathers = case.count(HeirClass::PaternalGrandFather);
    let brothers = case.count(HeirClass::FullBrother);
    let sisters = if is_eligible(HeirClass::FullSister) {
        case.count(HeirClass::FullSister)
    } else {
        0
    };

    if rule == GrandfatherShare::TwoThirdsAgainstOne && brothers == 1 && sisters == 0 {
        let parts = apportion(remaining, &[2, 1]);
        return Some(vec![
            residuary(case, HeirClass::PaternalGrandFather, parts[0]),
            residuary(case, HeirClass::FullBrother, parts[1]),
        ]);
    }

    // The grandfather counts as one more brother in the pool.
    let mut pool = vec![
        (HeirClass::PaternalGrandFather, 2 * u64::from(grandfathers)),
        (HeirClass::FullBrother, 2 * u64::from(brothers)),
    ];
    if sisters > 0 {
        pool.push((HeirClass::FullSister, u64::from(sisters)));
    }
    let weights: Vec<u64> = pool.iter().map(|&(_, w)| w).collect();
    let parts = apportion(remaining, &weights);
    Some(
        pool.iter()
            .zip(parts)
            .map(|(&(heir, _), share)| residuary(case, heir, share))
            .collect(),
    )
}

fn residuary(case: &Case, heir: HeirClass, share: Quota) -> EntitlementRecord {
    EntitlementRecord::new(heir, case.count(heir), Phase::Residuary, share)
}

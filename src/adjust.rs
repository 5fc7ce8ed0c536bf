//! Special-case adjustment chain.
//!
//! Four rewrite rules run over the concatenated fixed and residuary records,
//! always in the order of [`Adjustment::CHAIN`]:
//!
//! 1. [`Adjustment::Triad`] (umariyyah): father, mother and one spouse only.
//! 2. [`Adjustment::JointSibling`] (mushtaraka): an out-competed full brother
//!    joins the maternal siblings.
//! 3. [`Adjustment::Excess`] (awl): shares over one are scaled down pro rata.
//! 4. [`Adjustment::Shortfall`] (radd): an unclaimed remainder flows back to
//!    the fixed-share holders, spouses last.
//!
//! Each rule either declines (`None`) or returns a fresh record list; input
//! slices are never modified.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::heir::HeirClass;
use crate::quota::{
    apportion, integer_weights, Quota, HALF, NOTHING, QUARTER, SIXTH, WHOLE,
};
use crate::record::{find_record, total_share, EntitlementRecord, Phase};

/// A special-case rule of the adjustment chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Umariyyah.
    Triad,
    /// Mushtaraka.
    JointSibling,
    /// Awl.
    Excess,
    /// Radd.
    Shortfall,
}

type Rewrite = fn(&[EntitlementRecord]) -> Option<Vec<EntitlementRecord>>;

impl Adjustment {
    /// The chain, in the only valid order.
    pub const CHAIN: [Adjustment; 4] = [
        Adjustment::Triad,
        Adjustment::JointSibling,
        Adjustment::Excess,
        Adjustment::Shortfall,
    ];

    /// Apply this rule alone. `None` means it does not apply.
    pub fn apply(self, records: &[EntitlementRecord]) -> Option<Vec<EntitlementRecord>> {
        let rewrite: Rewrite = match self {
            Adjustment::Triad => triad,
            Adjustment::JointSibling => joint_sibling,
            Adjustment::Excess => excess,
            Adjustment::Shortfall => shortfall,
        };
        rewrite(records)
    }

    /// Traditional name of the rule.
    pub fn term(self) -> &'static str {
        match self {
            Adjustment::Triad => "umariyyah",
            Adjustment::JointSibling => "mushtaraka",
            Adjustment::Excess => "awl",
            Adjustment::Shortfall => "radd",
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.term())
    }
}

/// Run the whole chain, calling `on_applied` with each rule that fired and
/// the records it produced.
pub fn apply_chain_with<F>(
    records: Vec<EntitlementRecord>,
    mut on_applied: F,
) -> Vec<EntitlementRecord>
where
    F: FnMut(Adjustment, &[EntitlementRecord]),
{
    Adjustment::CHAIN
        .into_iter()
        .fold(records, |records, adjustment| match adjustment.apply(&records) {
            Some(rewritten) => {
                on_applied(adjustment, &rewritten);
                rewritten
            }
            None => records,
        })
}

/// Run the whole chain and report which rules fired.
pub fn apply_chain(records: Vec<EntitlementRecord>) -> (Vec<EntitlementRecord>, Vec<Adjustment>) {
    let mut applied = Vec::new();
    let records = apply_chain_with(records, |adjustment, _| applied.push(adjustment));
    (records, applied)
}

fn triad(records: &[EntitlementRecord]) -> Option<Vec<EntitlementRecord>> {
    let classes: BTreeSet<HeirClass> = records.iter().map(|r| r.heir).collect();
    let spouse = classes.iter().copied().find(|h| h.is_spouse())?;
    if classes.len() != 3
        || !classes.contains(&HeirClass::Father)
        || !classes.contains(&HeirClass::Mother)
    {
        return None;
    }

    // The mother's third is a third of what the spouse leaves.
    let (spouse_share, mother_share) = match spouse {
        HeirClass::Husband => (HALF, SIXTH),
        _ => (QUARTER, QUARTER),
    };
    let father_share = WHOLE.saturating_sub(spouse_share + mother_share);
    let count_of = |heir| find_record(records, heir).map_or(1, |r| r.count);
    trace!(%spouse, "triad override");

    Some(vec![
        EntitlementRecord::new(spouse, count_of(spouse), Phase::Fixed, spouse_share),
        EntitlementRecord::new(
            HeirClass::Father,
            count_of(HeirClass::Father),
            Phase::Exception,
            father_share,
        ),
        EntitlementRecord::new(
            HeirClass::Mother,
            count_of(HeirClass::Mother),
            Phase::Exception,
            mother_share,
        ),
    ])
}

fn joint_sibling(records: &[EntitlementRecord]) -> Option<Vec<EntitlementRecord>> {
    let brother = records
        .iter()
        .find(|r| r.heir == HeirClass::FullBrother && r.share.is_zero())?;
    let maternal = find_record(records, HeirClass::MaternalSibling)?;

    // Per head across both classes.
    let parts = apportion(
        maternal.share,
        &[u64::from(brother.count), u64::from(maternal.count)],
    );
    trace!(brother = %parts[0], maternal = %parts[1], "full brothers join maternal siblings");
    Some(
        records
            .iter()
            .map(|r| match r.heir {
                HeirClass::FullBrother => r.with_share(parts[0]).with_phase(Phase::Exception),
                HeirClass::MaternalSibling => r.with_share(parts[1]),
                _ => *r,
            })
            .collect(),
    )
}

fn excess(records: &[EntitlementRecord]) -> Option<Vec<EntitlementRecord>> {
    let total = total_share(records);
    if total <= WHOLE {
        return None;
    }
    trace!(%total, "scaling down oversubscribed shares");
    Some(records.iter().map(|r| r.with_share(r.share / total)).collect())
}

fn shortfall(records: &[EntitlementRecord]) -> Option<Vec<EntitlementRecord>> {
    let total = total_share(records);
    if total.is_zero() || total >= WHOLE {
        return None;
    }

    // Spouses get nothing back unless nobody else holds a share.
    let others_hold_shares = records
        .iter()
        .any(|r| !r.heir.is_spouse() && !r.share.is_zero());
    let eligible: Vec<Quota> = records
        .iter()
        .map(|r| {
            if r.heir.is_spouse() && others_hold_shares {
                NOTHING
            } else {
                r.share
            }
        })
        .collect();
    let weights = integer_weights(&eligible);
    if weights.iter().all(|&w| w == 0) {
        return None;
    }

    let remainder = WHOLE.saturating_sub(total);
    trace!(%remainder, ?weights, "returning shortfall to fixed-share holders");
    let extra = apportion(remainder, &weights);
    Some(
        records
            .iter()
            .zip(extra)
            .map(|(r, e)| r.with_share(r.share + e))
            .collect(),
    )
}

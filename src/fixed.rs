//! Fixed-entitlement resolver (fard).
//!
//! The catalog maps each heir class that can hold a predetermined fraction to
//! a pure rule `fn(&Case, Doctrine) -> Quota`. A rule returning [`NOTHING`]
//! means the class is blocked from a fixed share; it is dropped here and may
//! still seek residue in [`crate::residuary`].
//!
//! The full brother has no entry: he never takes a fixed share under any
//! doctrine.

use tracing::{debug, trace};

use crate::case::Case;
use crate::doctrine::{Doctrine, GranddaughterCompletion};
use crate::heir::HeirClass;
use crate::quota::{apportion, Quota, EIGHTH, HALF, NOTHING, QUARTER, SIXTH, THIRD, TWO_THIRDS};
use crate::record::{find_record, EntitlementRecord, Phase};

/// A catalog entry: the class and the rule computing its fixed share.
struct FixedRule {
    heir: HeirClass,
    share: fn(&Case, Doctrine) -> Quota,
}

/// Evaluation order is output order.
const FIXED_RULES: [FixedRule; 12] = [
    FixedRule { heir: HeirClass::Husband, share: husband },
    FixedRule { heir: HeirClass::Wife, share: wife },
    FixedRule { heir: HeirClass::Daughter, share: daughter },
    FixedRule { heir: HeirClass::PaternalGrandDaughter, share: paternal_grand_daughter },
    FixedRule { heir: HeirClass::Father, share: father },
    FixedRule { heir: HeirClass::Mother, share: mother },
    FixedRule { heir: HeirClass::PaternalGrandFather, share: paternal_grand_father },
    FixedRule { heir: HeirClass::PaternalGrandMother, share: paternal_grand_mother },
    FixedRule { heir: HeirClass::MaternalGrandMother, share: maternal_grand_mother },
    FixedRule { heir: HeirClass::FullSister, share: full_sister },
    FixedRule { heir: HeirClass::PaternalSister, share: paternal_sister },
    FixedRule { heir: HeirClass::MaternalSibling, share: maternal_sibling },
];

/// Resolve every fixed entitlement in `case` under `doctrine`.
///
/// Classes that are absent, have no rule, or whose rule yields zero do not
/// appear. When both grandmothers qualify they split a single sixth.
pub fn resolve_fixed(case: &Case, doctrine: Doctrine) -> Vec<EntitlementRecord> {
    let records: Vec<EntitlementRecord> = FIXED_RULES
        .iter()
        .filter(|rule| case.exists(rule.heir))
        .filter_map(|rule| {
            let share = (rule.share)(case, doctrine);
            if share.is_zero() {
                trace!(heir = %rule.heir, %doctrine, "fixed share blocked");
                return None;
            }
            Some(EntitlementRecord::new(
                rule.heir,
                case.count(rule.heir),
                Phase::Fixed,
                share,
            ))
        })
        .collect();

    let records = share_sixth_between_grandmothers(records);
    debug!(%doctrine, records = records.len(), "fixed entitlements resolved");
    records
}

/// The fixed share the catalog assigns `heir`, before zero-filtering and the
/// grandmother merge. `None` if the class has no fixed-share rule.
pub fn fixed_share(heir: HeirClass, case: &Case, doctrine: Doctrine) -> Option<Quota> {
    FIXED_RULES
        .iter()
        .find(|rule| rule.heir == heir)
        .map(|rule| (rule.share)(case, doctrine))
}

fn share_sixth_between_grandmothers(records: Vec<EntitlementRecord>) -> Vec<EntitlementRecord> {
    let (Some(maternal), Some(paternal)) = (
        find_record(&records, HeirClass::MaternalGrandMother),
        find_record(&records, HeirClass::PaternalGrandMother),
    ) else {
        return records;
    };
    let parts = apportion(SIXTH, &[u64::from(maternal.count), u64::from(paternal.count)]);
    trace!(maternal = %parts[0], paternal = %parts[1], "grandmothers share one sixth");
    records
        .iter()
        .map(|r| match r.heir {
            HeirClass::MaternalGrandMother => r.with_share(parts[0]),
            HeirClass::PaternalGrandMother => r.with_share(parts[1]),
            _ => *r,
        })
        .collect()
}

/// One half alone, two thirds for two or more.
fn half_or_two_thirds(count: u32) -> Quota {
    if count == 1 {
        HALF
    } else {
        TWO_THIRDS
    }
}

fn husband(case: &Case, _doctrine: Doctrine) -> Quota {
    if case.has_descendant() {
        QUARTER
    } else {
        HALF
    }
}

fn wife(case: &Case, _doctrine: Doctrine) -> Quota {
    if case.has_descendant() {
        EIGHTH
    } else {
        QUARTER
    }
}

fn daughter(case: &Case, _doctrine: Doctrine) -> Quota {
    if case.exists(HeirClass::Son) {
        return NOTHING;
    }
    half_or_two_thirds(case.count(HeirClass::Daughter))
}

fn paternal_grand_daughter(case: &Case, doctrine: Doctrine) -> Quota {
    if case.has_male_descendant() {
        return NOTHING;
    }
    match case.count(HeirClass::Daughter) {
        0 => half_or_two_thirds(case.count(HeirClass::PaternalGrandDaughter)),
        // A single daughter leaves a sixth to complete two thirds.
        1 => match doctrine.profile().granddaughter_completion {
            GranddaughterCompletion::Unconditional => SIXTH,
            GranddaughterCompletion::RequiresSisterSupport => {
                if case.exists(HeirClass::FullSister) || case.exists(HeirClass::PaternalSister) {
                    SIXTH
                } else {
                    NOTHING
                }
            }
        },
        _ => NOTHING,
    }
}

fn father(case: &Case, _doctrine: Doctrine) -> Quota {
    if case.has_descendant() {
        SIXTH
    } else {
        NOTHING
    }
}

fn mother(case: &Case, _doctrine: Doctrine) -> Quota {
    if case.has_descendant() || case.has_sibling_group() {
        SIXTH
    } else {
        THIRD
    }
}

fn paternal_grand_father(case: &Case, _doctrine: Doctrine) -> Quota {
    if case.exists(HeirClass::Father) || !case.has_descendant() {
        return NOTHING;
    }
    SIXTH
}

fn paternal_grand_mother(case: &Case, doctrine: Doctrine) -> Quota {
    if case.exists(HeirClass::Mother) {
        return NOTHING;
    }
    if doctrine.profile().father_blocks_paternal_grandmother && case.exists(HeirClass::Father) {
        return NOTHING;
    }
    SIXTH
}

fn maternal_grand_mother(case: &Case, _doctrine: Doctrine) -> Quota {
    if case.exists(HeirClass::Mother) {
        NOTHING
    } else {
        SIXTH
    }
}

fn full_sister(case: &Case, doctrine: Doctrine) -> Quota {
    if case.has_descendant()
        || case.has_paternal_male_ascendant(doctrine)
        || case.exists(HeirClass::FullBrother)
    {
        return NOTHING;
    }
    half_or_two_thirds(case.count(HeirClass::FullSister))
}

fn paternal_sister(case: &Case, doctrine: Doctrine) -> Quota {
    if case.has_descendant()
        || case.has_paternal_male_ascendant(doctrine)
        || case.exists(HeirClass::FullBrother)
        || case.exists(HeirClass::PaternalBrother)
    {
        return NOTHING;
    }
    match case.count(HeirClass::FullSister) {
        0 => half_or_two_thirds(case.count(HeirClass::PaternalSister)),
        // Completion of the full sister's half to two thirds.
        1 => SIXTH,
        _ => NOTHING,
    }
}

fn maternal_sibling(case: &Case, doctrine: Doctrine) -> Quota {
    if case.has_descendant() {
        return NOTHING;
    }
    if doctrine
        .profile()
        .maternal_siblings_blocked_by_father_or_full_siblings
        && (case.exists(HeirClass::Father)
            || case.exists(HeirClass::FullBrother)
            || case.exists(HeirClass::FullSister))
    {
        return NOTHING;
    }
    if case.count(HeirClass::MaternalSibling) == 1 {
        SIXTH
    } else {
        THIRD
    }
}

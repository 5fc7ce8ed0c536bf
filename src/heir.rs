//! The closed set of heir classes.
//!
//! A [`HeirClass`] is a kinship category relative to the deceased. The set is
//! fixed; rule catalogs are keyed on it and every class has a stable
//! snake_case name used for parsing, display and serde.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FaraidError;

/// A kinship category relative to the deceased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeirClass {
    Husband,
    Wife,
    Son,
    Daughter,
    /// Son's son (any depth through males).
    PaternalGrandSon,
    /// Son's daughter.
    PaternalGrandDaughter,
    Father,
    Mother,
    /// Father's father.
    PaternalGrandFather,
    /// Father's mother.
    PaternalGrandMother,
    /// Mother's mother.
    MaternalGrandMother,
    /// Brother sharing both parents.
    FullBrother,
    /// Sister sharing both parents.
    FullSister,
    /// Brother sharing the father only.
    PaternalBrother,
    /// Sister sharing the father only.
    PaternalSister,
    /// Sibling of either sex sharing the mother only.
    MaternalSibling,
    /// Full brother's son.
    FullNephew,
    /// Paternal brother's son.
    PaternalNephew,
    /// Father's full brother.
    FullPaternalUncle,
    /// Father's paternal half-brother.
    PaternalPaternalUncle,
    /// Full paternal uncle's son.
    FullCousin,
    /// Paternal paternal uncle's son.
    PaternalCousin,
}

impl HeirClass {
    /// Number of heir classes.
    pub const COUNT: usize = 22;

    /// Every class in declaration order.
    pub const ALL: [HeirClass; HeirClass::COUNT] = [
        HeirClass::Husband,
        HeirClass::Wife,
        HeirClass::Son,
        HeirClass::Daughter,
        HeirClass::PaternalGrandSon,
        HeirClass::PaternalGrandDaughter,
        HeirClass::Father,
        HeirClass::Mother,
        HeirClass::PaternalGrandFather,
        HeirClass::PaternalGrandMother,
        HeirClass::MaternalGrandMother,
        HeirClass::FullBrother,
        HeirClass::FullSister,
        HeirClass::PaternalBrother,
        HeirClass::PaternalSister,
        HeirClass::MaternalSibling,
        HeirClass::FullNephew,
        HeirClass::PaternalNephew,
        HeirClass::FullPaternalUncle,
        HeirClass::PaternalPaternalUncle,
        HeirClass::FullCousin,
        HeirClass::PaternalCousin,
    ];

    /// Position of the class in [`HeirClass::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            HeirClass::Husband => "husband",
            HeirClass::Wife => "wife",
            HeirClass::Son => "son",
            HeirClass::Daughter => "daughter",
            HeirClass::PaternalGrandSon => "paternal_grand_son",
            HeirClass::PaternalGrandDaughter => "paternal_grand_daughter",
            HeirClass::Father => "father",
            HeirClass::Mother => "mother",
            HeirClass::PaternalGrandFather => "paternal_grand_father",
            HeirClass::PaternalGrandMother => "paternal_grand_mother",
            HeirClass::MaternalGrandMother => "maternal_grand_mother",
            HeirClass::FullBrother => "full_brother",
            HeirClass::FullSister => "full_sister",
            HeirClass::PaternalBrother => "paternal_brother",
            HeirClass::PaternalSister => "paternal_sister",
            HeirClass::MaternalSibling => "maternal_sibling",
            HeirClass::FullNephew => "full_nephew",
            HeirClass::PaternalNephew => "paternal_nephew",
            HeirClass::FullPaternalUncle => "full_paternal_uncle",
            HeirClass::PaternalPaternalUncle => "paternal_paternal_uncle",
            HeirClass::FullCousin => "full_cousin",
            HeirClass::PaternalCousin => "paternal_cousin",
        }
    }

    /// Husband or wife.
    pub fn is_spouse(self) -> bool {
        matches!(self, HeirClass::Husband | HeirClass::Wife)
    }

    /// Children and son's children.
    pub fn is_descendant(self) -> bool {
        matches!(
            self,
            HeirClass::Son
                | HeirClass::Daughter
                | HeirClass::PaternalGrandSon
                | HeirClass::PaternalGrandDaughter
        )
    }

    /// Full, paternal and maternal siblings.
    pub fn is_sibling(self) -> bool {
        matches!(
            self,
            HeirClass::FullBrother
                | HeirClass::FullSister
                | HeirClass::PaternalBrother
                | HeirClass::PaternalSister
                | HeirClass::MaternalSibling
        )
    }
}

impl fmt::Display for HeirClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for HeirClass {
    type Err = FaraidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        HeirClass::ALL
            .into_iter()
            .find(|h| h.name() == wanted)
            .ok_or_else(|| FaraidError::UnknownHeir(s.to_string()))
    }
}

//! Legal-school profiles.
//!
//! A [`Doctrine`] is a plain selector. It carries no behaviour of its own;
//! the resolvers look up its [`DoctrineProfile`] row and branch on the
//! profile fields. Adding a variant rule means adding a column to
//! [`PROFILES`], not a new type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FaraidError;

/// One of the four supported schools of law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Doctrine {
    Hanafi,
    Maliki,
    #[default]
    Shafii,
    Hanbali,
}

/// How a son's daughter fares next to a single daughter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GranddaughterCompletion {
    /// She always completes the daughters' two-thirds with a sixth.
    Unconditional,
    /// She takes the completing sixth only when full or paternal sisters are
    /// present; otherwise the daughter excludes her.
    RequiresSisterSupport,
}

/// How the paternal grandfather stands against full brothers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrandfatherShare {
    /// He outranks them and takes the residue alone.
    Excludes,
    /// He joins their pool as one more male unit.
    SharesAsBrother,
    /// Two thirds against a single full brother, otherwise one more male unit.
    TwoThirdsAgainstOne,
}

/// The variant rules selected by a [`Doctrine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoctrineProfile {
    /// The paternal grandfather blocks full and paternal sisters the way the
    /// father does.
    pub grandfather_blocks_siblings: bool,
    pub granddaughter_completion: GranddaughterCompletion,
    /// Maternal siblings are excluded by the father, a full brother or a full
    /// sister, and not only by descendants.
    pub maternal_siblings_blocked_by_father_or_full_siblings: bool,
    /// The father excludes his own mother.
    pub father_blocks_paternal_grandmother: bool,
    pub grandfather_share: GrandfatherShare,
}

/// One row per doctrine, indexed by `Doctrine as usize`.
pub const PROFILES: [DoctrineProfile; 4] = [
    // Hanafi
    DoctrineProfile {
        grandfather_blocks_siblings: true,
        granddaughter_completion: GranddaughterCompletion::RequiresSisterSupport,
        maternal_siblings_blocked_by_father_or_full_siblings: false,
        father_blocks_paternal_grandmother: true,
        grandfather_share: GrandfatherShare::Excludes,
    },
    // Maliki
    DoctrineProfile {
        grandfather_blocks_siblings: false,
        granddaughter_completion: GranddaughterCompletion::Unconditional,
        maternal_siblings_blocked_by_father_or_full_siblings: true,
        father_blocks_paternal_grandmother: true,
        grandfather_share: GrandfatherShare::SharesAsBrother,
    },
    // Shafii
    DoctrineProfile {
        grandfather_blocks_siblings: false,
        granddaughter_completion: GranddaughterCompletion::Unconditional,
        maternal_siblings_blocked_by_father_or_full_siblings: true,
        father_blocks_paternal_grandmother: true,
        grandfather_share: GrandfatherShare::SharesAsBrother,
    },
    // Hanbali
    DoctrineProfile {
        grandfather_blocks_siblings: false,
        granddaughter_completion: GranddaughterCompletion::Unconditional,
        maternal_siblings_blocked_by_father_or_full_siblings: true,
        father_blocks_paternal_grandmother: false,
        grandfather_share: GrandfatherShare::TwoThirdsAgainstOne,
    },
];

impl Doctrine {
    /// Every doctrine in table order.
    pub const ALL: [Doctrine; 4] = [
        Doctrine::Hanafi,
        Doctrine::Maliki,
        Doctrine::Shafii,
        Doctrine::Hanbali,
    ];

    /// The rule variants this doctrine selects.
    pub fn profile(self) -> &'static DoctrineProfile {
        &PROFILES[self as usize]
    }

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Doctrine::Hanafi => "hanafi",
            Doctrine::Maliki => "maliki",
            Doctrine::Shafii => "shafii",
            Doctrine::Hanbali => "hanbali",
        }
    }
}

impl fmt::Display for Doctrine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Doctrine {
    type Err = FaraidError;

    /// Case-insensitive; apostrophes and diacritic-free spellings are accepted
    /// (`"Shafi'i"`, `"hanbalī"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '\'' | '’' | '-'))
            .map(|c| match c {
                'ī' => 'i',
                'ā' => 'a',
                c => c,
            })
            .collect();
        match folded.as_str() {
            "hanafi" => Ok(Doctrine::Hanafi),
            "maliki" => Ok(Doctrine::Maliki),
            "shafii" | "shafi" => Ok(Doctrine::Shafii),
            "hanbali" => Ok(Doctrine::Hanbali),
            _ => Err(FaraidError::UnknownDoctrine(s.to_string())),
        }
    }
}

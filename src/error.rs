//! Error taxonomy for estate computation.
//!
//! Two kinds of failure exist. Input errors are caller-visible and fixed by
//! correcting the case. Invariant violations mean the rule catalog itself is
//! defective; they are not meant to be caught and retried. A class that is
//! blocked or computes to a zero share is not an error at all.

use thiserror::Error;

use crate::heir::HeirClass;
use crate::quota::Quota;

/// Coarse classification of a [`FaraidError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied an invalid case or selector.
    Input,
    /// The rule catalog produced an impossible state.
    Invariant,
}

/// Every failure the crate can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaraidError {
    #[error("case cannot contain both husband and wife")]
    ConflictingSpouses,

    #[error("unknown heir class `{0}`")]
    UnknownHeir(String),

    #[error("unknown doctrine `{0}` (expected hanafi, maliki, shafii or hanbali)")]
    UnknownDoctrine(String),

    #[error("malformed case: {0}")]
    MalformedCase(String),

    #[error("invalid quota `{0}`")]
    InvalidQuota(String),

    #[error("residuary tier at rank {rank} resolved to {} classes: {classes:?}", .classes.len())]
    ResiduaryTierOverflow { rank: u8, classes: Vec<HeirClass> },

    #[error("distribution sums to {total}, expected exactly 1")]
    ConservationViolated { total: Quota },
}

impl FaraidError {
    /// Whether the error is the caller's to fix or a catalog defect.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FaraidError::ConflictingSpouses
            | FaraidError::UnknownHeir(_)
            | FaraidError::UnknownDoctrine(_)
            | FaraidError::MalformedCase(_)
            | FaraidError::InvalidQuota(_) => ErrorKind::Input,
            FaraidError::ResiduaryTierOverflow { .. }
            | FaraidError::ConservationViolated { .. } => ErrorKind::Invariant,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FaraidError>;

//! # ALICE-Faraid
//!
//! Deterministic Islamic inheritance (farāʾiḍ) distribution with exact
//! rational arithmetic. Given head-counts of surviving heirs and a school of
//! jurisprudence, computes each heir class's share of the estate.
//!
//! ## Modules
//!
//! - [`quota`]: exact non-negative fractions and apportionment helpers
//! - [`heir`]: the 22 recognised heir classes
//! - [`case`]: validated head-count tables and the predicates rules read
//! - [`doctrine`]: the four schools and the rule variations they switch
//! - [`record`]: entitlement records and the final distribution
//! - [`fixed`]: Qur'anic fixed shares (furūḍ)
//! - [`residuary`]: residue distribution to agnatic heirs (ʿaṣaba)
//! - [`adjust`]: special-case adjustments (ʿumariyyah, mushtaraka, ʿawl, radd)
//! - [`pipeline`]: the end-to-end computation
//! - [`trace`]: sequenced log of the stages a computation passed through
//! - [`config`]: calculator settings
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```rust
//! use alice_faraid::{compute, Doctrine, HeirClass, Quota};
//!
//! let dist = compute(
//!     [(HeirClass::Wife, 1), (HeirClass::Son, 1)],
//!     Doctrine::Shafii,
//! )
//! .unwrap();
//! assert_eq!(dist.share_of(HeirClass::Wife), Quota::new(1, 8));
//! assert_eq!(dist.share_of(HeirClass::Son), Quota::new(7, 8));
//! assert!(dist.total().is_whole());
//!
//! // Over-subscribed estate: shares are scaled down proportionally.
//! let dist = compute(
//!     [(HeirClass::Husband, 1), (HeirClass::FullSister, 2)],
//!     Doctrine::Shafii,
//! )
//! .unwrap();
//! assert_eq!(dist.share_of(HeirClass::Husband), Quota::new(3, 7));
//! assert_eq!(dist.share_of(HeirClass::FullSister), Quota::new(4, 7));
//! ```

pub mod adjust;
pub mod case;
pub mod config;
pub mod doctrine;
pub mod error;
pub mod fixed;
pub mod hash_utils;
pub mod heir;
pub mod pipeline;
pub mod quota;
pub mod record;
pub mod residuary;
pub mod trace;

pub use adjust::{apply_chain, Adjustment};
pub use case::{Case, CaseBuilder};
pub use config::CalculatorConfig;
pub use doctrine::{Doctrine, DoctrineProfile, GrandfatherShare, GranddaughterCompletion};
pub use error::{ErrorKind, FaraidError, Result};
pub use heir::HeirClass;
pub use pipeline::{compute, compute_case, Calculator};
pub use quota::Quota;
pub use record::{EntitlementRecord, EstateDistribution, Phase};
pub use trace::{CalculationTrace, Stage, TraceEntry};

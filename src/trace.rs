//! Append-only trace of the stages a computation passed through.
//!
//! The pipeline appends one [`TraceEntry`] per stage, including one per
//! special-case adjustment that fired. Entries carry a contiguous sequence
//! number, the record count and running total at that point, so a finished
//! [`EstateDistribution`](crate::record::EstateDistribution) can explain how
//! it got there. The trace is keyed by the case fingerprint.

use serde::Serialize;

use crate::adjust::Adjustment;
use crate::quota::Quota;
use crate::record::{total_share, EntitlementRecord};

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Head-counts merged and validated.
    CaseValidated,
    /// Fixed entitlements resolved.
    FixedResolved,
    /// Residue distributed.
    ResiduaryResolved,
    /// A special-case rule rewrote the records.
    Adjusted(Adjustment),
    /// Zero shares dropped and conservation verified.
    Finalised,
}

/// One sequenced trace record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Position in the trace, starting at 0.
    pub sequence: u64,
    pub stage: Stage,
    /// Number of records after the stage.
    pub records: usize,
    /// Sum of shares after the stage.
    pub total: Quota,
}

/// Sequenced log of pipeline stages for one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationTrace {
    /// [`Case::fingerprint`](crate::case::Case::fingerprint) of the input.
    pub case_fingerprint: u64,
    pub entries: Vec<TraceEntry>,
    #[serde(skip)]
    next_sequence: u64,
}

impl CalculationTrace {
    /// Create an empty trace for the case with the given fingerprint.
    pub fn new(case_fingerprint: u64) -> Self {
        Self {
            case_fingerprint,
            entries: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Append a stage snapshot and return its sequence number.
    ///
    /// # Arguments
    ///
    /// * `stage` — The stage that just completed.
    /// * `records` — The records as the stage left them.
    pub fn record(&mut self, stage: Stage, records: &[EntitlementRecord]) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(TraceEntry {
            sequence,
            stage,
            records: records.len(),
            total: total_share(records),
        });
        sequence
    }

    /// Entries whose stage equals `stage`.
    pub fn entries_for_stage(&self, stage: Stage) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.stage == stage).collect()
    }

    /// Adjustments that fired, in order.
    pub fn adjustments(&self) -> Vec<Adjustment> {
        self.entries
            .iter()
            .filter_map(|e| match e.stage {
                Stage::Adjusted(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if sequence numbers run `0, 1, …, n-1` in order.
    pub fn verify_sequence(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.sequence == i as u64)
    }
}

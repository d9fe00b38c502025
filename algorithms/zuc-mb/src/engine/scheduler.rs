//! Batch Scheduler
//!
//! Decides how far a batch advances in lockstep and hands each lane its
//! scalar continuation afterwards.

use crate::kernels::portable;
use crate::state::{LaneState, VectorState};

// =============================================================================
// COMMON PREFIX
// =============================================================================

/// Minimum length over active lanes, and whether every active lane has
/// exactly that length. `None` when no lane is active.
pub fn find_min_length<const N: usize>(lengths: &[Option<usize>; N]) -> Option<(usize, bool)> {
    let min = lengths.iter().flatten().copied().min()?;
    let all_equal = lengths.iter().flatten().all(|&len| len == min);
    Some((min, all_equal))
}

/// Per-lane progress through a batch.
///
/// Lengths are in the driver's unit (bytes for ciphering, bits for MACs).
/// `remaining(i) = length(i) - rounds * unit`.
#[derive(Debug, Clone)]
pub struct BatchSchedule<const N: usize> {
    lengths: [Option<usize>; N],
    unit: usize,
    common: usize,
    all_equal: bool,
    rounds: usize,
}

impl<const N: usize> BatchSchedule<N> {
    /// Plan a batch. `None` for an empty batch.
    pub fn new(lengths: [Option<usize>; N], unit: usize) -> Option<Self> {
        let (common, all_equal) = find_min_length(&lengths)?;
        Some(Self { lengths, unit, common, all_equal, rounds: 0 })
    }

    /// Vector rounds every active lane can take.
    pub const fn common_rounds(&self) -> usize {
        self.common / self.unit
    }

    /// The shortest active length.
    pub const fn common(&self) -> usize {
        self.common
    }

    /// Every active lane has the same length.
    pub const fn all_equal(&self) -> bool {
        self.all_equal
    }

    /// Whether `round` (0-based) is the final common round and every lane
    /// ends exactly on it.
    pub const fn is_exact_final(&self, round: usize) -> bool {
        self.all_equal && self.common % self.unit == 0 && round + 1 == self.common_rounds()
    }

    /// Record one vector round.
    pub fn advance(&mut self) {
        debug_assert!(self.rounds < self.common_rounds());
        self.rounds += 1;
    }

    /// Rounds taken so far.
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    /// Consumed length per active lane.
    pub const fn consumed(&self) -> usize {
        self.rounds * self.unit
    }

    /// Whether `lane` is part of the batch.
    pub fn is_active(&self, lane: usize) -> bool {
        self.lengths[lane].is_some()
    }

    /// Length left for `lane` (`None` when inactive).
    pub fn remaining(&self, lane: usize) -> Option<usize> {
        self.lengths[lane].map(|len| len - self.consumed())
    }
}

// =============================================================================
// LANE CONTINUATION
// =============================================================================

/// Scalar continuation of one lane.
///
/// Extraction from the vector state is deferred until keystream is actually
/// needed, so lanes that finish inside the lookahead never copy their state.
pub struct LaneSource<'v, const N: usize> {
    column: Option<(&'v VectorState<N>, usize)>,
    state: Option<LaneState>,
}

impl<'v, const N: usize> LaneSource<'v, N> {
    /// Continue lane `lane` of `vector`.
    pub const fn column(vector: &'v VectorState<N>, lane: usize) -> Self {
        Self { column: Some((vector, lane)), state: None }
    }

    /// Wrap an already initialised scalar state.
    pub const fn scalar(state: LaneState) -> Self {
        Self { column: None, state: Some(state) }
    }

    /// The lane's scalar state, extracting it on first use.
    pub fn state(&mut self) -> &mut LaneState {
        let column = self.column;
        self.state.get_or_insert_with(|| {
            column.map_or_else(LaneState::default, |(vector, lane)| vector.extract_lane(lane))
        })
    }

    /// Next `out.len()` keystream words of this lane.
    pub fn generate(&mut self, out: &mut [u32]) {
        portable::generate_lane(self.state(), out);
    }

    /// Whether the state was pulled out of the vector.
    pub const fn is_extracted(&self) -> bool {
        self.state.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================

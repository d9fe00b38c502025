//! Portable Kernel
//!
//! Scalar reference implementation of the ZUC primitive. It serves every
//! per-lane continuation, the single-buffer path, and the vector contract on
//! CPUs without AVX2 (one lane at a time).

use super::constants::{INIT_ROUNDS, MOD31, S0, S1};
use super::{Keystream, KeystreamChunk};
use crate::state::{LaneState, VectorState};
use crate::types::ROUND_WORDS;

// =============================================================================
// FIELD ARITHMETIC
// =============================================================================

/// Addition modulo `2^31 - 1`.
#[inline(always)]
pub(crate) const fn add_mod31(a: u32, b: u32) -> u32 {
    let c = a.wrapping_add(b);
    (c & MOD31) + (c >> 31)
}

/// Multiplication by `2^k` modulo `2^31 - 1`.
#[inline(always)]
pub(crate) const fn rot31(a: u32, k: u32) -> u32 {
    ((a << k) | (a >> (31 - k))) & MOD31
}

// =============================================================================
// NONLINEAR FUNCTION
// =============================================================================

#[inline(always)]
const fn l1(x: u32) -> u32 {
    x ^ x.rotate_left(2) ^ x.rotate_left(10) ^ x.rotate_left(18) ^ x.rotate_left(24)
}

#[inline(always)]
const fn l2(x: u32) -> u32 {
    x ^ x.rotate_left(8) ^ x.rotate_left(14) ^ x.rotate_left(22) ^ x.rotate_left(30)
}

/// Apply S0/S1/S0/S1 to the bytes of `x`, most significant first.
#[inline(always)]
pub(crate) fn sbox(x: u32) -> u32 {
    let b = x.to_be_bytes();
    u32::from_be_bytes([
        S0[usize::from(b[0])],
        S1[usize::from(b[1])],
        S0[usize::from(b[2])],
        S1[usize::from(b[3])],
    ])
}

/// Bit reorganisation: `X0..X3` from the LFSR.
#[inline(always)]
const fn bit_reorg(s: &[u32; 16]) -> [u32; 4] {
    [
        ((s[15] & 0x7FFF_8000) << 1) | (s[14] & 0xFFFF),
        (s[11] << 16) | (s[9] >> 15),
        (s[7] << 16) | (s[5] >> 15),
        (s[2] << 16) | (s[0] >> 15),
    ]
}

/// F function. Returns `W` and updates R1/R2.
#[inline(always)]
fn nonlinear(state: &mut LaneState, x: &[u32; 4]) -> u32 {
    let w = (x[0] ^ state.r1).wrapping_add(state.r2);
    let w1 = state.r1.wrapping_add(x[1]);
    let w2 = state.r2 ^ x[2];
    state.r1 = sbox(l1((w1 << 16) | (w2 >> 16)));
    state.r2 = sbox(l2((w2 << 16) | (w1 >> 16)));
    w
}

// =============================================================================
// LFSR
// =============================================================================

#[inline(always)]
fn lfsr_feedback(s: &[u32; 16]) -> u32 {
    let mut v = s[0];
    v = add_mod31(v, rot31(s[0], 8));
    v = add_mod31(v, rot31(s[4], 20));
    v = add_mod31(v, rot31(s[10], 21));
    v = add_mod31(v, rot31(s[13], 17));
    add_mod31(v, rot31(s[15], 15))
}

#[inline(always)]
fn lfsr_shift(s: &mut [u32; 16], v: u32) {
    s.copy_within(1.., 0);
    s[15] = if v == 0 { MOD31 } else { v };
}

#[inline(always)]
fn lfsr_init(s: &mut [u32; 16], u: u32) {
    let v = add_mod31(lfsr_feedback(s), u);
    lfsr_shift(s, v);
}

#[inline(always)]
fn lfsr_work(s: &mut [u32; 16]) {
    let v = lfsr_feedback(s);
    lfsr_shift(s, v);
}

// =============================================================================
// SCALAR PRIMITIVE
// =============================================================================

/// Initialisation rounds plus the discarded working round.
pub fn initialize(state: &mut LaneState) {
    for _ in 0..INIT_ROUNDS {
        let x = bit_reorg(&state.lfsr);
        let w = nonlinear(state, &x);
        lfsr_init(&mut state.lfsr, w >> 1);
    }
    let x = bit_reorg(&state.lfsr);
    nonlinear(state, &x);
    lfsr_work(&mut state.lfsr);
}

/// One keystream word.
#[inline]
pub fn next_word(state: &mut LaneState) -> u32 {
    let x = bit_reorg(&state.lfsr);
    let z = nonlinear(state, &x) ^ x[3];
    lfsr_work(&mut state.lfsr);
    z
}

/// Fill `out` with keystream words. Any length is accepted.
pub fn generate_lane(state: &mut LaneState, out: &mut [u32]) {
    for word in out {
        *word = next_word(state);
    }
}

// =============================================================================
// VECTOR CONTRACT
// =============================================================================

/// Lane-by-lane implementation of [`Keystream`] for any width.
#[derive(Debug, Clone, Copy, Default)]
pub struct Portable;

impl<const LANES: usize> Keystream<LANES> for Portable {
    fn name(&self) -> &'static str {
        "Portable"
    }

    fn initialize(&self, state: &mut VectorState<LANES>) {
        for lane in 0..LANES {
            let mut scalar = state.extract_lane(lane);
            initialize(&mut scalar);
            state.insert_lane(lane, &scalar);
        }
    }

    fn generate(
        &self,
        state: &mut VectorState<LANES>,
        chunk: KeystreamChunk,
        out: &mut [[u32; ROUND_WORDS]; LANES],
    ) {
        for (lane, words) in out.iter_mut().enumerate() {
            let mut scalar = state.extract_lane(lane);
            generate_lane(&mut scalar, &mut words[..chunk.words()]);
            state.insert_lane(lane, &scalar);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Cipher State
//!
//! `LaneState` is one ZUC instance: 16 LFSR cells of 31 bits plus the two
//! nonlinear registers. `VectorState<N>` packs N of them column-major so a
//! vector kernel can step every lane with one instruction per cell.
//!
//! Both types erase themselves on drop.

use static_assertions::{assert_eq_size, assert_impl_all, const_assert_eq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::kernels::constants::{
    EK256_D, EK256_D_MAC16, EK256_D_MAC32, EK256_D_MAC4, EK256_D_MAC8, EK_D,
};
use crate::types::{Iv128, Iv256, Key128, Key256, TagSize};

// =============================================================================
// LANE STATE
// =============================================================================

/// Scalar ZUC state.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[repr(C)]
pub struct LaneState {
    /// LFSR cells `s0..s15`, each below `2^31`.
    pub lfsr: [u32; 16],
    /// Nonlinear register R1.
    pub r1: u32,
    /// Nonlinear register R2.
    pub r2: u32,
}

#[inline]
fn pack128(k: u8, d: u32, iv: u8) -> u32 {
    (u32::from(k) << 23) | (d << 8) | u32::from(iv)
}

#[inline]
fn pack256(a: u8, d: u8, c: u8, e: u8) -> u32 {
    (u32::from(a) << 23) | (u32::from(d) << 16) | (u32::from(c) << 8) | u32::from(e)
}

impl LaneState {
    /// ZUC-128 key loading. Registers start at zero.
    #[must_use]
    pub fn load_128(key: &Key128, iv: &Iv128) -> Self {
        let mut state = Self::default();
        for (i, cell) in state.lfsr.iter_mut().enumerate() {
            *cell = pack128(key[i], EK_D[i], iv[i]);
        }
        state
    }

    /// ZUC-256 key loading with the constant set `d`.
    ///
    /// IV bytes 17..25 contribute their low 6 bits; the last key byte is split
    /// across cells 14 and 15.
    #[must_use]
    pub fn load_256(key: &Key256, iv: &Iv256, d: &[u8; 16]) -> Self {
        let k = key;
        let mut v = [0u8; 25];
        v[..17].copy_from_slice(&iv[..17]);
        for (dst, src) in v[17..].iter_mut().zip(&iv[17..]) {
            *dst = src & 0x3F;
        }

        let state = Self {
            lfsr: [
                pack256(k[0], d[0], k[21], k[16]),
                pack256(k[1], d[1], k[22], k[17]),
                pack256(k[2], d[2], k[23], k[18]),
                pack256(k[3], d[3], k[24], k[19]),
                pack256(k[4], d[4], k[25], k[20]),
                pack256(v[0], d[5] | v[17], k[5], k[26]),
                pack256(v[1], d[6] | v[18], k[6], k[27]),
                pack256(v[10], d[7] | v[19], k[7], v[2]),
                pack256(k[8], d[8] | v[20], v[3], v[11]),
                pack256(k[9], d[9] | v[21], v[12], v[4]),
                pack256(v[5], d[10] | v[22], k[10], k[28]),
                pack256(k[11], d[11] | v[23], v[6], v[13]),
                pack256(k[12], d[12] | v[24], v[7], v[14]),
                pack256(k[13], d[13], v[15], v[8]),
                pack256(k[14], d[14] | (k[31] >> 4), v[16], v[9]),
                pack256(k[15], d[15] | (k[31] & 0x0F), k[30], k[29]),
            ],
            r1: 0,
            r2: 0,
        };
        v.zeroize();
        state
    }

    /// ZUC-256 loading for confidentiality.
    #[must_use]
    pub fn load_256_cipher(key: &Key256, iv: &Iv256) -> Self {
        Self::load_256(key, iv, &EK256_D)
    }

    /// ZUC-256 loading for a MAC of the given tag size.
    #[must_use]
    pub fn load_256_mac(key: &Key256, iv: &Iv256, tag: TagSize) -> Self {
        let d = match tag {
            TagSize::B4 => &EK256_D_MAC4,
            TagSize::B8 => &EK256_D_MAC8,
            TagSize::B16 => &EK256_D_MAC16,
            TagSize::B32 => &EK256_D_MAC32,
        };
        Self::load_256(key, iv, d)
    }
}

// =============================================================================
// VECTOR STATE
// =============================================================================

/// N lane states in structure-of-arrays layout.
///
/// Row `j` of `lfsr` holds cell `s_j` of every lane. For `N = 8` each row is
/// exactly one 256-bit register.
#[derive(Clone, PartialEq, Eq)]
#[repr(C, align(32))]
pub struct VectorState<const N: usize> {
    /// LFSR rows.
    pub lfsr: [[u32; N]; 16],
    /// R1 of every lane.
    pub r1: [u32; N],
    /// R2 of every lane.
    pub r2: [u32; N],
}

impl<const N: usize> VectorState<N> {
    /// All-zero state.
    #[must_use]
    pub const fn new() -> Self {
        Self { lfsr: [[0; N]; 16], r1: [0; N], r2: [0; N] }
    }

    /// Copy a lane state into column `lane`.
    pub fn insert_lane(&mut self, lane: usize, state: &LaneState) {
        for (row, cell) in self.lfsr.iter_mut().zip(&state.lfsr) {
            row[lane] = *cell;
        }
        self.r1[lane] = state.r1;
        self.r2[lane] = state.r2;
    }

    /// Copy column `lane` out as a scalar state.
    ///
    /// All 16 cells and both registers are copied, so the result continues the
    /// lane's keystream exactly where the vector left it.
    #[must_use]
    pub fn extract_lane(&self, lane: usize) -> LaneState {
        let mut state = LaneState::default();
        for (cell, row) in state.lfsr.iter_mut().zip(&self.lfsr) {
            *cell = row[lane];
        }
        state.r1 = self.r1[lane];
        state.r2 = self.r2[lane];
        state
    }
}

impl<const N: usize> Default for VectorState<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Zeroize for VectorState<N> {
    fn zeroize(&mut self) {
        self.lfsr.zeroize();
        self.r1.zeroize();
        self.r2.zeroize();
    }
}

impl<const N: usize> Drop for VectorState<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for VectorState<N> {}

assert_eq_size!(LaneState, [u32; 18]);
assert_eq_size!(VectorState<8>, [u32; 144]);
const_assert_eq!(core::mem::align_of::<VectorState<8>>(), 32);
assert_impl_all!(LaneState: Zeroize, ZeroizeOnDrop, Send, Sync);
assert_impl_all!(VectorState<8>: Zeroize, ZeroizeOnDrop, Send, Sync);

// =============================================================================
// TESTS
// =============================================================================

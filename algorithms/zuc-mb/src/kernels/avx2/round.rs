//! AVX2 Rounds
//!
//! Eight ZUC lanes in `__m256i` registers, one register per LFSR row.

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use core::arch::x86_64::{
    __m256i, _mm256_add_epi32, _mm256_and_si256, _mm256_cmpeq_epi32, _mm256_load_si256,
    _mm256_or_si256, _mm256_set1_epi32, _mm256_setzero_si256,
    _mm256_slli_epi32, _mm256_srli_epi32, _mm256_store_si256, _mm256_storeu_si256,
    _mm256_xor_si256,
};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::kernels::constants::{INIT_ROUNDS, MOD31};
use crate::kernels::portable::sbox as sbox_word;
use crate::state::VectorState;
use crate::types::ROUND_WORDS;

// =============================================================================
// REGISTER FILE
// =============================================================================

/// Aligned scratch row for lane-wise table lookups and transposition.
#[repr(C, align(32))]
struct Row([u32; 8]);

/// Register image of a `VectorState<8>`. Spilled copies are wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(super) struct Registers {
    s: [__m256i; 16],
    r1: __m256i,
    r2: __m256i,
}

/// `(a << l) | (a >> r)` with `l + r == 32`.
macro_rules! rotl {
    ($a:expr, $l:literal, $r:literal) => {
        _mm256_or_si256(_mm256_slli_epi32::<$l>($a), _mm256_srli_epi32::<$r>($a))
    };
}

/// Multiplication by `2^l` modulo `2^31 - 1` (`l + r == 31`).
macro_rules! rot31 {
    ($a:expr, $l:literal, $r:literal) => {
        _mm256_and_si256(
            _mm256_or_si256(_mm256_slli_epi32::<$l>($a), _mm256_srli_epi32::<$r>($a)),
            _mm256_set1_epi32(MOD31 as i32),
        )
    };
}

impl Registers {
    // SAFETY: Requires AVX2 (enforced by `Avx2::new`). Rows of `VectorState<8>`
    // are 32 bytes and the struct is 32-byte aligned.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    pub(super) unsafe fn load(state: &VectorState<8>) -> Self {
        let mut s = [_mm256_setzero_si256(); 16];
        for (reg, row) in s.iter_mut().zip(&state.lfsr) {
            *reg = _mm256_load_si256(row.as_ptr().cast());
        }
        Self {
            s,
            r1: _mm256_load_si256(state.r1.as_ptr().cast()),
            r2: _mm256_load_si256(state.r2.as_ptr().cast()),
        }
    }

    // SAFETY: Requires AVX2. Mirrors `load`.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    pub(super) unsafe fn store(&self, state: &mut VectorState<8>) {
        for (reg, row) in self.s.iter().zip(state.lfsr.iter_mut()) {
            _mm256_store_si256(row.as_mut_ptr().cast(), *reg);
        }
        _mm256_store_si256(state.r1.as_mut_ptr().cast(), self.r1);
        _mm256_store_si256(state.r2.as_mut_ptr().cast(), self.r2);
    }

    // =========================================================================
    // ROUND FUNCTIONS
    // =========================================================================

    // SAFETY: Requires AVX2.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn add_mod31(a: __m256i, b: __m256i) -> __m256i {
        let c = _mm256_add_epi32(a, b);
        _mm256_add_epi32(
            _mm256_and_si256(c, _mm256_set1_epi32(MOD31 as i32)),
            _mm256_srli_epi32::<31>(c),
        )
    }

    // SAFETY: Requires AVX2.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn bit_reorg(&self) -> [__m256i; 4] {
        let s = &self.s;
        let hi_mask = _mm256_set1_epi32(0x7FFF_8000);
        let lo_mask = _mm256_set1_epi32(0xFFFF);
        [
            _mm256_or_si256(
                _mm256_slli_epi32::<1>(_mm256_and_si256(s[15], hi_mask)),
                _mm256_and_si256(s[14], lo_mask),
            ),
            _mm256_or_si256(_mm256_slli_epi32::<16>(s[11]), _mm256_srli_epi32::<15>(s[9])),
            _mm256_or_si256(_mm256_slli_epi32::<16>(s[7]), _mm256_srli_epi32::<15>(s[5])),
            _mm256_or_si256(_mm256_slli_epi32::<16>(s[2]), _mm256_srli_epi32::<15>(s[0])),
        ]
    }

    // SAFETY: Requires AVX2. The S-box lookup goes through an aligned stack row.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn sbox(x: __m256i) -> __m256i {
        let mut row = Row([0; 8]);
        _mm256_store_si256(row.0.as_mut_ptr().cast(), x);
        for word in &mut row.0 {
            *word = sbox_word(*word);
        }
        let out = _mm256_load_si256(row.0.as_ptr().cast());
        row.0.zeroize();
        out
    }

    // SAFETY: Requires AVX2.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn nonlinear(&mut self, x: &[__m256i; 4]) -> __m256i {
        let w = _mm256_add_epi32(_mm256_xor_si256(x[0], self.r1), self.r2);
        let w1 = _mm256_add_epi32(self.r1, x[1]);
        let w2 = _mm256_xor_si256(self.r2, x[2]);

        let u = _mm256_or_si256(_mm256_slli_epi32::<16>(w1), _mm256_srli_epi32::<16>(w2));
        let v = _mm256_or_si256(_mm256_slli_epi32::<16>(w2), _mm256_srli_epi32::<16>(w1));

        let l1 = _mm256_xor_si256(
            _mm256_xor_si256(_mm256_xor_si256(u, rotl!(u, 2, 30)), rotl!(u, 10, 22)),
            _mm256_xor_si256(rotl!(u, 18, 14), rotl!(u, 24, 8)),
        );
        let l2 = _mm256_xor_si256(
            _mm256_xor_si256(_mm256_xor_si256(v, rotl!(v, 8, 24)), rotl!(v, 14, 18)),
            _mm256_xor_si256(rotl!(v, 22, 10), rotl!(v, 30, 2)),
        );

        self.r1 = Self::sbox(l1);
        self.r2 = Self::sbox(l2);
        w
    }

    // SAFETY: Requires AVX2.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn feedback(&self) -> __m256i {
        let s = &self.s;
        let mut v = Self::add_mod31(s[0], rot31!(s[0], 8, 23));
        v = Self::add_mod31(v, rot31!(s[4], 20, 11));
        v = Self::add_mod31(v, rot31!(s[10], 21, 10));
        v = Self::add_mod31(v, rot31!(s[13], 17, 14));
        Self::add_mod31(v, rot31!(s[15], 15, 16))
    }

    /// Shift the LFSR and append `v`, mapping 0 to `2^31 - 1`.
    // SAFETY: Requires AVX2.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn shift(&mut self, v: __m256i) {
        let zero = _mm256_cmpeq_epi32(v, _mm256_setzero_si256());
        let v = _mm256_or_si256(v, _mm256_and_si256(zero, _mm256_set1_epi32(MOD31 as i32)));
        self.s.copy_within(1.., 0);
        self.s[15] = v;
    }

    // SAFETY: Requires AVX2.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    pub(super) unsafe fn initialize(&mut self) {
        for _ in 0..INIT_ROUNDS {
            let x = self.bit_reorg();
            let w = self.nonlinear(&x);
            let v = Self::add_mod31(self.feedback(), _mm256_srli_epi32::<1>(w));
            self.shift(v);
        }
        let x = self.bit_reorg();
        self.nonlinear(&x);
        let v = self.feedback();
        self.shift(v);
    }

    /// One keystream word per lane.
    // SAFETY: Requires AVX2.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn word(&mut self) -> __m256i {
        let x = self.bit_reorg();
        let z = _mm256_xor_si256(self.nonlinear(&x), x[3]);
        let v = self.feedback();
        self.shift(v);
        z
    }

    /// Generate `words` words per lane and transpose them into `out[lane]`.
    // SAFETY: Requires AVX2. `words <= ROUND_WORDS`.
    #[target_feature(enable = "avx2")]
    #[allow(unsafe_code)]
    pub(super) unsafe fn generate(&mut self, words: usize, out: &mut [[u32; ROUND_WORDS]; 8]) {
        debug_assert!(words <= ROUND_WORDS);
        let mut row = Row([0; 8]);
        for j in 0..words {
            let z = self.word();
            _mm256_storeu_si256(row.0.as_mut_ptr().cast(), z);
            for (lane, w) in out.iter_mut().zip(&row.0) {
                lane[j] = *w;
            }
        }
        row.0.zeroize();
    }
}

// =============================================================================
// TESTS
// =============================================================================

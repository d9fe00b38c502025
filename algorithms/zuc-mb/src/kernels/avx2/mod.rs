//! AVX2 Kernel Module
//!
//! Eight-lane ZUC keystream generation with one 256-bit register per LFSR row.

#![allow(unsafe_code)]

mod round;

use round::Registers;

use super::{Keystream, KeystreamChunk};
use crate::engine::Capabilities;
use crate::state::VectorState;
use crate::types::ROUND_WORDS;

/// AVX2 implementation of [`Keystream<8>`].
///
/// Only obtainable through [`Avx2::new`], which checks the CPU first.
#[derive(Debug, Clone, Copy)]
pub struct Avx2 {
    _detected: (),
}

impl Avx2 {
    /// Returns the kernel if the running CPU supports AVX2.
    #[must_use]
    pub fn new() -> Option<Self> {
        if Capabilities::detect().has(Capabilities::AVX2) {
            Some(Self { _detected: () })
        } else {
            None
        }
    }

    /// Caller has already checked AVX2 through a `Capabilities` value.
    pub(crate) const fn assume_detected() -> Self {
        Self { _detected: () }
    }
}

impl Keystream<8> for Avx2 {
    fn name(&self) -> &'static str {
        "AVX2"
    }

    fn initialize(&self, state: &mut VectorState<8>) {
        // SAFETY: `Avx2` only exists after AVX2 was detected.
        unsafe {
            let mut regs = Registers::load(state);
            regs.initialize();
            regs.store(state);
        }
    }

    fn generate(
        &self,
        state: &mut VectorState<8>,
        chunk: KeystreamChunk,
        out: &mut [[u32; ROUND_WORDS]; 8],
    ) {
        // SAFETY: `Avx2` only exists after AVX2 was detected; chunk words never
        // exceed a round.
        unsafe {
            let mut regs = Registers::load(state);
            regs.generate(chunk.words(), out);
            regs.store(state);
        }
    }
}

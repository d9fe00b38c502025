//! Keystream Kernels
//!
//! Hardware-specific implementations of the ZUC keystream primitive. Every
//! kernel steps a `VectorState<N>` in lockstep and must produce exactly the
//! words the portable scalar primitive would produce for each lane.

use cfg_if::cfg_if;

use crate::state::VectorState;
use crate::types::ROUND_WORDS;

pub mod constants;
pub mod portable;

cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub mod avx2;
    }
}

// =============================================================================
// KEYSTREAM CONTRACT
// =============================================================================

/// Keystream bytes produced per lane by one vector `generate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystreamChunk {
    /// 1 word.
    Bytes4,
    /// 2 words.
    Bytes8,
    /// 4 words.
    Bytes16,
    /// 8 words (one full round).
    Bytes32,
}

impl KeystreamChunk {
    /// Words per lane.
    #[must_use]
    pub const fn words(self) -> usize {
        match self {
            Self::Bytes4 => 1,
            Self::Bytes8 => 2,
            Self::Bytes16 => 4,
            Self::Bytes32 => 8,
        }
    }

    /// Bytes per lane.
    #[must_use]
    pub const fn bytes(self) -> usize {
        self.words() * 4
    }

    /// Smallest chunk covering `bytes` (at most one round).
    #[must_use]
    pub const fn covering(bytes: usize) -> Self {
        match bytes {
            0..=4 => Self::Bytes4,
            5..=8 => Self::Bytes8,
            9..=16 => Self::Bytes16,
            _ => Self::Bytes32,
        }
    }
}

/// Vector keystream primitive over `LANES` lanes.
///
/// The caller loads keys into the state (see `LaneState::load_128` and
/// friends) and then calls [`Keystream::initialize`] once before any
/// [`Keystream::generate`].
pub trait Keystream<const LANES: usize>: Sync {
    /// Human-readable backend name.
    fn name(&self) -> &'static str;

    /// Run the 32 initialisation rounds and the discarded working round.
    fn initialize(&self, state: &mut VectorState<LANES>);

    /// Produce `chunk.words()` keystream words per lane into
    /// `out[lane][..chunk.words()]`. Words past that are left untouched.
    fn generate(
        &self,
        state: &mut VectorState<LANES>,
        chunk: KeystreamChunk,
        out: &mut [[u32; ROUND_WORDS]; LANES],
    );
}

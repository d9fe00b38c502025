#![cfg_attr(not(feature = "std"), no_std)]

//! # ZUC-MB
//!
//! Multi-buffer ZUC: 128-EEA3 confidentiality, 128-EIA3 integrity and the
//! ZUC-256 MAC with 4, 8, 16 or 32-byte tags. Eight independent buffers run
//! in lockstep on one AVX2 register file when the CPU allows it.

//! # Usage
//! ```rust
//! use zuc_mb::{AuthJob, CipherJob, TagSize};
//!
//! // 1. Single buffer
//! let key = [0x17u8; 16];
//! let iv = zuc_mb::iv::eea3_iv(0x398a59b4, 0x15, 1);
//! let mut data = *b"confidential payload";
//! zuc_mb::eea3_in_place(&key, &iv, &mut data)?;
//!
//! // 2. Many buffers at once
//! let mut a = [0u8; 64];
//! let mut b = [0u8; 100];
//! let mut jobs = [
//!     CipherJob::in_place(&key, &iv, &mut a),
//!     CipherJob::in_place(&key, &iv, &mut b),
//! ];
//! zuc_mb::eea3_n(&mut jobs)?;
//!
//! // 3. Integrity
//! let mac_iv = zuc_mb::iv::eia3_iv(0x398a59b4, 0x15, 1);
//! let tag = zuc_mb::eia3(&key, &mac_iv, b"message", 56)?;
//! assert!(zuc_mb::verify_eia3(&key, &mac_iv, b"message", 56, tag));
//!
//! // 4. ZUC-256 MAC
//! let key256 = [0u8; 32];
//! let iv256 = [0u8; 25];
//! let tag = zuc_mb::eia3_256(&key256, &iv256, b"message", 56, TagSize::B16)?;
//! assert_eq!(tag.len(), 16);
//! # let _ = AuthJob::new(&key, &mac_iv, b"m", 8);
//! # Ok::<(), zuc_mb::ZucError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod engine;
#[cfg(feature = "std")]
pub mod ffi;
pub mod iv;
pub mod job;
// Exposed for benchmarks and backend tests, hidden from docs
#[doc(hidden)]
pub mod kernels;
mod oneshot;
#[doc(hidden)]
pub mod state;
pub(crate) mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use engine::{Backend, Capabilities, Engine};
pub use job::{Auth256Job, AuthJob, CipherJob, CipherKey, LaneData};
pub use oneshot::{
    eea3, eea3_256, eea3_in_place, eea3_n, eia3, eia3_256, eia3_256_n, eia3_n, verify_eia3,
    verify_eia3_256,
};
pub use types::{
    CpuFeatureError, Iv128, Iv256, Key128, Key256, MacTag, TagSize, ZucError, ZUC_MAX_BITLEN,
    ZUC_MAX_BYTELEN, ZUC_MIN_BITLEN, ZUC_MIN_BYTELEN,
};

/// Name of the backend driving the 8-lane path on this CPU.
#[must_use]
pub fn active_backend() -> &'static str {
    Engine::detect().backend().name()
}

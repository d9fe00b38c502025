//! Public API Layer
//!
//! Free functions over an engine built for the running CPU.
use subtle::ConstantTimeEq;

use crate::engine::Engine;
use crate::job::{Auth256Job, AuthJob, CipherJob};
use crate::types::{Iv128, Iv256, Key128, Key256, MacTag, TagSize, ZucError};

// =============================================================================
// CONFIDENTIALITY
// =============================================================================

/// 128-EEA3: XOR keystream from `src` into `dst`.
///
/// # Errors
/// Length outside `1..=8188` bytes, or mismatched buffer lengths.
///
/// # Example
/// ```rust
/// let key = [0u8; 16];
/// let iv = zuc_mb::iv::eea3_iv(0x66035492, 0xF, 0);
/// let plain = *b"attack at dawn";
/// let mut cipher = [0u8; 14];
/// zuc_mb::eea3(&key, &iv, &plain, &mut cipher)?;
/// let mut back = [0u8; 14];
/// zuc_mb::eea3(&key, &iv, &cipher, &mut back)?;
/// assert_eq!(back, plain);
/// # Ok::<(), zuc_mb::ZucError>(())
/// ```
pub fn eea3(key: &Key128, iv: &Iv128, src: &[u8], dst: &mut [u8]) -> Result<(), ZucError> {
    Engine::detect().eea3(key, iv, src, dst)
}

/// 128-EEA3 in place.
///
/// # Errors
/// Length outside `1..=8188` bytes.
pub fn eea3_in_place(key: &Key128, iv: &Iv128, buf: &mut [u8]) -> Result<(), ZucError> {
    Engine::detect().eea3_in_place(key, iv, buf)
}

/// ZUC-256 confidentiality from `src` into `dst`.
///
/// # Errors
/// Length outside `1..=8188` bytes, or mismatched buffer lengths.
pub fn eea3_256(key: &Key256, iv: &Iv256, src: &[u8], dst: &mut [u8]) -> Result<(), ZucError> {
    Engine::detect().eea3_256(key, iv, src, dst)
}

/// Any number of cipher jobs, batched 8 at a time.
///
/// # Errors
/// The first invalid job's error; no buffer is modified in that case.
pub fn eea3_n(jobs: &mut [CipherJob<'_>]) -> Result<(), ZucError> {
    Engine::detect().eea3_n(jobs)
}

// =============================================================================
// INTEGRITY
// =============================================================================

/// 128-EIA3 MAC.
///
/// # Errors
/// Bit length outside `1..=65504` or longer than `message`.
pub fn eia3(key: &Key128, iv: &Iv128, message: &[u8], length_bits: u32) -> Result<u32, ZucError> {
    Engine::detect().eia3(key, iv, message, length_bits)
}

/// 128-EIA3 over many messages.
///
/// # Errors
/// `tags.len() != jobs.len()`, or the first invalid job's error.
pub fn eia3_n(jobs: &[AuthJob<'_>], tags: &mut [u32]) -> Result<(), ZucError> {
    Engine::detect().eia3_n(jobs, tags)
}

/// ZUC-256 MAC.
///
/// # Errors
/// Bit length outside `1..=65504` or longer than `message`.
pub fn eia3_256(
    key: &Key256,
    iv: &Iv256,
    message: &[u8],
    length_bits: u32,
    tag_size: TagSize,
) -> Result<MacTag, ZucError> {
    Engine::detect().eia3_256(key, iv, message, length_bits, tag_size)
}

/// ZUC-256 MAC over many messages.
///
/// # Errors
/// `tags.len() != jobs.len()`, or the first invalid job's error.
pub fn eia3_256_n(
    jobs: &[Auth256Job<'_>],
    tag_size: TagSize,
    tags: &mut [MacTag],
) -> Result<(), ZucError> {
    Engine::detect().eia3_256_n(jobs, tag_size, tags)
}

// =============================================================================
// VERIFICATION
// =============================================================================

/// Verify a 128-EIA3 tag in constant time.
///
/// Invalid input verifies as `false`.
#[must_use]
pub fn verify_eia3(key: &Key128, iv: &Iv128, message: &[u8], length_bits: u32, expected: u32) -> bool {
    eia3(key, iv, message, length_bits)
        .is_ok_and(|tag| tag.to_be_bytes().ct_eq(&expected.to_be_bytes()).into())
}

/// Verify a ZUC-256 tag in constant time. The tag size follows
/// `expected.len()`.
///
/// Invalid input or an unsupported length verifies as `false`.
#[must_use]
pub fn verify_eia3_256(key: &Key256, iv: &Iv256, message: &[u8], length_bits: u32, expected: &[u8]) -> bool {
    let Ok(tag_size) = TagSize::try_from(expected.len()) else {
        return false;
    };
    eia3_256(key, iv, message, length_bits, tag_size).is_ok_and(|tag| tag.verify(expected))
}

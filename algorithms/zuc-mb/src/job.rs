//! Buffer Descriptors
//!
//! One job per lane: key material, IV and the buffer it applies to. Jobs only
//! borrow; nothing here owns secret data.

use crate::state::LaneState;
use crate::types::{
    Iv128, Iv256, Key128, Key256, TagSize, ZucError, ZUC_MAX_BITLEN, ZUC_MAX_BYTELEN,
    ZUC_MIN_BITLEN, ZUC_MIN_BYTELEN,
};

// =============================================================================
// CIPHER JOBS
// =============================================================================

/// Key and IV of a confidentiality job.
///
/// ZUC-128 and ZUC-256 lanes may share a batch: only key loading differs.
#[derive(Clone, Copy)]
pub enum CipherKey<'a> {
    /// 128-bit key, 16-byte IV (EEA3).
    Zuc128 {
        /// Key.
        key: &'a Key128,
        /// IV.
        iv: &'a Iv128,
    },
    /// 256-bit key, 25-byte IV.
    Zuc256 {
        /// Key.
        key: &'a Key256,
        /// IV.
        iv: &'a Iv256,
    },
}

impl CipherKey<'_> {
    /// Loaded, not yet initialised, lane state.
    pub(crate) fn load(&self) -> LaneState {
        match *self {
            Self::Zuc128 { key, iv } => LaneState::load_128(key, iv),
            Self::Zuc256 { key, iv } => LaneState::load_256_cipher(key, iv),
        }
    }
}

/// The data a cipher job transforms.
pub enum LaneData<'a> {
    /// Read `src`, write `dst`. Both have the same length.
    Copy {
        /// Input.
        src: &'a [u8],
        /// Output.
        dst: &'a mut [u8],
    },
    /// Transform in place.
    InPlace(&'a mut [u8]),
}

impl LaneData<'_> {
    /// Buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Copy { src, .. } => src.len(),
            Self::InPlace(buf) => buf.len(),
        }
    }

    /// True for an empty buffer (never valid for processing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// XOR `keystream` into the buffer starting at byte `offset`.
    pub(crate) fn apply(&mut self, offset: usize, keystream: &[u8]) {
        let end = offset + keystream.len();
        match self {
            Self::Copy { src, dst } => {
                for ((d, s), k) in dst[offset..end].iter_mut().zip(&src[offset..end]).zip(keystream) {
                    *d = s ^ k;
                }
            }
            Self::InPlace(buf) => {
                for (b, k) in buf[offset..end].iter_mut().zip(keystream) {
                    *b ^= k;
                }
            }
        }
    }
}

/// One EEA3 job.
pub struct CipherJob<'a> {
    /// Key material.
    pub key: CipherKey<'a>,
    /// Buffer.
    pub data: LaneData<'a>,
}

impl<'a> CipherJob<'a> {
    /// ZUC-128 job from `src` into `dst`.
    pub fn new(key: &'a Key128, iv: &'a Iv128, src: &'a [u8], dst: &'a mut [u8]) -> Self {
        Self { key: CipherKey::Zuc128 { key, iv }, data: LaneData::Copy { src, dst } }
    }

    /// ZUC-128 job transforming `buf` in place.
    pub fn in_place(key: &'a Key128, iv: &'a Iv128, buf: &'a mut [u8]) -> Self {
        Self { key: CipherKey::Zuc128 { key, iv }, data: LaneData::InPlace(buf) }
    }

    /// ZUC-256 job from `src` into `dst`.
    pub fn new_256(key: &'a Key256, iv: &'a Iv256, src: &'a [u8], dst: &'a mut [u8]) -> Self {
        Self { key: CipherKey::Zuc256 { key, iv }, data: LaneData::Copy { src, dst } }
    }

    /// ZUC-256 job transforming `buf` in place.
    pub fn in_place_256(key: &'a Key256, iv: &'a Iv256, buf: &'a mut [u8]) -> Self {
        Self { key: CipherKey::Zuc256 { key, iv }, data: LaneData::InPlace(buf) }
    }

    /// Buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for an empty buffer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ZucError> {
        let len = self.data.len();
        if !(ZUC_MIN_BYTELEN..=ZUC_MAX_BYTELEN).contains(&len) {
            return Err(ZucError::CipherLengthOutOfRange);
        }
        if let LaneData::Copy { src, dst } = &self.data {
            if dst.len() != src.len() {
                return Err(ZucError::BufferLengthMismatch);
            }
        }
        Ok(())
    }
}

// =============================================================================
// AUTH JOBS
// =============================================================================

fn validate_message(message: &[u8], length_bits: u32) -> Result<(), ZucError> {
    if !(ZUC_MIN_BITLEN..=ZUC_MAX_BITLEN).contains(&length_bits) {
        return Err(ZucError::AuthLengthOutOfRange);
    }
    if (message.len() as u64) * 8 < u64::from(length_bits) {
        return Err(ZucError::BufferLengthMismatch);
    }
    Ok(())
}

/// One EIA3 job: 32-bit MAC over the first `length_bits` bits of `message`.
#[derive(Clone, Copy)]
pub struct AuthJob<'a> {
    /// Key.
    pub key: &'a Key128,
    /// IV.
    pub iv: &'a Iv128,
    /// Message bytes; bits past `length_bits` are ignored.
    pub message: &'a [u8],
    /// Message length in bits.
    pub length_bits: u32,
}

impl<'a> AuthJob<'a> {
    /// New job.
    pub const fn new(key: &'a Key128, iv: &'a Iv128, message: &'a [u8], length_bits: u32) -> Self {
        Self { key, iv, message, length_bits }
    }

    pub(crate) fn validate(&self) -> Result<(), ZucError> {
        validate_message(self.message, self.length_bits)
    }
}

/// One ZUC-256 MAC job. The tag size is chosen per call.
#[derive(Clone, Copy)]
pub struct Auth256Job<'a> {
    /// Key.
    pub key: &'a Key256,
    /// IV.
    pub iv: &'a Iv256,
    /// Message bytes; bits past `length_bits` are ignored.
    pub message: &'a [u8],
    /// Message length in bits.
    pub length_bits: u32,
}

impl<'a> Auth256Job<'a> {
    /// New job.
    pub const fn new(key: &'a Key256, iv: &'a Iv256, message: &'a [u8], length_bits: u32) -> Self {
        Self { key, iv, message, length_bits }
    }

    pub(crate) fn validate(&self) -> Result<(), ZucError> {
        validate_message(self.message, self.length_bits)
    }

    pub(crate) fn load(&self, tag: TagSize) -> LaneState {
        LaneState::load_256_mac(self.key, self.iv, tag)
    }
}

// =============================================================================
// BATCH VALIDATION
// =============================================================================

/// Validate every active job, in order. The first failure wins and nothing
/// is processed.
pub(crate) fn validate_all<'j, T: 'j>(
    jobs: impl IntoIterator<Item = Option<&'j T>>,
    check: impl Fn(&T) -> Result<(), ZucError>,
) -> Result<(), ZucError> {
    for (index, job) in jobs.into_iter().enumerate() {
        if let Some(Err(err)) = job.map(&check) {
            log::debug!("rejecting batch: job {index}: {err}");
            return Err(err);
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

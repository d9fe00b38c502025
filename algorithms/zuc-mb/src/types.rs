//! Shared types used across the zuc-mb library.

use core::ffi::CStr;
use core::fmt;
#[cfg(feature = "std")]
use std::error;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

// =============================================================================
// KEYS & IVS
// =============================================================================

/// ZUC-128 key (EEA3 / EIA3).
pub type Key128 = [u8; 16];

/// ZUC-128 initialisation vector.
pub type Iv128 = [u8; 16];

/// ZUC-256 key.
pub type Key256 = [u8; 32];

/// ZUC-256 initialisation vector.
///
/// Bytes 17..25 carry 6 significant bits each; their upper two bits are ignored.
pub type Iv256 = [u8; 25];

// =============================================================================
// LIMITS
// =============================================================================

/// Shortest accepted cipher buffer, in bytes.
pub const ZUC_MIN_BYTELEN: usize = 1;

/// Longest accepted cipher buffer, in bytes.
pub const ZUC_MAX_BYTELEN: usize = 8188;

/// Shortest accepted MAC message, in bits.
pub const ZUC_MIN_BITLEN: u32 = 1;

/// Longest accepted MAC message, in bits.
pub const ZUC_MAX_BITLEN: u32 = 65504;

/// Keystream bytes per lane in one vector round.
pub const ROUND_BYTES: usize = 32;

/// Keystream words per lane in one vector round.
pub const ROUND_WORDS: usize = ROUND_BYTES / 4;

/// Message bits folded per MAC round.
pub const ROUND_BITS: u32 = 256;

// =============================================================================
// TAG SIZES
// =============================================================================

/// Tag length of the ZUC-256 MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSize {
    /// 32-bit tag.
    B4,
    /// 64-bit tag.
    B8,
    /// 128-bit tag.
    B16,
    /// 256-bit tag.
    B32,
}

impl TagSize {
    /// Every supported tag size, shortest first.
    pub const ALL: [Self; 4] = [Self::B4, Self::B8, Self::B16, Self::B32];

    /// Tag length in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::B4 => 4,
            Self::B8 => 8,
            Self::B16 => 16,
            Self::B32 => 32,
        }
    }

    /// Tag length in 32-bit words.
    #[must_use]
    pub const fn words(self) -> usize {
        self.bytes() / 4
    }

    /// Tag length in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        // At most 256, so the cast is lossless.
        #[allow(clippy::cast_possible_truncation)]
        let bits = (self.bytes() * 8) as u32;
        bits
    }
}

impl TryFrom<usize> for TagSize {
    type Error = ZucError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        match bytes {
            4 => Ok(Self::B4),
            8 => Ok(Self::B8),
            16 => Ok(Self::B16),
            32 => Ok(Self::B32),
            _ => Err(ZucError::InvalidTagSize),
        }
    }
}

// =============================================================================
// MAC TAG
// =============================================================================

/// A ZUC-256 MAC tag of 4, 8, 16 or 32 bytes.
///
/// Words are serialised big-endian, in keystream order.
#[derive(Clone, Copy, PartialEq, Eq, Zeroize)]
pub struct MacTag {
    bytes: [u8; 32],
    len: usize,
}

impl MacTag {
    /// Serialise the tag accumulator words of a given size.
    pub(crate) fn from_words(words: &[u32], size: TagSize) -> Self {
        let mut bytes = [0u8; 32];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(&words[..size.words()]) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Self { bytes, len: size.bytes() }
    }

    /// Empty tag, used to pre-fill output slots.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bytes: [0; 32], len: 0 }
    }

    /// The tag bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Tag length in bytes (0 for an empty tag).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True for an empty tag.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Compare against `expected` in constant time.
    ///
    /// A length mismatch is rejected without looking at the bytes; an empty
    /// tag never verifies.
    #[must_use]
    pub fn verify(&self, expected: &[u8]) -> bool {
        !self.is_empty() && bool::from(self.as_bytes().ct_eq(expected))
    }
}

impl Default for MacTag {
    fn default() -> Self {
        Self::empty()
    }
}

impl AsRef<[u8]> for MacTag {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacTag(")?;
        for b in self.as_bytes() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Validation failure for a cipher or MAC request.
///
/// Every buffer of a request is validated before any of them is processed, so
/// an error means no output was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZucError {
    /// Key pointer was null.
    NullKey,
    /// IV pointer was null.
    NullIv,
    /// Source buffer pointer was null.
    NullSource,
    /// Destination buffer pointer was null.
    NullDestination,
    /// Tag output pointer was null.
    NullAuthOutput,
    /// Cipher length outside `[ZUC_MIN_BYTELEN, ZUC_MAX_BYTELEN]`.
    CipherLengthOutOfRange,
    /// MAC length outside `[ZUC_MIN_BITLEN, ZUC_MAX_BITLEN]`.
    AuthLengthOutOfRange,
    /// Slice lengths disagree (destination vs source, message vs bit length,
    /// or tag slots vs jobs).
    BufferLengthMismatch,
    /// Tag size other than 4, 8, 16 or 32 bytes.
    InvalidTagSize,
}

impl ZucError {
    /// Numeric code used by the C API.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::NullKey => 1,
            Self::NullIv => 2,
            Self::NullSource => 3,
            Self::NullDestination => 4,
            Self::NullAuthOutput => 5,
            Self::CipherLengthOutOfRange => 6,
            Self::AuthLengthOutOfRange => 7,
            Self::BufferLengthMismatch => 8,
            Self::InvalidTagSize => 9,
        }
    }

    /// Inverse of [`ZucError::code`].
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::NullKey,
            2 => Self::NullIv,
            3 => Self::NullSource,
            4 => Self::NullDestination,
            5 => Self::NullAuthOutput,
            6 => Self::CipherLengthOutOfRange,
            7 => Self::AuthLengthOutOfRange,
            8 => Self::BufferLengthMismatch,
            9 => Self::InvalidTagSize,
            _ => return None,
        })
    }

    /// NUL-terminated description, shared by `Display` and the C API.
    pub(crate) const fn c_message(self) -> &'static CStr {
        match self {
            Self::NullKey => c"null key pointer",
            Self::NullIv => c"null IV pointer",
            Self::NullSource => c"null source pointer",
            Self::NullDestination => c"null destination pointer",
            Self::NullAuthOutput => c"null tag output pointer",
            Self::CipherLengthOutOfRange => c"cipher length must be between 1 and 8188 bytes",
            Self::AuthLengthOutOfRange => c"message length must be between 1 and 65504 bits",
            Self::BufferLengthMismatch => c"buffer lengths do not match",
            Self::InvalidTagSize => c"tag size must be 4, 8, 16 or 32 bytes",
        }
    }

    pub(crate) fn message(self) -> &'static str {
        self.c_message().to_str().unwrap_or_default()
    }
}

impl fmt::Display for ZucError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(feature = "std")]
impl error::Error for ZucError {}

/// Error for a forced backend the CPU cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuFeatureError {
    missing: &'static str,
}

impl CpuFeatureError {
    /// Create a new `CpuFeatureError` describing the missing CPU feature.
    pub const fn new(missing: &'static str) -> Self {
        Self { missing }
    }

    /// Name of the missing feature.
    #[must_use]
    pub const fn missing(&self) -> &'static str {
        self.missing
    }
}

impl fmt::Display for CpuFeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU feature '{}' required by the selected backend. \
             The portable backend runs everywhere.",
            self.missing
        )
    }
}

#[cfg(feature = "std")]
impl error::Error for CpuFeatureError {}

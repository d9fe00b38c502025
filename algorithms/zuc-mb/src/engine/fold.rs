//! MAC Folding
//!
//! Folds message bits into a tag accumulator against a sliding keystream
//! window. The window holds 16 words: the current round plus lookahead.
//! Message bits are read most significant first.

/// Keystream words held per lane.
pub const WINDOW_WORDS: usize = 16;

/// A lane's keystream window.
pub type Window = [u32; WINDOW_WORDS];

/// Final-step rule of the MAC being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacVariant {
    /// EIA3: the word after the message window is XORed in as well.
    Eia3,
    /// ZUC-256 MAC: only the window at the message end.
    Zuc256,
}

/// 32 keystream bits starting at bit offset `bit`.
#[inline(always)]
pub fn word_at_bit(keystream: &[u32], bit: usize) -> u32 {
    let index = bit / 32;
    let shift = bit % 32;
    if shift == 0 {
        keystream[index]
    } else {
        (keystream[index] << shift) | (keystream[index + 1] >> (32 - shift))
    }
}

/// XOR the tag-sized window at `bit` into `tag` when `set` is 1.
#[inline(always)]
fn fold_bit(tag: &mut [u32], keystream: &[u32], bit: usize, set: u32) {
    let mask = 0u32.wrapping_sub(set);
    for (j, t) in tag.iter_mut().enumerate() {
        *t ^= word_at_bit(keystream, bit + 32 * j) & mask;
    }
}

#[inline(always)]
fn message_bit(message: &[u8], bit: usize) -> u32 {
    u32::from((message[bit / 8] >> (7 - bit % 8)) & 1)
}

/// Fold one full 256-bit block, then slide the window by one round.
///
/// The window must hold at least `8 + tag.len()` valid words.
pub fn fold_round(tag: &mut [u32], window: &mut Window, block: &[u8]) {
    debug_assert!(block.len() >= 32);
    for bit in 0..256 {
        fold_bit(tag, window, bit, message_bit(block, bit));
    }
    window.copy_within(8.., 0);
}

/// Fold the last `bits` (< 256) message bits and apply the final step.
pub fn fold_remainder(
    tag: &mut [u32],
    window: &Window,
    tail: &[u8],
    bits: usize,
    variant: MacVariant,
) {
    debug_assert!(bits < 256);
    for bit in 0..bits {
        fold_bit(tag, window, bit, message_bit(tail, bit));
    }
    fold_bit(tag, window, bits, 1);
    if variant == MacVariant::Eia3 {
        tag[0] ^= window[bits.div_ceil(32) + 1];
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! ZUC-256 MAC Batch Driver
//!
//! Variable-length tags (4, 8, 16 or 32 bytes). The first `tag_size` bytes of
//! keystream seed each lane's accumulator; message bits then fold tag-wide
//! keystream windows in.

use core::array;

use zeroize::Zeroizing;

use super::fold::{fold_remainder, fold_round, MacVariant, Window, WINDOW_WORDS};
use super::scheduler::{BatchSchedule, LaneSource};
use crate::job::Auth256Job;
use crate::kernels::{portable, Keystream, KeystreamChunk};
use crate::state::VectorState;
use crate::types::{MacTag, TagSize, ROUND_BITS, ROUND_WORDS};

const ROUND: usize = ROUND_BITS as usize;

/// Accumulator words, enough for the longest tag.
type Accumulator = [u32; ROUND_WORDS];

const fn tag_chunk(tag_size: TagSize) -> KeystreamChunk {
    KeystreamChunk::covering(tag_size.bytes())
}

// =============================================================================
// BATCH
// =============================================================================

/// Tags for every `Some` lane. Jobs must already be validated.
pub fn mac256_lanes<const N: usize>(
    kernel: &dyn Keystream<N>,
    jobs: &[Option<&Auth256Job<'_>>; N],
    tag_size: TagSize,
) -> [Option<MacTag>; N] {
    let lengths: [_; N] = array::from_fn(|i| jobs[i].map(|job| job.length_bits as usize));
    let Some(mut schedule) = BatchSchedule::new(lengths, ROUND) else {
        return [None; N];
    };
    let tag_words = tag_size.words();

    let mut state = VectorState::<N>::new();
    for (lane, job) in jobs.iter().enumerate() {
        if let Some(job) = job {
            state.insert_lane(lane, &job.load(tag_size));
        }
    }
    kernel.initialize(&mut state);

    let mut keystream = Zeroizing::new([[0u32; ROUND_WORDS]; N]);
    let mut windows = Zeroizing::new([[0u32; WINDOW_WORDS]; N]);
    let mut tags = Zeroizing::new([[0u32; ROUND_WORDS]; N]);

    kernel.generate(&mut state, tag_chunk(tag_size), &mut keystream);
    for (tag, words) in tags.iter_mut().zip(keystream.iter()) {
        tag[..tag_words].copy_from_slice(&words[..tag_words]);
    }
    kernel.generate(&mut state, KeystreamChunk::Bytes32, &mut keystream);
    for (window, words) in windows.iter_mut().zip(keystream.iter()) {
        window[..ROUND_WORDS].copy_from_slice(words);
    }

    for round in 0..schedule.common_rounds() {
        // Lanes ending exactly here need only one tag of lookahead.
        let chunk = if schedule.is_exact_final(round) {
            tag_chunk(tag_size)
        } else {
            KeystreamChunk::Bytes32
        };
        kernel.generate(&mut state, chunk, &mut keystream);
        let offset = schedule.consumed() / 8;
        let lanes = jobs.iter().zip(windows.iter_mut()).zip(keystream.iter()).zip(tags.iter_mut());
        for (((job, window), words), tag) in lanes {
            if let Some(job) = job {
                window[ROUND_WORDS..ROUND_WORDS + chunk.words()]
                    .copy_from_slice(&words[..chunk.words()]);
                fold_round(&mut tag[..tag_words], window, &job.message[offset..]);
            }
        }
        schedule.advance();
    }

    let consumed = schedule.consumed();
    array::from_fn(|lane| {
        let job = jobs[lane]?;
        let mut source = LaneSource::column(&state, lane);
        let remaining = job.length_bits as usize - consumed;
        finish_lane(
            &mut tags[lane],
            &mut windows[lane],
            &mut source,
            job.message,
            consumed,
            remaining,
            tag_size,
        );
        Some(MacTag::from_words(&tags[lane], tag_size))
    })
}

// =============================================================================
// SINGLE LANE
// =============================================================================

/// Finish one lane whose window holds 8 valid words for bit `offset`.
///
/// `need` counts the keystream words still required past the window; the
/// state is only pulled from the vector when it is non-zero.
pub(crate) fn finish_lane<const N: usize>(
    tag: &mut Accumulator,
    window: &mut Window,
    source: &mut LaneSource<'_, N>,
    message: &[u8],
    mut offset: usize,
    mut remaining: usize,
    tag_size: TagSize,
) {
    let tag = &mut tag[..tag_size.words()];
    let tag_bits = tag_size.bits() as usize;
    let mut need = (remaining + tag_bits).div_ceil(32).saturating_sub(ROUND_WORDS);

    while remaining >= ROUND {
        let words = need.min(ROUND_WORDS);
        source.generate(&mut window[ROUND_WORDS..ROUND_WORDS + words]);
        need -= words;
        fold_round(tag, window, &message[offset / 8..]);
        offset += ROUND;
        remaining -= ROUND;
    }
    if need > 0 {
        source.generate(&mut window[ROUND_WORDS..ROUND_WORDS + need]);
    }
    fold_remainder(tag, window, &message[offset / 8..], remaining, MacVariant::Zuc256);
}

/// One message on the scalar primitive.
pub fn mac256_one(job: &Auth256Job<'_>, tag_size: TagSize) -> MacTag {
    let mut state = job.load(tag_size);
    portable::initialize(&mut state);
    let mut source = LaneSource::<1>::scalar(state);

    let mut tag = Zeroizing::new([0u32; ROUND_WORDS]);
    source.generate(&mut tag[..tag_size.words()]);
    let mut window = Zeroizing::new([0u32; WINDOW_WORDS]);
    source.generate(&mut window[..ROUND_WORDS]);

    finish_lane(
        &mut tag,
        &mut window,
        &mut source,
        job.message,
        0,
        job.length_bits as usize,
        tag_size,
    );
    MacTag::from_words(&tag[..], tag_size)
}

//! EIA3 Batch Driver
//!
//! 32-bit MAC over up to N messages. Each lane keeps a 16-word keystream
//! window; a round folds 256 message bits and slides the window by 8 words.

use core::array;

use zeroize::Zeroizing;

use super::fold::{fold_remainder, fold_round, MacVariant, Window, WINDOW_WORDS};
use super::scheduler::{BatchSchedule, LaneSource};
use crate::job::AuthJob;
use crate::kernels::{portable, Keystream, KeystreamChunk};
use crate::state::{LaneState, VectorState};
use crate::types::{ROUND_BITS, ROUND_WORDS};

const ROUND: usize = ROUND_BITS as usize;

/// Keystream needed past the current window before the final fold.
const LOOKAHEAD_THRESHOLD: usize = 192;

// =============================================================================
// BATCH
// =============================================================================

/// Tags for every `Some` lane. Jobs must already be validated.
pub fn eia3_lanes<const N: usize>(
    kernel: &dyn Keystream<N>,
    jobs: &[Option<&AuthJob<'_>>; N],
) -> [Option<u32>; N] {
    let lengths: [_; N] = array::from_fn(|i| jobs[i].map(|job| job.length_bits as usize));
    let Some(mut schedule) = BatchSchedule::new(lengths, ROUND) else {
        return [None; N];
    };

    let mut state = VectorState::<N>::new();
    for (lane, job) in jobs.iter().enumerate() {
        if let Some(job) = job {
            state.insert_lane(lane, &LaneState::load_128(job.key, job.iv));
        }
    }
    kernel.initialize(&mut state);

    let mut keystream = Zeroizing::new([[0u32; ROUND_WORDS]; N]);
    let mut windows = Zeroizing::new([[0u32; WINDOW_WORDS]; N]);
    let mut tags = [0u32; N];

    kernel.generate(&mut state, KeystreamChunk::Bytes32, &mut keystream);
    for (window, words) in windows.iter_mut().zip(keystream.iter()) {
        window[..ROUND_WORDS].copy_from_slice(words);
    }

    for round in 0..schedule.common_rounds() {
        // Lanes ending exactly here only need two more words.
        let chunk = if schedule.is_exact_final(round) {
            KeystreamChunk::Bytes8
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
                fold_round(core::slice::from_mut(tag), window, &job.message[offset..]);
            }
        }
        schedule.advance();
    }

    let consumed = schedule.consumed();
    array::from_fn(|lane| {
        let job = jobs[lane]?;
        let mut source = LaneSource::column(&state, lane);
        let remaining = job.length_bits as usize - consumed;
        Some(finish_lane(
            tags[lane],
            &mut windows[lane],
            &mut source,
            job.message,
            consumed,
            remaining,
        ))
    })
}

// =============================================================================
// SINGLE LANE
// =============================================================================

/// Finish one lane whose window holds 8 valid words for bit `offset`.
///
/// The state is only pulled from the vector if the lane needs keystream past
/// its window.
pub(crate) fn finish_lane<const N: usize>(
    mut tag: u32,
    window: &mut Window,
    source: &mut LaneSource<'_, N>,
    message: &[u8],
    mut offset: usize,
    mut remaining: usize,
) -> u32 {
    let tag = core::slice::from_mut(&mut tag);
    while remaining >= ROUND {
        remaining -= ROUND;
        let words = if remaining == 0 { 2 } else { ROUND_WORDS };
        source.generate(&mut window[ROUND_WORDS..ROUND_WORDS + words]);
        fold_round(tag, window, &message[offset / 8..]);
        offset += ROUND;
    }
    if remaining > LOOKAHEAD_THRESHOLD {
        source.generate(&mut window[ROUND_WORDS..ROUND_WORDS + 2]);
    }
    fold_remainder(tag, window, &message[offset / 8..], remaining, MacVariant::Eia3);
    tag[0]
}

/// One message on the scalar primitive.
pub fn eia3_one(job: &AuthJob<'_>) -> u32 {
    let mut state = LaneState::load_128(job.key, job.iv);
    portable::initialize(&mut state);
    let mut source = LaneSource::<1>::scalar(state);
    let mut window = Zeroizing::new([0u32; WINDOW_WORDS]);
    source.generate(&mut window[..ROUND_WORDS]);
    finish_lane(0, &mut window, &mut source, job.message, 0, job.length_bits as usize)
}

//! Cipher Batch Driver
//!
//! XORs keystream into up to N buffers. Lanes advance together for as long as
//! every active buffer has a full round left; each lane then finishes alone on
//! its extracted scalar state.

use core::array;

use zeroize::Zeroizing;

use super::scheduler::{BatchSchedule, LaneSource};
use crate::job::{CipherJob, LaneData};
use crate::kernels::{portable, Keystream, KeystreamChunk};
use crate::state::VectorState;
use crate::types::{ROUND_BYTES, ROUND_WORDS};

/// Serialise keystream words big-endian.
#[inline]
pub(crate) fn write_words(words: &[u32], out: &mut [u8]) {
    for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}

// =============================================================================
// BATCH
// =============================================================================

/// Encrypt/decrypt every `Some` lane. Jobs must already be validated.
pub fn encrypt_lanes<const N: usize>(
    kernel: &dyn Keystream<N>,
    lanes: &mut [Option<&mut CipherJob<'_>>; N],
) {
    let lengths: [_; N] = array::from_fn(|i| lanes[i].as_ref().map(|job| job.len()));
    let Some(mut schedule) = BatchSchedule::new(lengths, ROUND_BYTES) else {
        return;
    };

    let mut state = VectorState::<N>::new();
    for (lane, job) in lanes.iter().enumerate() {
        if let Some(job) = job {
            state.insert_lane(lane, &job.key.load());
        }
    }
    kernel.initialize(&mut state);

    let mut keystream = Zeroizing::new([[0u32; ROUND_WORDS]; N]);
    let mut block = Zeroizing::new([0u8; ROUND_BYTES]);

    for _ in 0..schedule.common_rounds() {
        kernel.generate(&mut state, KeystreamChunk::Bytes32, &mut keystream);
        let offset = schedule.consumed();
        for (job, words) in lanes.iter_mut().zip(keystream.iter()) {
            if let Some(job) = job {
                write_words(words, &mut block[..]);
                job.data.apply(offset, &block[..]);
            }
        }
        schedule.advance();
    }

    let offset = schedule.consumed();
    let tail = schedule.common() - offset;

    // Equal lengths: finish the short tail in the vector.
    if schedule.all_equal() {
        if tail > 0 {
            let chunk = KeystreamChunk::covering(tail);
            kernel.generate(&mut state, chunk, &mut keystream);
            for (job, words) in lanes.iter_mut().zip(keystream.iter()) {
                if let Some(job) = job {
                    write_words(&words[..chunk.words()], &mut block[..chunk.bytes()]);
                    job.data.apply(offset, &block[..tail]);
                }
            }
        }
        return;
    }

    for (lane, job) in lanes.iter_mut().enumerate() {
        if let Some(job) = job {
            if job.len() > offset {
                let mut source = LaneSource::column(&state, lane);
                finish_lane(&mut source, &mut job.data, offset);
            }
        }
    }
}

// =============================================================================
// SINGLE LANE
// =============================================================================

/// Continue one lane from `offset` to the end of its buffer.
///
/// Full rounds first, then exactly `ceil(remaining / 4)` words for the tail.
pub(crate) fn finish_lane<const N: usize>(
    source: &mut LaneSource<'_, N>,
    data: &mut LaneData<'_>,
    mut offset: usize,
) {
    let len = data.len();
    let mut words = Zeroizing::new([0u32; ROUND_WORDS]);
    let mut block = Zeroizing::new([0u8; ROUND_BYTES]);
    while offset < len {
        let take = (len - offset).min(ROUND_BYTES);
        let count = take.div_ceil(4);
        source.generate(&mut words[..count]);
        write_words(&words[..count], &mut block[..count * 4]);
        data.apply(offset, &block[..take]);
        offset += take;
    }
}

/// One buffer on the scalar primitive.
pub fn encrypt_one(job: &mut CipherJob<'_>) {
    let mut state = job.key.load();
    portable::initialize(&mut state);
    let mut source = LaneSource::<1>::scalar(state);
    finish_lane(&mut source, &mut job.data, 0);
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use zuc_mb::{Auth256Job, MacTag, TagSize};

fuzz_target!(|data: &[u8]| {
    // =============================================================================
    // PREPARATION
    // =============================================================================

    if data.len() < 59 {
        return;
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&data[..32]);
    let mut iv = [0u8; 25];
    iv.copy_from_slice(&data[32..57]);
    let tag_size = TagSize::ALL[usize::from(data[57] & 3)];
    let message = &data[58..];
    let max_bits = (message.len() * 8).min(zuc_mb::ZUC_MAX_BITLEN as usize);

    // =============================================================================
    // BATCH VS SINGLE
    // =============================================================================

    let bits: Vec<u32> = (0..8).map(|i| (max_bits - (i * 61) % max_bits) as u32).collect();
    let jobs: Vec<_> = bits.iter().map(|&b| Auth256Job::new(&key, &iv, message, b)).collect();
    let mut tags = vec![MacTag::empty(); jobs.len()];
    assert!(zuc_mb::eia3_256_n(&jobs, tag_size, &mut tags).is_ok());

    for (tag, &b) in tags.iter().zip(&bits) {
        assert_eq!(Ok(*tag), zuc_mb::eia3_256(&key, &iv, message, b, tag_size));
    }
});

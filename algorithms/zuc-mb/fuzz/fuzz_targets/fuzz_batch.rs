#![no_main]

use libfuzzer_sys::fuzz_target;
use zuc_mb::CipherJob;

fuzz_target!(|data: &[u8]| {
    // =============================================================================
    // PREPARATION
    // =============================================================================

    if data.len() < 34 {
        return;
    }
    let mut key = [0u8; 16];
    key.copy_from_slice(&data[..16]);
    let mut iv = [0u8; 16];
    iv.copy_from_slice(&data[16..32]);
    let count = 1 + usize::from(data[32] % 16);
    let body = &data[33..];
    let body = &body[..body.len().min(zuc_mb::ZUC_MAX_BYTELEN)];

    // =============================================================================
    // BATCH VS SINGLE
    // =============================================================================

    let lens: Vec<usize> = (0..count).map(|i| body.len() - (i * 13) % body.len()).collect();
    let mut outputs: Vec<Vec<u8>> = lens.iter().map(|&l| vec![0u8; l]).collect();
    let mut jobs: Vec<_> = outputs
        .iter_mut()
        .zip(&lens)
        .map(|(out, &l)| CipherJob::new(&key, &iv, &body[..l], out))
        .collect();
    assert!(zuc_mb::eea3_n(&mut jobs).is_ok());
    drop(jobs);

    for (out, &l) in outputs.iter().zip(&lens) {
        let mut single = body[..l].to_vec();
        assert!(zuc_mb::eea3_in_place(&key, &iv, &mut single).is_ok());
        assert_eq!(out, &single, "Batch/single mismatch at length {l}");
    }
});

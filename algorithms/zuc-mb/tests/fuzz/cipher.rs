use bolero::check;
use zuc_mb::{CipherJob, ZUC_MAX_BYTELEN};

#[test]
fn fuzz_batch_matches_single() {
    check!().with_type::<Vec<u8>>().for_each(|data| {
        if data.len() < 33 {
            return;
        }
        // =============================================================================
        // PREPARATION
        // =============================================================================

        // Lane count and per-lane lengths come from the head of the input
        let mut key = [0u8; 16];
        key.copy_from_slice(&data[..16]);
        let mut iv = [0u8; 16];
        iv.copy_from_slice(&data[16..32]);
        let count = 1 + usize::from(data[32] % 20);
        let body = &data[33..];
        if body.is_empty() {
            return;
        }
        let lens: Vec<usize> = (0..count)
            .map(|i| 1 + (usize::from(body[i % body.len()]) * 7 + i) % body.len().min(ZUC_MAX_BYTELEN))
            .collect();

        // =============================================================================
        // BATCH VS SINGLE
        // =============================================================================

        let mut outputs: Vec<Vec<u8>> = lens.iter().map(|&l| vec![0u8; l]).collect();
        let mut jobs: Vec<_> = outputs
            .iter_mut()
            .zip(&lens)
            .map(|(out, &l)| CipherJob::new(&key, &iv, &body[..l], out))
            .collect();
        zuc_mb::eea3_n(&mut jobs).unwrap();
        drop(jobs);

        for (out, &l) in outputs.iter().zip(&lens) {
            let mut single = vec![0u8; l];
            zuc_mb::eea3(&key, &iv, &body[..l], &mut single).unwrap();
            assert_eq!(out, &single, "Batch mismatch at length {l}");

            // Decrypting restores the input
            zuc_mb::eea3_in_place(&key, &iv, &mut single).unwrap();
            assert_eq!(single, &body[..l]);
        }
    });
}

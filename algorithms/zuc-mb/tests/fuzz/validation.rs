use bolero::check;
use zuc_mb::{AuthJob, CipherJob, ZucError, ZUC_MAX_BITLEN, ZUC_MAX_BYTELEN};

#[test]
fn fuzz_validation_is_all_or_nothing() {
    check!().with_type::<(Vec<u16>, u8)>().for_each(|(lens, seed)| {
        if lens.is_empty() {
            return;
        }
        // =============================================================================
        // CIPHER
        // =============================================================================

        let key = [*seed; 16];
        let iv = [seed.wrapping_add(1); 16];
        let lens: Vec<usize> = lens.iter().take(24).map(|&l| usize::from(l) % (ZUC_MAX_BYTELEN + 2)).collect();
        let mut bufs: Vec<Vec<u8>> = lens.iter().map(|&l| vec![*seed; l]).collect();
        let before = bufs.clone();
        let first_bad = lens.iter().position(|&l| l == 0 || l > ZUC_MAX_BYTELEN);

        let mut jobs: Vec<_> = bufs.iter_mut().map(|b| CipherJob::in_place(&key, &iv, b)).collect();
        let result = zuc_mb::eea3_n(&mut jobs);
        drop(jobs);
        match first_bad {
            Some(_) => {
                assert_eq!(result, Err(ZucError::CipherLengthOutOfRange));
                assert_eq!(bufs, before, "Buffers touched after failed validation");
            }
            None => assert_eq!(result, Ok(())),
        }

        // =============================================================================
        // MAC
        // =============================================================================

        let message = [0u8; 8200];
        let bits: Vec<u32> = lens.iter().map(|&l| (l * 8) as u32).collect();
        let jobs: Vec<_> = bits.iter().map(|&b| AuthJob::new(&key, &iv, &message, b)).collect();
        let mut tags = vec![0x5555_5555u32; jobs.len()];
        let result = zuc_mb::eia3_n(&jobs, &mut tags);
        if bits.iter().any(|&b| b == 0 || b > ZUC_MAX_BITLEN) {
            assert!(result.is_err());
            assert!(tags.iter().all(|&t| t == 0x5555_5555));
        } else {
            assert_eq!(result, Ok(()));
        }
    });
}

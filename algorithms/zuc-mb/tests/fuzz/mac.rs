use bolero::check;
use zuc_mb::{Auth256Job, AuthJob, MacTag, TagSize};

#[test]
fn fuzz_mac_batch_and_verify() {
    check!().with_type::<Vec<u8>>().for_each(|data| {
        if data.len() < 58 {
            return;
        }
        // =============================================================================
        // PREPARATION
        // =============================================================================

        let mut key = [0u8; 32];
        key.copy_from_slice(&data[..32]);
        let mut iv = [0u8; 25];
        iv.copy_from_slice(&data[32..57]);
        let tag_size = TagSize::ALL[usize::from(data[57] & 3)];
        let message = &data[58..];
        if message.is_empty() {
            return;
        }
        let max_bits = (message.len() * 8).min(zuc_mb::ZUC_MAX_BITLEN as usize);
        let bits: Vec<u32> = (0..9).map(|i| (1 + (i * 97 + message.len()) % max_bits) as u32).collect();

        // =============================================================================
        // EIA3 (128-BIT KEY)
        // =============================================================================

        let mut key128 = [0u8; 16];
        key128.copy_from_slice(&key[..16]);
        let mut iv128 = [0u8; 16];
        iv128.copy_from_slice(&iv[..16]);
        let jobs: Vec<_> = bits.iter().map(|&b| AuthJob::new(&key128, &iv128, message, b)).collect();
        let mut tags = vec![0u32; jobs.len()];
        zuc_mb::eia3_n(&jobs, &mut tags).unwrap();
        for (tag, &b) in tags.iter().zip(&bits) {
            assert_eq!(*tag, zuc_mb::eia3(&key128, &iv128, message, b).unwrap());
            assert!(zuc_mb::verify_eia3(&key128, &iv128, message, b, *tag));
        }

        // =============================================================================
        // ZUC-256 MAC
        // =============================================================================

        let jobs: Vec<_> = bits.iter().map(|&b| Auth256Job::new(&key, &iv, message, b)).collect();
        let mut tags = vec![MacTag::empty(); jobs.len()];
        zuc_mb::eia3_256_n(&jobs, tag_size, &mut tags).unwrap();
        for (tag, &b) in tags.iter().zip(&bits) {
            assert_eq!(tag.len(), tag_size.bytes());
            assert!(zuc_mb::verify_eia3_256(&key, &iv, message, b, tag.as_bytes()));

            let mut forged = tag.as_bytes().to_vec();
            forged[0] ^= 0x01;
            assert!(!zuc_mb::verify_eia3_256(&key, &iv, message, b, &forged));
        }
    });
}

//! 3GPP IV Construction
//!
//! Builds the 16-byte ZUC-128 IVs of 128-EEA3 and 128-EIA3 from COUNT,
//! BEARER and DIRECTION.

use crate::types::Iv128;

/// IV for 128-EEA3.
///
/// `bearer` uses its low 5 bits, `direction` its low bit.
#[must_use]
pub fn eea3_iv(count: u32, bearer: u8, direction: u8) -> Iv128 {
    let mut iv = [0u8; 16];
    iv[..4].copy_from_slice(&count.to_be_bytes());
    iv[4] = ((bearer & 0x1F) << 3) | ((direction & 0x01) << 2);
    let (head, tail) = iv.split_at_mut(8);
    tail.copy_from_slice(head);
    iv
}

/// IV for 128-EIA3.
///
/// The second half repeats the first with DIRECTION folded into bytes 8
/// and 14.
#[must_use]
pub fn eia3_iv(count: u32, bearer: u8, direction: u8) -> Iv128 {
    let mut iv = [0u8; 16];
    iv[..4].copy_from_slice(&count.to_be_bytes());
    iv[4] = (bearer & 0x1F) << 3;
    let (head, tail) = iv.split_at_mut(8);
    tail.copy_from_slice(head);
    let dir = (direction & 0x01) << 7;
    iv[8] ^= dir;
    iv[14] ^= dir;
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eea3_iv_layout() {
        let iv = eea3_iv(0x1234_5678, 0x15, 1);
        assert_eq!(&iv[..8], &[0x12, 0x34, 0x56, 0x78, 0xAC, 0, 0, 0]);
        assert_eq!(&iv[..8], &iv[8..]);
    }

    #[test]
    fn test_eia3_iv_direction_bits() {
        let up = eia3_iv(0x1234_5678, 0x15, 0);
        let down = eia3_iv(0x1234_5678, 0x15, 1);
        assert_eq!(&up[..8], &up[8..]);
        assert_eq!(down[8], up[8] ^ 0x80);
        assert_eq!(down[14], 0x80);
        assert_eq!(up[4], 0xA8);
    }
}

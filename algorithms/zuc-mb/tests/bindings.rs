//! C-API Tests
//!
//! Drives the `extern "C"` surface the way a C caller would: raw pointers,
//! parallel arrays and the thread-local error indicator.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used)]
#![allow(unsafe_code)]

use std::ffi::CStr;
use std::ptr;

use zuc_mb::ffi::{
    zuc256_eia3_1_buffer, zuc256_eia3_8_buffer_job, zuc_eea3_1_buffer, zuc_eea3_n_buffer,
    zuc_eia3_1_buffer, zuc_eia3_n_buffer, zuc_mb_backend_name, zuc_mb_errno, zuc_mb_strerror,
    ZucMac256Job,
};
use zuc_mb::{TagSize, ZucError};

static KEY: [u8; 16] = [0x17; 16];
static IV: [u8; 16] = [0x3d; 16];

// =============================================================================
// EEA3
// =============================================================================

#[test]
fn test_eea3_1_buffer_matches_rust_api() {
    let src = [0x6Cu8; 77];
    let mut dst = [0u8; 77];
    let code = unsafe {
        zuc_eea3_1_buffer(KEY.as_ptr(), IV.as_ptr(), src.as_ptr(), dst.as_mut_ptr(), 77)
    };
    assert_eq!(code, 0);
    assert_eq!(zuc_mb_errno(), 0);

    let mut expected = [0u8; 77];
    zuc_mb::eea3(&KEY, &IV, &src, &mut expected).unwrap();
    assert_eq!(dst, expected);

    // src == dst runs in place
    let mut buf = src;
    let p = buf.as_mut_ptr();
    assert_eq!(unsafe { zuc_eea3_1_buffer(KEY.as_ptr(), IV.as_ptr(), p, p, 77) }, 0);
    assert_eq!(buf, expected);
}

#[test]
fn test_null_checks_follow_argument_order() {
    let src = [0u8; 8];
    let mut dst = [0u8; 8];
    let cases = [
        (ptr::null(), ptr::null(), ZucError::NullKey),
        (KEY.as_ptr(), ptr::null(), ZucError::NullIv),
    ];
    for (key, iv, err) in cases {
        let code = unsafe { zuc_eea3_1_buffer(key, iv, src.as_ptr(), dst.as_mut_ptr(), 8) };
        assert_eq!(code, err.code());
        assert_eq!(zuc_mb_errno(), err.code());
    }
    let code = unsafe { zuc_eea3_1_buffer(KEY.as_ptr(), IV.as_ptr(), ptr::null(), ptr::null_mut(), 0) };
    assert_eq!(code, ZucError::NullSource.code());
    let code = unsafe { zuc_eea3_1_buffer(KEY.as_ptr(), IV.as_ptr(), src.as_ptr(), ptr::null_mut(), 0) };
    assert_eq!(code, ZucError::NullDestination.code());
    let code = unsafe { zuc_eea3_1_buffer(KEY.as_ptr(), IV.as_ptr(), src.as_ptr(), dst.as_mut_ptr(), 0) };
    assert_eq!(code, ZucError::CipherLengthOutOfRange.code());
    assert_eq!(dst, [0u8; 8]);
}

#[test]
fn test_eea3_n_buffer_fails_fast() {
    let srcs: Vec<Vec<u8>> = (0..8).map(|i| vec![i as u8; 40 + i]).collect();
    let mut dsts: Vec<Vec<u8>> = srcs.iter().map(|s| vec![0u8; s.len()]).collect();
    let keys = [KEY.as_ptr(); 8];
    let ivs = [IV.as_ptr(); 8];
    let src_ptrs: Vec<*const u8> = srcs.iter().map(|s| s.as_ptr()).collect();
    let dst_ptrs: Vec<*mut u8> = dsts.iter_mut().map(|d| d.as_mut_ptr()).collect();
    let mut lens: Vec<u32> = srcs.iter().map(|s| s.len() as u32).collect();

    lens[5] = 0;
    let code = unsafe {
        zuc_eea3_n_buffer(keys.as_ptr(), ivs.as_ptr(), src_ptrs.as_ptr(), dst_ptrs.as_ptr(), lens.as_ptr(), 8)
    };
    assert_eq!(code, ZucError::CipherLengthOutOfRange.code());
    assert!(dsts.iter().all(|d| d.iter().all(|&b| b == 0)));

    lens[5] = 45;
    let code = unsafe {
        zuc_eea3_n_buffer(keys.as_ptr(), ivs.as_ptr(), src_ptrs.as_ptr(), dst_ptrs.as_ptr(), lens.as_ptr(), 8)
    };
    assert_eq!(code, 0);
    for (src, dst) in srcs.iter().zip(&dsts) {
        let mut expected = vec![0u8; src.len()];
        zuc_mb::eea3(&KEY, &IV, src, &mut expected).unwrap();
        assert_eq!(dst, &expected);
    }
}

// =============================================================================
// EIA3
// =============================================================================

#[test]
fn test_eia3_buffers() {
    let msg = [0xA5u8; 64];
    let mut tag = 0u32;
    let code = unsafe { zuc_eia3_1_buffer(KEY.as_ptr(), IV.as_ptr(), msg.as_ptr(), 500, &mut tag) };
    assert_eq!(code, 0);
    assert_eq!(tag, zuc_mb::eia3(&KEY, &IV, &msg, 500).unwrap());

    let code = unsafe { zuc_eia3_1_buffer(KEY.as_ptr(), IV.as_ptr(), msg.as_ptr(), 500, ptr::null_mut()) };
    assert_eq!(code, ZucError::NullAuthOutput.code());
    let code = unsafe { zuc_eia3_1_buffer(KEY.as_ptr(), IV.as_ptr(), msg.as_ptr(), 65505, &mut tag) };
    assert_eq!(code, ZucError::AuthLengthOutOfRange.code());

    let keys = [KEY.as_ptr(); 11];
    let ivs = [IV.as_ptr(); 11];
    let msgs = [msg.as_ptr(); 11];
    let bits: Vec<u32> = (0..11).map(|i| 100 + 37 * i).collect();
    let mut tags = [0u32; 11];
    let code = unsafe {
        zuc_eia3_n_buffer(keys.as_ptr(), ivs.as_ptr(), msgs.as_ptr(), bits.as_ptr(), tags.as_mut_ptr(), 11)
    };
    assert_eq!(code, 0);
    for (tag, &b) in tags.iter().zip(&bits) {
        assert_eq!(*tag, zuc_mb::eia3(&KEY, &IV, &msg, b).unwrap());
    }
}

// =============================================================================
// ZUC-256 MAC
// =============================================================================

#[test]
fn test_zuc256_mac_buffers() {
    let key = [0x01u8; 32];
    let iv = [0x02u8; 25];
    let msg = [0x33u8; 100];
    let mut tag = [0u8; 16];
    let code = unsafe { zuc256_eia3_1_buffer(key.as_ptr(), iv.as_ptr(), msg.as_ptr(), 800, tag.as_mut_ptr(), 16) };
    assert_eq!(code, 0);
    let expected = zuc_mb::eia3_256(&key, &iv, &msg, 800, TagSize::B16).unwrap();
    assert_eq!(&tag[..], expected.as_bytes());

    let code = unsafe { zuc256_eia3_1_buffer(key.as_ptr(), iv.as_ptr(), msg.as_ptr(), 800, tag.as_mut_ptr(), 12) };
    assert_eq!(code, ZucError::InvalidTagSize.code());

    let mut outs = [[0u8; 8]; 8];
    let descriptors: Vec<ZucMac256Job> = outs
        .iter_mut()
        .enumerate()
        .map(|(i, out)| ZucMac256Job {
            key: key.as_ptr(),
            iv: iv.as_ptr(),
            message: msg.as_ptr(),
            length_bits: 100 * (i as u32 + 1),
            tag: out.as_mut_ptr(),
        })
        .collect();
    let mut lanes: [*const ZucMac256Job; 8] = [ptr::null(); 8];
    for lane in [0, 1, 4, 7] {
        lanes[lane] = &descriptors[lane];
    }
    let code = unsafe { zuc256_eia3_8_buffer_job(lanes.as_ptr(), 8) };
    assert_eq!(code, 0);
    for (lane, out) in outs.iter().enumerate() {
        if lanes[lane].is_null() {
            assert_eq!(out, &[0u8; 8], "inactive lane {lane} written");
        } else {
            let bits = 100 * (lane as u32 + 1);
            let expected = zuc_mb::eia3_256(&key, &iv, &msg, bits, TagSize::B8).unwrap();
            assert_eq!(&out[..], expected.as_bytes());
        }
    }
}

// =============================================================================
// STRINGS
// =============================================================================

#[test]
fn test_static_strings() {
    let name = unsafe { CStr::from_ptr(zuc_mb_backend_name()) };
    assert_eq!(name.to_str().unwrap(), zuc_mb::active_backend());

    let message = unsafe { CStr::from_ptr(zuc_mb_strerror(ZucError::NullKey.code())) };
    assert_eq!(message.to_str().unwrap(), ZucError::NullKey.to_string());
    let unknown = unsafe { CStr::from_ptr(zuc_mb_strerror(1234)) };
    assert_eq!(unknown.to_str().unwrap(), "unknown error");
}

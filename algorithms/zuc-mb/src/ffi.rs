//! C-API Bindings
//!
//! Pointer entry points for C callers. Every call resets the thread-local
//! error indicator, checks pointers and lengths for the whole request before
//! touching any output, and returns the resulting code (0 on success).

#![allow(unsafe_code)]

use std::cell::Cell;
use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use crate::engine::{Backend, Engine};
use crate::job::{Auth256Job, AuthJob, CipherJob};
use crate::oneshot;
use crate::types::{
    Iv128, Iv256, Key128, Key256, TagSize, ZucError, ZUC_MAX_BITLEN, ZUC_MAX_BYTELEN,
    ZUC_MIN_BITLEN, ZUC_MIN_BYTELEN,
};

// =============================================================================
// ERROR INDICATOR
// =============================================================================

/// Returned when a call panicked internally.
pub const ZUC_MB_ERR_PANIC: i32 = -1;

thread_local! {
    static LAST_ERROR: Cell<i32> = const { Cell::new(0) };
}

fn set_errno(code: i32) -> i32 {
    LAST_ERROR.with(|slot| slot.set(code));
    code
}

/// Run `body` behind a panic boundary and record its outcome.
fn guarded(body: impl FnOnce() -> Result<(), ZucError>) -> i32 {
    set_errno(0);
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => 0,
        Ok(Err(err)) => set_errno(err.code()),
        Err(_) => set_errno(ZUC_MB_ERR_PANIC),
    }
}

/// Error code of the last call made on this thread (0 if it succeeded).
#[no_mangle]
pub extern "C" fn zuc_mb_errno() -> i32 {
    LAST_ERROR.with(Cell::get)
}

const fn c_message(code: i32) -> &'static CStr {
    match ZucError::from_code(code) {
        Some(err) => err.c_message(),
        None if code == 0 => c"success",
        None if code == ZUC_MB_ERR_PANIC => c"internal panic",
        None => c"unknown error",
    }
}

/// Static, NUL-terminated description of `code`. Must NOT be freed.
#[no_mangle]
pub extern "C" fn zuc_mb_strerror(code: i32) -> *const c_char {
    c_message(code).as_ptr()
}

/// Static, NUL-terminated name of the backend driving the 8-lane path.
#[no_mangle]
pub extern "C" fn zuc_mb_backend_name() -> *const c_char {
    match Engine::detect().backend() {
        Backend::Portable => c"Portable".as_ptr(),
        Backend::Avx2 => c"AVX2".as_ptr(),
    }
}

// =============================================================================
// POINTER CHECKS
// =============================================================================

/// # Safety
/// A non-null `ptr` must be valid for `N` readable bytes.
unsafe fn fixed<'a, const N: usize>(ptr: *const u8, err: ZucError) -> Result<&'a [u8; N], ZucError> {
    if ptr.is_null() {
        return Err(err);
    }
    // SAFETY: non-null, caller guarantees N readable bytes; align is 1.
    Ok(unsafe { &*ptr.cast::<[u8; N]>() })
}

fn non_null<T>(ptr: *const T, err: ZucError) -> Result<(), ZucError> {
    if ptr.is_null() {
        Err(err)
    } else {
        Ok(())
    }
}

fn cipher_len(len: u32) -> Result<usize, ZucError> {
    let len = len as usize;
    if (ZUC_MIN_BYTELEN..=ZUC_MAX_BYTELEN).contains(&len) {
        Ok(len)
    } else {
        Err(ZucError::CipherLengthOutOfRange)
    }
}

fn auth_len(bits: u32) -> Result<usize, ZucError> {
    if (ZUC_MIN_BITLEN..=ZUC_MAX_BITLEN).contains(&bits) {
        Ok(bits.div_ceil(8) as usize)
    } else {
        Err(ZucError::AuthLengthOutOfRange)
    }
}

/// Build a cipher job; `src == dst` selects in-place mode.
///
/// # Safety
/// Pointers must be valid for their sizes and `len` bytes. `src` and `dst`
/// are either equal or do not overlap.
unsafe fn cipher_job<'a>(
    key: *const u8,
    iv: *const u8,
    src: *const u8,
    dst: *mut u8,
    len: u32,
) -> Result<CipherJob<'a>, ZucError> {
    // SAFETY: forwarded caller contract.
    let key: &Key128 = unsafe { fixed(key, ZucError::NullKey)? };
    // SAFETY: forwarded caller contract.
    let iv: &Iv128 = unsafe { fixed(iv, ZucError::NullIv)? };
    non_null(src, ZucError::NullSource)?;
    non_null(dst, ZucError::NullDestination)?;
    let len = cipher_len(len)?;
    // SAFETY: both pointers are non-null and valid for `len` bytes; the
    // in-place case builds a single mutable slice.
    unsafe {
        if src == dst.cast_const() {
            Ok(CipherJob::in_place(key, iv, slice::from_raw_parts_mut(dst, len)))
        } else {
            Ok(CipherJob::new(
                key,
                iv,
                slice::from_raw_parts(src, len),
                slice::from_raw_parts_mut(dst, len),
            ))
        }
    }
}

/// # Safety
/// Pointers must be valid for their sizes and `ceil(length_bits / 8)` bytes.
/// `tag` is only checked for null.
unsafe fn auth_job<'a, T>(
    key: *const u8,
    iv: *const u8,
    message: *const u8,
    tag: *const T,
    length_bits: u32,
) -> Result<AuthJob<'a>, ZucError> {
    // SAFETY: forwarded caller contract.
    let key: &Key128 = unsafe { fixed(key, ZucError::NullKey)? };
    // SAFETY: forwarded caller contract.
    let iv: &Iv128 = unsafe { fixed(iv, ZucError::NullIv)? };
    non_null(message, ZucError::NullSource)?;
    non_null(tag, ZucError::NullAuthOutput)?;
    let bytes = auth_len(length_bits)?;
    // SAFETY: non-null and valid for `bytes` bytes.
    let message = unsafe { slice::from_raw_parts(message, bytes) };
    Ok(AuthJob::new(key, iv, message, length_bits))
}

/// # Safety
/// Pointers must be valid for their sizes and `ceil(length_bits / 8)` bytes.
unsafe fn auth256_job<'a>(
    key: *const u8,
    iv: *const u8,
    message: *const u8,
    tag: *const u8,
    length_bits: u32,
) -> Result<Auth256Job<'a>, ZucError> {
    // SAFETY: forwarded caller contract.
    let key: &Key256 = unsafe { fixed(key, ZucError::NullKey)? };
    // SAFETY: forwarded caller contract.
    let iv: &Iv256 = unsafe { fixed(iv, ZucError::NullIv)? };
    non_null(message, ZucError::NullSource)?;
    non_null(tag, ZucError::NullAuthOutput)?;
    let bytes = auth_len(length_bits)?;
    // SAFETY: non-null and valid for `bytes` bytes.
    let message = unsafe { slice::from_raw_parts(message, bytes) };
    Ok(Auth256Job::new(key, iv, message, length_bits))
}

/// # Safety
/// A non-null `ptr` must be valid for `count` reads.
unsafe fn array<'a, T>(ptr: *const T, count: u32, err: ZucError) -> Result<&'a [T], ZucError> {
    if count == 0 {
        return Ok(&[]);
    }
    non_null(ptr, err)?;
    // SAFETY: non-null, caller guarantees `count` elements.
    Ok(unsafe { slice::from_raw_parts(ptr, count as usize) })
}

// =============================================================================
// EEA3
// =============================================================================

/// 128-EEA3 over one buffer. `src == dst` encrypts in place.
///
/// # Safety
/// - `key` and `iv` must point to 16 readable bytes each
/// - `src` and `dst` must be valid for `len` bytes and either be equal or not
///   overlap
///
/// # Returns
/// `0` on success, otherwise the error code (also in `zuc_mb_errno`).
#[no_mangle]
pub unsafe extern "C" fn zuc_eea3_1_buffer(
    key: *const u8,
    iv: *const u8,
    src: *const u8,
    dst: *mut u8,
    len: u32,
) -> i32 {
    guarded(|| {
        // SAFETY: forwarded caller contract.
        let mut job = unsafe { cipher_job(key, iv, src, dst, len)? };
        oneshot::eea3_n(core::slice::from_mut(&mut job))
    })
}

/// 128-EEA3 over `count` buffers described by parallel arrays.
///
/// All entries are checked before any buffer is written.
///
/// # Safety
/// - every array must hold `count` entries
/// - entry `i` must satisfy the [`zuc_eea3_1_buffer`] contract with `lens[i]`
/// - destination buffers must not overlap each other
///
/// # Returns
/// `0` on success, otherwise the first error code in entry order.
#[no_mangle]
pub unsafe extern "C" fn zuc_eea3_n_buffer(
    keys: *const *const u8,
    ivs: *const *const u8,
    srcs: *const *const u8,
    dsts: *const *mut u8,
    lens: *const u32,
    count: u32,
) -> i32 {
    guarded(|| {
        // SAFETY: forwarded caller contract for the five arrays.
        let (keys, ivs, srcs, dsts, lens) = unsafe {
            (
                array(keys, count, ZucError::NullKey)?,
                array(ivs, count, ZucError::NullIv)?,
                array(srcs, count, ZucError::NullSource)?,
                array(dsts, count, ZucError::NullDestination)?,
                array(lens, count, ZucError::CipherLengthOutOfRange)?,
            )
        };
        let mut jobs = keys
            .iter()
            .zip(ivs)
            .zip(srcs)
            .zip(dsts)
            .zip(lens)
            // SAFETY: every entry follows the single-buffer contract.
            .map(|((((&key, &iv), &src), &dst), &len)| unsafe { cipher_job(key, iv, src, dst, len) })
            .collect::<Result<Vec<_>, _>>()?;
        oneshot::eea3_n(&mut jobs)
    })
}

// =============================================================================
// EIA3
// =============================================================================

/// 128-EIA3 over one message.
///
/// # Safety
/// - `key` and `iv` must point to 16 readable bytes each
/// - `message` must be valid for `ceil(length_bits / 8)` bytes
/// - `tag` must be valid for one `u32` write
///
/// # Returns
/// `0` on success, otherwise the error code. `*tag` is written on success only.
#[no_mangle]
pub unsafe extern "C" fn zuc_eia3_1_buffer(
    key: *const u8,
    iv: *const u8,
    message: *const u8,
    length_bits: u32,
    tag: *mut u32,
) -> i32 {
    guarded(|| {
        // SAFETY: forwarded caller contract.
        let job = unsafe { auth_job(key, iv, message, tag.cast_const(), length_bits)? };
        let mut out = [0u32];
        oneshot::eia3_n(core::slice::from_ref(&job), &mut out)?;
        // SAFETY: non-null and writable per contract.
        unsafe { tag.write_unaligned(out[0]) };
        Ok(())
    })
}

/// 128-EIA3 over `count` messages described by parallel arrays.
///
/// # Safety
/// - every array must hold `count` entries (`tags` receives `count` words)
/// - entry `i` must satisfy the [`zuc_eia3_1_buffer`] contract
///
/// # Returns
/// `0` on success, otherwise the first error code in entry order.
#[no_mangle]
pub unsafe extern "C" fn zuc_eia3_n_buffer(
    keys: *const *const u8,
    ivs: *const *const u8,
    messages: *const *const u8,
    length_bits: *const u32,
    tags: *mut u32,
    count: u32,
) -> i32 {
    guarded(|| {
        // SAFETY: forwarded caller contract for the input arrays.
        let (keys, ivs, messages, length_bits) = unsafe {
            (
                array(keys, count, ZucError::NullKey)?,
                array(ivs, count, ZucError::NullIv)?,
                array(messages, count, ZucError::NullSource)?,
                array(length_bits, count, ZucError::AuthLengthOutOfRange)?,
            )
        };
        let jobs = keys
            .iter()
            .zip(ivs)
            .zip(messages)
            .zip(length_bits)
            // SAFETY: every entry follows the single-buffer contract.
            .map(|(((&key, &iv), &message), &bits)| unsafe { auth_job(key, iv, message, tags.cast_const(), bits) })
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = vec![0u32; jobs.len()];
        oneshot::eia3_n(&jobs, &mut out)?;
        for (i, value) in out.into_iter().enumerate() {
            // SAFETY: `tags` holds `count` writable words.
            unsafe { tags.add(i).write_unaligned(value) };
        }
        Ok(())
    })
}

// =============================================================================
// ZUC-256 MAC
// =============================================================================

/// One lane of [`zuc256_eia3_8_buffer_job`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ZucMac256Job {
    /// 32-byte key.
    pub key: *const u8,
    /// 25-byte IV.
    pub iv: *const u8,
    /// Message, `ceil(length_bits / 8)` bytes.
    pub message: *const u8,
    /// Message length in bits.
    pub length_bits: u32,
    /// Receives `tag_size` bytes.
    pub tag: *mut u8,
}

/// ZUC-256 MAC over one message with a 4, 8, 16 or 32-byte tag.
///
/// # Safety
/// - `key` must point to 32 readable bytes and `iv` to 25
/// - `message` must be valid for `ceil(length_bits / 8)` bytes
/// - `tag` must be valid for `tag_size` writable bytes
///
/// # Returns
/// `0` on success, otherwise the error code.
#[no_mangle]
pub unsafe extern "C" fn zuc256_eia3_1_buffer(
    key: *const u8,
    iv: *const u8,
    message: *const u8,
    length_bits: u32,
    tag: *mut u8,
    tag_size: u32,
) -> i32 {
    guarded(|| {
        // SAFETY: forwarded caller contract.
        let job = unsafe { auth256_job(key, iv, message, tag.cast_const(), length_bits)? };
        let tag_size = TagSize::try_from(tag_size as usize)?;
        let mac = Engine::detect().eia3_256(job.key, job.iv, job.message, length_bits, tag_size)?;
        // SAFETY: `tag` holds `tag_size` writable bytes.
        unsafe { tag.copy_from_nonoverlapping(mac.as_bytes().as_ptr(), mac.len()) };
        Ok(())
    })
}

/// ZUC-256 MAC over an 8-lane job batch. A null entry in `jobs` marks an
/// inactive lane, which is skipped entirely.
///
/// # Safety
/// - `jobs` must point to 8 entries; each non-null entry must point to a
///   [`ZucMac256Job`] satisfying the [`zuc256_eia3_1_buffer`] contract
///
/// # Returns
/// `0` on success, otherwise the first error code in lane order.
#[no_mangle]
pub unsafe extern "C" fn zuc256_eia3_8_buffer_job(
    jobs: *const *const ZucMac256Job,
    tag_size: u32,
) -> i32 {
    guarded(|| {
        // SAFETY: forwarded caller contract.
        let entries = unsafe { array(jobs, 8, ZucError::NullSource)? };
        let mut lanes: [Option<Auth256Job<'_>>; 8] = [None; 8];
        let mut outputs = [core::ptr::null_mut::<u8>(); 8];
        for ((entry, lane), output) in entries.iter().zip(&mut lanes).zip(&mut outputs) {
            if entry.is_null() {
                continue;
            }
            // SAFETY: non-null entries point to valid descriptors.
            let job = unsafe { **entry };
            // SAFETY: descriptor fields follow the single-buffer contract.
            *lane = Some(unsafe {
                auth256_job(job.key, job.iv, job.message, job.tag.cast_const(), job.length_bits)?
            });
            *output = job.tag;
        }
        let tag_size = TagSize::try_from(tag_size as usize)?;
        let tags = Engine::detect().eia3_256_batch(&lanes, tag_size)?;
        for (tag, output) in tags.iter().zip(outputs) {
            if let Some(tag) = tag {
                // SAFETY: active lanes carry a tag pointer with `tag_size` bytes.
                unsafe { output.copy_from_nonoverlapping(tag.as_bytes().as_ptr(), tag.len()) };
            }
        }
        Ok(())
    })
}

// =============================================================================
// TESTS
// =============================================================================

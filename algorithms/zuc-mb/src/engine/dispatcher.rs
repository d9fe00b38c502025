//! Hardware Dispatcher
//!
//! Detects CPU capabilities once, picks the keystream kernel for the 8-lane
//! path, and splits N-buffer requests into groups of 8, then 4, then 1.

use core::{array, fmt};

use cfg_if::cfg_if;
#[cfg(feature = "multithread")]
use rayon::prelude::*;

use super::{cipher, mac, mac256};
use crate::job::{validate_all, Auth256Job, AuthJob, CipherJob};
use crate::kernels::portable::Portable;
use crate::kernels::Keystream;
use crate::types::{CpuFeatureError, Iv128, Iv256, Key128, Key256, MacTag, TagSize, ZucError};

/// Lanes of the wide (vector) path.
pub const WIDE_LANES: usize = 8;

/// Lanes of the narrow path.
pub const NARROW_LANES: usize = 4;

// =============================================================================
// CAPABILITIES
// =============================================================================

/// CPU feature bitset relevant to ZUC kernels.
///
/// Any set can be built by hand, but [`Engine`] intersects it with
/// [`Capabilities::detect`], so a kernel only runs on features the CPU has.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u32);

impl Capabilities {
    /// No features.
    pub const NONE: Self = Self(0);
    /// SSE4.1.
    pub const SSE4_1: Self = Self(1 << 0);
    /// AVX.
    pub const AVX: Self = Self(1 << 1);
    /// AVX2.
    pub const AVX2: Self = Self(1 << 2);
    /// GFNI.
    pub const GFNI: Self = Self(1 << 3);
    /// AVX-512F.
    pub const AVX512F: Self = Self(1 << 4);

    const TABLE: [(Self, &'static str); 5] = [
        (Self::SSE4_1, "sse4.1"),
        (Self::AVX, "avx"),
        (Self::AVX2, "avx2"),
        (Self::GFNI, "gfni"),
        (Self::AVX512F, "avx512f"),
    ];

    /// Probe the running CPU.
    ///
    /// With `std` this is a runtime check; without it, the compile-time target
    /// features decide.
    #[must_use]
    pub fn detect() -> Self {
        probe()
    }

    /// Whether every feature in `required` is present.
    #[inline(always)]
    #[must_use]
    pub const fn has(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Same set minus `features`.
    #[must_use]
    pub const fn without(self, features: Self) -> Self {
        Self(self.0 & !features.0)
    }

    /// Features present in both sets.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Names of the present features.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::TABLE
            .into_iter()
            .filter(move |(bit, _)| self.has(*bit))
            .map(|(_, name)| name)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("none");
        }
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

cfg_if! {
    if #[cfg(all(feature = "std", target_arch = "x86_64"))] {
        fn probe() -> Capabilities {
            let mut caps = Capabilities::NONE;
            if is_x86_feature_detected!("sse4.1") {
                caps = caps.union(Capabilities::SSE4_1);
            }
            if is_x86_feature_detected!("avx") {
                caps = caps.union(Capabilities::AVX);
            }
            if is_x86_feature_detected!("avx2") {
                caps = caps.union(Capabilities::AVX2);
            }
            if is_x86_feature_detected!("gfni") {
                caps = caps.union(Capabilities::GFNI);
            }
            if is_x86_feature_detected!("avx512f") {
                caps = caps.union(Capabilities::AVX512F);
            }
            caps
        }
    } else if #[cfg(target_arch = "x86_64")] {
        fn probe() -> Capabilities {
            let mut caps = Capabilities::NONE;
            if cfg!(target_feature = "sse4.1") {
                caps = caps.union(Capabilities::SSE4_1);
            }
            if cfg!(target_feature = "avx") {
                caps = caps.union(Capabilities::AVX);
            }
            if cfg!(target_feature = "avx2") {
                caps = caps.union(Capabilities::AVX2);
            }
            if cfg!(target_feature = "gfni") {
                caps = caps.union(Capabilities::GFNI);
            }
            if cfg!(target_feature = "avx512f") {
                caps = caps.union(Capabilities::AVX512F);
            }
            caps
        }
    } else {
        const fn probe() -> Capabilities {
            Capabilities::NONE
        }
    }
}

// =============================================================================
// BACKENDS
// =============================================================================

/// Kernel family driving the 8-lane path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Scalar lanes, runs everywhere.
    Portable,
    /// One 256-bit register per LFSR row.
    Avx2,
}

impl Backend {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Portable => "Portable",
            Self::Avx2 => "AVX2",
        }
    }

    /// Features the backend needs, with the one reported when missing.
    const fn requirement(self) -> Option<(Capabilities, &'static str)> {
        match self {
            Self::Portable => None,
            Self::Avx2 => Some((Capabilities::AVX2, "AVX2")),
        }
    }

    /// Fastest backend `caps` can run. GFNI and AVX-512 parts use AVX2.
    #[must_use]
    pub const fn best(caps: Capabilities) -> Self {
        if cfg!(target_arch = "x86_64") && caps.has(Capabilities::AVX2) {
            Self::Avx2
        } else {
            Self::Portable
        }
    }
}

static PORTABLE: Portable = Portable;

#[cfg(target_arch = "x86_64")]
static AVX2: crate::kernels::avx2::Avx2 = crate::kernels::avx2::Avx2::assume_detected();

#[allow(clippy::match_wildcard_for_single_variants)]
fn wide_kernel(backend: Backend) -> &'static dyn Keystream<WIDE_LANES> {
    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => &AVX2,
        _ => &PORTABLE,
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Entry point for every cipher and MAC operation.
///
/// Cheap to copy; holds the capability set it was built from and the kernel
/// chosen for it.
#[derive(Clone, Copy)]
pub struct Engine {
    caps: Capabilities,
    backend: Backend,
    wide: &'static dyn Keystream<WIDE_LANES>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("backend", &self.backend)
            .field("caps", &self.caps)
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::detect()
    }
}

/// Split `n` jobs into (8-lane jobs, 4-lane jobs); the rest run singly.
const fn split_groups(n: usize) -> (usize, usize) {
    let wide = n / WIDE_LANES * WIDE_LANES;
    let narrow = if n - wide >= NARROW_LANES { NARROW_LANES } else { 0 };
    (wide, narrow)
}

fn encrypt_group<const N: usize>(kernel: &dyn Keystream<N>, group: &mut [CipherJob<'_>]) {
    let mut jobs = group.iter_mut();
    let mut lanes = array::from_fn(|_| jobs.next());
    cipher::encrypt_lanes(kernel, &mut lanes);
}

fn eia3_group<const N: usize>(kernel: &dyn Keystream<N>, jobs: &[AuthJob<'_>], tags: &mut [u32]) {
    let lanes = array::from_fn(|i| jobs.get(i));
    for (slot, tag) in tags.iter_mut().zip(mac::eia3_lanes(kernel, &lanes)) {
        if let Some(tag) = tag {
            *slot = tag;
        }
    }
}

fn mac256_group<const N: usize>(
    kernel: &dyn Keystream<N>,
    jobs: &[Auth256Job<'_>],
    tag_size: TagSize,
    tags: &mut [MacTag],
) {
    let lanes = array::from_fn(|i| jobs.get(i));
    for (slot, tag) in tags.iter_mut().zip(mac256::mac256_lanes(kernel, &lanes, tag_size)) {
        if let Some(tag) = tag {
            *slot = tag;
        }
    }
}

impl Engine {
    /// Engine for an explicit capability set, on its fastest backend.
    ///
    /// Features the running CPU lacks are dropped from `caps`.
    #[must_use]
    pub fn new(caps: Capabilities) -> Self {
        let caps = caps.intersect(Capabilities::detect());
        Self::build(caps, Backend::best(caps))
    }

    /// Engine for the running CPU.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(Capabilities::detect())
    }

    /// Engine forced onto `backend`.
    ///
    /// # Errors
    /// [`CpuFeatureError`] if `caps`, or the running CPU, lacks a feature the
    /// backend needs.
    pub fn with_backend(backend: Backend, caps: Capabilities) -> Result<Self, CpuFeatureError> {
        let caps = caps.intersect(Capabilities::detect());
        if let Some((required, name)) = backend.requirement() {
            if !caps.has(required) || !cfg!(target_arch = "x86_64") {
                return Err(CpuFeatureError::new(name));
            }
        }
        Ok(Self::build(caps, backend))
    }

    fn build(caps: Capabilities, backend: Backend) -> Self {
        let wide = wide_kernel(backend);
        log::trace!("zuc-mb engine: backend {} (cpu: {caps})", wide.name());
        Self { caps, backend, wide }
    }

    /// Backend of the 8-lane path.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Capability set the engine was built from.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.caps
    }

    // =========================================================================
    // CONFIDENTIALITY
    // =========================================================================

    fn run_one(job: &mut CipherJob<'_>) -> Result<(), ZucError> {
        job.validate()?;
        cipher::encrypt_one(job);
        Ok(())
    }

    /// EEA3 with a 128-bit key from `src` into `dst` (same length).
    ///
    /// # Errors
    /// Length outside `1..=8188` bytes, or `dst.len() != src.len()`.
    #[allow(clippy::unused_self)]
    pub fn eea3(
        &self,
        key: &Key128,
        iv: &Iv128,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<(), ZucError> {
        Self::run_one(&mut CipherJob::new(key, iv, src, dst))
    }

    /// EEA3 with a 128-bit key, in place.
    ///
    /// # Errors
    /// Length outside `1..=8188` bytes.
    #[allow(clippy::unused_self)]
    pub fn eea3_in_place(&self, key: &Key128, iv: &Iv128, buf: &mut [u8]) -> Result<(), ZucError> {
        Self::run_one(&mut CipherJob::in_place(key, iv, buf))
    }

    /// ZUC-256 confidentiality from `src` into `dst`.
    ///
    /// # Errors
    /// Length outside `1..=8188` bytes, or `dst.len() != src.len()`.
    #[allow(clippy::unused_self)]
    pub fn eea3_256(
        &self,
        key: &Key256,
        iv: &Iv256,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<(), ZucError> {
        Self::run_one(&mut CipherJob::new_256(key, iv, src, dst))
    }

    /// ZUC-256 confidentiality, in place.
    ///
    /// # Errors
    /// Length outside `1..=8188` bytes.
    #[allow(clippy::unused_self)]
    pub fn eea3_256_in_place(
        &self,
        key: &Key256,
        iv: &Iv256,
        buf: &mut [u8],
    ) -> Result<(), ZucError> {
        Self::run_one(&mut CipherJob::in_place_256(key, iv, buf))
    }

    /// Process any number of cipher jobs.
    ///
    /// Every job is validated first; on error no buffer is touched.
    ///
    /// # Errors
    /// The first invalid job's error, in job order.
    pub fn eea3_n(&self, jobs: &mut [CipherJob<'_>]) -> Result<(), ZucError> {
        validate_all(jobs.iter().map(Some), CipherJob::validate)?;

        let (wide, narrow) = split_groups(jobs.len());
        log::trace!("eea3_n: {} jobs, {} wide, {} narrow", jobs.len(), wide, narrow);
        let (wide_jobs, rest) = jobs.split_at_mut(wide);

        #[cfg(feature = "multithread")]
        wide_jobs
            .par_chunks_mut(WIDE_LANES)
            .for_each(|group| encrypt_group(self.wide, group));
        #[cfg(not(feature = "multithread"))]
        for group in wide_jobs.chunks_mut(WIDE_LANES) {
            encrypt_group(self.wide, group);
        }

        let (narrow_jobs, singles) = rest.split_at_mut(narrow);
        if !narrow_jobs.is_empty() {
            encrypt_group::<NARROW_LANES>(&PORTABLE, narrow_jobs);
        }
        for job in singles {
            cipher::encrypt_one(job);
        }
        Ok(())
    }

    // =========================================================================
    // INTEGRITY (EIA3)
    // =========================================================================

    /// EIA3 MAC over the first `length_bits` bits of `message`.
    ///
    /// # Errors
    /// Bit length outside `1..=65504` or longer than `message`.
    #[allow(clippy::unused_self)]
    pub fn eia3(
        &self,
        key: &Key128,
        iv: &Iv128,
        message: &[u8],
        length_bits: u32,
    ) -> Result<u32, ZucError> {
        let job = AuthJob::new(key, iv, message, length_bits);
        job.validate()?;
        Ok(mac::eia3_one(&job))
    }

    /// EIA3 over any number of messages; `tags[i]` receives job `i`'s tag.
    ///
    /// # Errors
    /// `tags.len() != jobs.len()`, or the first invalid job's error.
    pub fn eia3_n(&self, jobs: &[AuthJob<'_>], tags: &mut [u32]) -> Result<(), ZucError> {
        if tags.len() != jobs.len() {
            return Err(ZucError::BufferLengthMismatch);
        }
        validate_all(jobs.iter().map(Some), AuthJob::validate)?;

        let (wide, narrow) = split_groups(jobs.len());
        log::trace!("eia3_n: {} jobs, {} wide, {} narrow", jobs.len(), wide, narrow);
        let (wide_jobs, rest_jobs) = jobs.split_at(wide);
        let (wide_tags, rest_tags) = tags.split_at_mut(wide);

        #[cfg(feature = "multithread")]
        wide_jobs
            .par_chunks(WIDE_LANES)
            .zip(wide_tags.par_chunks_mut(WIDE_LANES))
            .for_each(|(group, out)| eia3_group(self.wide, group, out));
        #[cfg(not(feature = "multithread"))]
        for (group, out) in wide_jobs.chunks(WIDE_LANES).zip(wide_tags.chunks_mut(WIDE_LANES)) {
            eia3_group(self.wide, group, out);
        }

        if narrow > 0 {
            eia3_group::<NARROW_LANES>(&PORTABLE, &rest_jobs[..narrow], &mut rest_tags[..narrow]);
        }
        for (job, tag) in rest_jobs[narrow..].iter().zip(&mut rest_tags[narrow..]) {
            *tag = mac::eia3_one(job);
        }
        Ok(())
    }

    /// EIA3 over one 8-lane job batch. `None` lanes are skipped and stay
    /// `None` in the result.
    ///
    /// # Errors
    /// The first invalid active job's error.
    pub fn eia3_batch(
        &self,
        jobs: &[Option<AuthJob<'_>>; WIDE_LANES],
    ) -> Result<[Option<u32>; WIDE_LANES], ZucError> {
        validate_all(jobs.iter().map(Option::as_ref), AuthJob::validate)?;
        let lanes = array::from_fn(|i| jobs[i].as_ref());
        Ok(mac::eia3_lanes(self.wide, &lanes))
    }

    // =========================================================================
    // INTEGRITY (ZUC-256)
    // =========================================================================

    /// ZUC-256 MAC with a `tag_size` tag.
    ///
    /// # Errors
    /// Bit length outside `1..=65504` or longer than `message`.
    #[allow(clippy::unused_self)]
    pub fn eia3_256(
        &self,
        key: &Key256,
        iv: &Iv256,
        message: &[u8],
        length_bits: u32,
        tag_size: TagSize,
    ) -> Result<MacTag, ZucError> {
        let job = Auth256Job::new(key, iv, message, length_bits);
        job.validate()?;
        Ok(mac256::mac256_one(&job, tag_size))
    }

    /// ZUC-256 MAC over any number of messages.
    ///
    /// # Errors
    /// `tags.len() != jobs.len()`, or the first invalid job's error.
    pub fn eia3_256_n(
        &self,
        jobs: &[Auth256Job<'_>],
        tag_size: TagSize,
        tags: &mut [MacTag],
    ) -> Result<(), ZucError> {
        if tags.len() != jobs.len() {
            return Err(ZucError::BufferLengthMismatch);
        }
        validate_all(jobs.iter().map(Some), Auth256Job::validate)?;

        let (wide, narrow) = split_groups(jobs.len());
        log::trace!("eia3_256_n: {} jobs, {} wide, {} narrow", jobs.len(), wide, narrow);
        let (wide_jobs, rest_jobs) = jobs.split_at(wide);
        let (wide_tags, rest_tags) = tags.split_at_mut(wide);

        #[cfg(feature = "multithread")]
        wide_jobs
            .par_chunks(WIDE_LANES)
            .zip(wide_tags.par_chunks_mut(WIDE_LANES))
            .for_each(|(group, out)| mac256_group(self.wide, group, tag_size, out));
        #[cfg(not(feature = "multithread"))]
        for (group, out) in wide_jobs.chunks(WIDE_LANES).zip(wide_tags.chunks_mut(WIDE_LANES)) {
            mac256_group(self.wide, group, tag_size, out);
        }

        if narrow > 0 {
            mac256_group::<NARROW_LANES>(
                &PORTABLE,
                &rest_jobs[..narrow],
                tag_size,
                &mut rest_tags[..narrow],
            );
        }
        for (job, tag) in rest_jobs[narrow..].iter().zip(&mut rest_tags[narrow..]) {
            *tag = mac256::mac256_one(job, tag_size);
        }
        Ok(())
    }

    /// ZUC-256 MAC over one 8-lane job batch with inactive lanes.
    ///
    /// # Errors
    /// The first invalid active job's error.
    pub fn eia3_256_batch(
        &self,
        jobs: &[Option<Auth256Job<'_>>; WIDE_LANES],
        tag_size: TagSize,
    ) -> Result<[Option<MacTag>; WIDE_LANES], ZucError> {
        validate_all(jobs.iter().map(Option::as_ref), Auth256Job::validate)?;
        let lanes = array::from_fn(|i| jobs[i].as_ref());
        Ok(mac256::mac256_lanes(self.wide, &lanes, tag_size))
    }
}

// =============================================================================
// TESTS
// =============================================================================

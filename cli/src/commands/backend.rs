//! Backend Command
//!
//! Engine selection from the `--backend` flag.

use anyhow::Result;
use clap::ValueEnum;
use zuc_mb::{Backend, Capabilities, Engine};

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum BackendChoice {
    /// Fastest backend the CPU supports
    Auto,
    /// Scalar lanes (no SIMD)
    Portable,
    /// 8 lanes in AVX2 registers
    Avx2,
}

/// Build the engine for `choice`; forcing an unsupported backend fails.
pub fn select_engine(choice: BackendChoice) -> Result<Engine> {
    let caps = Capabilities::detect();
    let backend = match choice {
        BackendChoice::Auto => return Ok(Engine::new(caps)),
        BackendChoice::Portable => Backend::Portable,
        BackendChoice::Avx2 => Backend::Avx2,
    };
    Engine::with_backend(backend, caps).map_err(|e| anyhow::anyhow!("{}", e))
}

/// Print the backend and the CPU features it was chosen from.
pub fn show_backend(engine: &Engine) {
    println!("Backend:      {}", engine.backend().name());
    println!("CPU features: {}", engine.capabilities());
    println!("Best backend: {}", Backend::best(Capabilities::detect()).name());
}

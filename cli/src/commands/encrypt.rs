//! Encrypt Command
//!
//! One EEA3 buffer per file; all files go through a single N-buffer call.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use zuc_mb::{CipherJob, Engine};

use super::keys::{IvLayout, KeyArgs, KeyMaterial};

fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(".zuc");
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Encrypt (or decrypt) every file into `<name>.zuc`.
pub fn encrypt_files(
    engine: &Engine,
    key: &KeyArgs,
    files: &[PathBuf],
    output_dir: Option<&Path>,
) -> Result<()> {
    let material = key.material(IvLayout::Eea3)?;
    let mut buffers = files
        .iter()
        .map(|path| std::fs::read(path).with_context(|| format!("Failed to read: {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let mut jobs: Vec<_> = buffers
        .iter_mut()
        .map(|buf| match &material {
            KeyMaterial::Zuc128 { key, iv } => CipherJob::in_place(key, iv, buf),
            KeyMaterial::Zuc256 { key, iv } => CipherJob::in_place_256(key, iv, buf),
        })
        .collect();
    log::debug!("encrypting {} buffer(s)", jobs.len());
    engine.eea3_n(&mut jobs).map_err(|e| anyhow::anyhow!("{}", e))?;
    drop(jobs);

    for (path, data) in files.iter().zip(&buffers) {
        let out = output_path(path, output_dir);
        std::fs::write(&out, data).with_context(|| format!("Failed to write: {}", out.display()))?;
        println!("{} -> {}", path.display(), out.display());
    }
    Ok(())
}

//! MAC Command
//!
//! Tags every file over its full bit length, printed like `sha256sum`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use zuc_mb::{Auth256Job, AuthJob, Engine, MacTag, TagSize};

use super::keys::{IvLayout, KeyArgs, KeyMaterial};

/// Print `<tag>  <file>` for every file.
pub fn mac_files(engine: &Engine, key: &KeyArgs, tag_size: usize, files: &[PathBuf]) -> Result<()> {
    let material = key.material(IvLayout::Eia3)?;
    let messages = files
        .iter()
        .map(|path| std::fs::read(path).with_context(|| format!("Failed to read: {}", path.display())))
        .collect::<Result<Vec<_>>>()?;
    let bits = messages
        .iter()
        .zip(files)
        .map(|(m, path)| {
            u32::try_from(m.len() * 8).with_context(|| format!("Too large: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let tags: Vec<String> = match &material {
        KeyMaterial::Zuc128 { key, iv } => {
            let jobs: Vec<_> =
                messages.iter().zip(&bits).map(|(m, &b)| AuthJob::new(key, iv, m, b)).collect();
            let mut tags = vec![0u32; jobs.len()];
            engine.eia3_n(&jobs, &mut tags).map_err(|e| anyhow::anyhow!("{}", e))?;
            tags.iter().map(|t| format!("{t:08x}")).collect()
        }
        KeyMaterial::Zuc256 { key, iv } => {
            let size = TagSize::try_from(tag_size).map_err(|e| anyhow::anyhow!("{}", e))?;
            let jobs: Vec<_> =
                messages.iter().zip(&bits).map(|(m, &b)| Auth256Job::new(key, iv, m, b)).collect();
            let mut tags = vec![MacTag::empty(); jobs.len()];
            engine.eia3_256_n(&jobs, size, &mut tags).map_err(|e| anyhow::anyhow!("{}", e))?;
            tags.iter().map(hex::encode).collect()
        }
    };

    for (tag, path) in tags.iter().zip(files) {
        println!("{}  {}", tag, path.display());
    }
    Ok(())
}

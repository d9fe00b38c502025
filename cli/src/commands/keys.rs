//! Key Arguments
//!
//! Hex key/IV parsing shared by the cipher and MAC commands. The key length
//! picks the variant: 16 bytes for ZUC-128, 32 bytes for ZUC-256.

use anyhow::{bail, Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Key in hex (32 digits for ZUC-128, 64 for ZUC-256)
    #[arg(short, long)]
    key: String,

    /// IV in hex (32 or 50 digits); built from COUNT/BEARER/DIRECTION if absent
    #[arg(short, long)]
    iv: Option<String>,

    /// 3GPP COUNT
    #[arg(long, default_value_t = 0)]
    count: u32,

    /// 3GPP BEARER (5 bits)
    #[arg(long, default_value_t = 0)]
    bearer: u8,

    /// 3GPP DIRECTION (0 uplink, 1 downlink)
    #[arg(long, default_value_t = 0)]
    direction: u8,
}

/// Which 3GPP IV layout a derived IV follows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IvLayout {
    Eea3,
    Eia3,
}

/// Parsed key material.
pub enum KeyMaterial {
    Zuc128 { key: [u8; 16], iv: [u8; 16] },
    Zuc256 { key: [u8; 32], iv: [u8; 25] },
}

fn parse_hex<const N: usize>(text: &str, what: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(text.trim()).with_context(|| format!("{what} is not valid hex"))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| anyhow::anyhow!("{what} must be {N} bytes, got {len}"))
}

impl KeyArgs {
    /// Resolve the key and IV, deriving a ZUC-128 IV from COUNT/BEARER/DIRECTION
    /// when none was given.
    pub fn material(&self, layout: IvLayout) -> Result<KeyMaterial> {
        match self.key.trim().len() {
            32 => {
                let key = parse_hex(&self.key, "key")?;
                let iv = match &self.iv {
                    Some(iv) => parse_hex(iv, "IV")?,
                    None => match layout {
                        IvLayout::Eea3 => zuc_mb::iv::eea3_iv(self.count, self.bearer, self.direction),
                        IvLayout::Eia3 => zuc_mb::iv::eia3_iv(self.count, self.bearer, self.direction),
                    },
                };
                Ok(KeyMaterial::Zuc128 { key, iv })
            }
            64 => {
                let Some(iv) = &self.iv else {
                    bail!("ZUC-256 needs an explicit 25-byte --iv");
                };
                Ok(KeyMaterial::Zuc256 { key: parse_hex(&self.key, "key")?, iv: parse_hex(iv, "IV")? })
            }
            n => bail!("key must be 32 or 64 hex digits, got {n}"),
        }
    }
}

//! CLI Commands
//!
//! All zucmb CLI commands organized as separate modules.

mod backend;
mod encrypt;
mod kat;
mod keys;
mod mac;

pub use backend::{select_engine, show_backend, BackendChoice};
pub use encrypt::encrypt_files;
pub use kat::run_kat;
pub use keys::KeyArgs;
pub use mac::mac_files;

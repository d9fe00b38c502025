//! Execution Engine
//!
//! Batch scheduling, the cipher and MAC drivers, and CPU dispatch.

pub mod cipher;
pub mod dispatcher;
pub mod fold;
pub mod mac;
pub mod mac256;
pub mod scheduler;

pub use dispatcher::{Backend, Capabilities, Engine};

//! Utility functions/types to use across the whole crate.

mod file_system;
mod log;

pub use file_system::*;
pub use self::log::{Logger, NOISY_TARGETS};

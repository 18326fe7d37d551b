#![deny(unused_must_use)]

mod bootstrap;
pub mod cli;
pub mod config;
pub mod msg;
pub mod paths;
pub mod utils;

// Exports
pub use bootstrap::{Bootstrap, Started};
pub use msg::{Entry, MessageFacility, UIBindings};
pub use paths::{resolve_paths, PathSet};

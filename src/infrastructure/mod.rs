//! Infrastructure helpers for filesystem and environment lookups.

pub mod paths;

pub use paths::{data_dir, expand_tilde};

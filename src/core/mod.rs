//! Core types and error handling
//!
//! The foundation layer shared by every other module: the crate's error
//! taxonomy and result alias. Higher-level modules (`registry`, `partition`,
//! `assembler`, `pipeline`) build on these types; the pipeline additionally
//! wraps them in `anyhow` context when reporting a pass-level failure to the
//! host build system.

pub mod error;

pub use error::{Result, SpritemuxError};

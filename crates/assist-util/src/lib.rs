//! Small helpers shared by the publish-assist crates.

pub mod error;
pub mod fs;
pub mod hash;
pub mod maven;
pub mod process;

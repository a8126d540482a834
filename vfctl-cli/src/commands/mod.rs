//! CLI command implementations

pub mod sriov;
pub mod vf;

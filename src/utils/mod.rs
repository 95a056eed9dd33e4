//! Utility modules shared across the toolchain.

pub mod command;
pub mod log;
pub mod slug;

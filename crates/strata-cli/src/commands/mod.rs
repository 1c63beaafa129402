//! Command implementations

pub mod common;
pub mod down;
pub mod status;
pub mod up;

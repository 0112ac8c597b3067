//! Command implementations

pub mod add_target;
pub mod install;
pub mod menu;
pub mod remove;
pub mod status;

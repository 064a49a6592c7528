pub mod common;
pub mod enable;
pub mod install;
pub mod list;
pub mod remove;
pub mod update;

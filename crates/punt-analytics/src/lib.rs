// Library root: re-exports all modules so integration tests and the
// `puntviz` binary can access the crate's public API.

pub mod animation;
pub mod app;
pub mod config;
pub mod data;
pub mod features;
pub mod protocol;
pub mod tui;

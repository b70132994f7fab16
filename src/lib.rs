//! Solar panel sizing core, kept in a library so the CLI and the GUI share it.

pub mod app;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod solar;
pub mod summary;
pub mod ui_cli;

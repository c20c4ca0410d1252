pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod state;
pub mod window;

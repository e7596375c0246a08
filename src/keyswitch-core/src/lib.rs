pub mod config;
pub mod error;
pub mod foundation;
pub mod fs;
pub mod identity;
pub mod json;
pub mod process;

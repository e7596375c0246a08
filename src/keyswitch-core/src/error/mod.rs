pub mod config;
pub mod foundation;
pub mod fs;
pub mod identity;
pub mod process;
pub mod structured_file;

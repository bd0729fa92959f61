pub mod config;
pub mod entry;
pub mod export;
pub mod init;
pub mod log;
pub mod project;
pub mod report;
pub mod serve;
pub mod timer;

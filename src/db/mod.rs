pub mod aggregate;
pub mod entries;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod projects;
pub mod settings;
pub mod timers;

pub use pool::{DbPool, OpenMode};

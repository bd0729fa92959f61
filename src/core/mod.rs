pub mod log;
pub mod store;
pub mod validate;

pub use store::{Store, StoreLocation, StorePolicy};

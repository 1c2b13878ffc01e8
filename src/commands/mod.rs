//! cliptrail - Command module

pub mod handlers;

pub use handlers::*;

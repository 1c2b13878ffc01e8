//! cliptrail - Configuration module

pub mod settings;

pub use settings::{default_data_dir, default_image_dir, Settings};

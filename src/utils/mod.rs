pub mod config;
pub mod text;

pub use config::{app_config_path, data_dir, read_app_config, write_app_config};
pub use text::slugify;

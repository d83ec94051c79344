pub mod loader;

pub use loader::{load_config, load_settings, parse_config};

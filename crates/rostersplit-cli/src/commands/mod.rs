//! CLI command implementations.

pub mod inspect;
pub mod split;

use std::path::PathBuf;

use rostersplit::SplitterConfig;

/// Load `--config` if given, else defaults.
fn load_config(path: Option<&PathBuf>) -> Result<SplitterConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Config file not found: {}", path.display()).into());
            }
            Ok(SplitterConfig::load(path)?)
        }
        None => Ok(SplitterConfig::default()),
    }
}

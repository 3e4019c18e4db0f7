use anyhow::{Context, Result};
use logpane_viewer::{CONFIG_FILE_NAME, ViewerConfig};

/// Load `logpane.toml` from the working directory, falling back to defaults
/// when the file does not exist.
pub fn load_config() -> Result<ViewerConfig> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(ViewerConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))
}

pub fn show_config() -> Result<()> {
    let config = load_config()?;
    print!("{}", toml::to_string(&config)?);
    Ok(())
}

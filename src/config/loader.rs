use crate::config::settings::ServiceConfig;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Load and validate config from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading config file '{}'", path.as_ref().display()))?;
    let config: ServiceConfig = serde_yaml::from_str(&raw)?;

    // Validate server
    if config.server.host.is_empty() {
        bail!("server.host must not be empty");
    }
    if config.server.port.is_empty() {
        bail!("server.port must not be empty");
    }

    // Validate upstream
    if config.upstream.base_url.is_empty() {
        bail!("upstream.base_url must not be empty");
    }
    if config.upstream.timeout_seconds == 0 {
        bail!("upstream.timeout_seconds must be greater than zero");
    }

    // Validate directory source
    match (&config.directory.path, &config.directory.inline) {
        (Some(_), Some(_)) => bail!("directory: set either 'path' or 'inline', not both"),
        (None, None) => bail!("directory: one of 'path' or 'inline' is required"),
        _ => {}
    }

    Ok(config)
}

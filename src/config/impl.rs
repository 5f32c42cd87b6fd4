use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

fn slot() -> &'static ArcSwap<StaticConfig> {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
}

/// Current process-wide configuration
///
/// Lock-free snapshot; defaults are returned until a config is installed.
pub fn get_config() -> Arc<StaticConfig> {
    slot().load_full()
}

/// Load `path` (plus `CC__*` environment overrides), validate it and
/// install it as the process-wide configuration
pub fn load_config(path: &str) -> Result<Arc<StaticConfig>> {
    let config = StaticConfig::try_load_from(path)?;
    config.validate()?;
    Ok(install_config(config))
}

/// Install an already built configuration; later calls replace it
pub fn install_config(config: StaticConfig) -> Arc<StaticConfig> {
    let config = Arc::new(config);
    slot().store(config.clone());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_replaces_snapshot() {
        let mut config = StaticConfig::default();
        config.server.port = 18080;
        install_config(config);
        assert_eq!(get_config().server.port, 18080);

        let mut config = StaticConfig::default();
        config.server.port = 18081;
        install_config(config);
        assert_eq!(get_config().server.port, 18081);
    }
}

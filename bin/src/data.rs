//! Configuration and loader setup for the foresight CLI.

use anyhow::{Context, Result};
use foresight::fmp::FmpClient;
use foresight::{EngineConfig, ForecastEngine, Horizon};
use std::path::Path;

/// Loads the configuration file, or the defaults when none is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Creates an engine over the FMP loader.
///
/// Requires `FMP_API_KEY` in the environment or a `.env` file.
pub(crate) fn engine(config: EngineConfig) -> Result<ForecastEngine<FmpClient>> {
    let client = FmpClient::from_env().context("creating FMP client")?;
    Ok(ForecastEngine::new(client, config)?)
}

/// Converts raw day counts into horizons.
pub(crate) fn parse_horizons(days: &[usize]) -> Result<Vec<Horizon>> {
    days.iter()
        .map(|&d| Horizon::new(d).map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_horizons() {
        let horizons = parse_horizons(&[1, 7, 28]).unwrap();
        assert_eq!(horizons.iter().map(|h| h.days()).collect::<Vec<_>>(), vec![1, 7, 28]);
        assert!(parse_horizons(&[0]).is_err());
        assert!(parse_horizons(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::layout::MeasurerKind;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values are startup errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub save_debounce: Duration,
    pub render_scale: f32,
    pub layout_measurer: MeasurerKind,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let debounce_ms = var("RESUME_SAVE_DEBOUNCE_MS", "500")
            .parse::<u64>()
            .context("RESUME_SAVE_DEBOUNCE_MS must be a whole number of milliseconds")?;

        let render_scale = var("RESUME_RENDER_SCALE", "2.0")
            .parse::<f32>()
            .context("RESUME_RENDER_SCALE must be a number")?;
        if !(render_scale.is_finite() && render_scale > 0.0) {
            return Err(anyhow!("RESUME_RENDER_SCALE must be positive, got {render_scale}"));
        }

        let layout_measurer = var("RESUME_LAYOUT_MEASURER", "metric")
            .parse::<MeasurerKind>()
            .map_err(|e| anyhow!(e))
            .context("RESUME_LAYOUT_MEASURER is invalid")?;

        Ok(Config {
            data_dir: PathBuf::from(var("RESUME_DATA_DIR", ".resume")),
            output_dir: PathBuf::from(var("RESUME_OUTPUT_DIR", ".")),
            save_debounce: Duration::from_millis(debounce_ms),
            render_scale,
            layout_measurer,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".resume"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.save_debounce, Duration::from_millis(500));
        assert_eq!(config.render_scale, 2.0);
        assert_eq!(config.layout_measurer, MeasurerKind::Metric);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("RESUME_SAVE_DEBOUNCE_MS", "250"),
            ("RESUME_LAYOUT_MEASURER", "fixed"),
            ("RESUME_RENDER_SCALE", "1.5"),
        ])
        .unwrap();
        assert_eq!(config.save_debounce, Duration::from_millis(250));
        assert_eq!(config.layout_measurer, MeasurerKind::Fixed);
        assert_eq!(config.render_scale, 1.5);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("RESUME_SAVE_DEBOUNCE_MS", "soon")]).is_err());
        assert!(config_from(&[("RESUME_RENDER_SCALE", "0")]).is_err());
        assert!(config_from(&[("RESUME_LAYOUT_MEASURER", "guess")]).is_err());
    }
}

//! CLI configuration from environment and optional config file.

use anyhow::{Context, Result};
use pansops_core::EngineConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    /// Overrides the engine's arc tolerance when set.
    pub arc_tolerance_m: Option<f64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            output_dir: env::var("PANSOPS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./output")),
            arc_tolerance_m: parse_tolerance(env::var("PANSOPS_ARC_TOLERANCE_M").ok()),
        }
    }

    /// Engine configuration from `file` (defaults when absent), with the
    /// environment override applied.
    pub fn engine_config(&self, file: Option<&Path>) -> Result<EngineConfig> {
        let mut engine = match file {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => EngineConfig::default(),
        };
        if let Some(tolerance) = self.arc_tolerance_m {
            engine.arc_tolerance_m = tolerance;
        }
        Ok(engine)
    }
}

fn parse_tolerance(raw: Option<String>) -> Option<f64> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(value = %raw, "ignoring unparseable PANSOPS_ARC_TOLERANCE_M");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_override_parses_or_is_dropped() {
        assert_eq!(parse_tolerance(Some("0.5".into())), Some(0.5));
        assert_eq!(parse_tolerance(Some(" 2 ".into())), Some(2.0));
        assert_eq!(parse_tolerance(Some("fine".into())), None);
        assert_eq!(parse_tolerance(None), None);
    }

    #[test]
    fn env_override_wins_over_file() {
        let path = env::temp_dir().join(format!("pansops-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"arc_tolerance_m": 5.0, "holding": {"primary_margin_m": 900.0}}"#)
            .unwrap();

        let config = Config {
            output_dir: PathBuf::from("out"),
            arc_tolerance_m: None,
        };
        let engine = config.engine_config(Some(&path)).unwrap();
        assert_eq!(engine.arc_tolerance_m, 5.0);
        assert_eq!(engine.holding.primary_margin_m, 900.0);

        let config = Config {
            arc_tolerance_m: Some(0.25),
            ..config
        };
        assert_eq!(config.engine_config(Some(&path)).unwrap().arc_tolerance_m, 0.25);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let config = Config {
            output_dir: PathBuf::from("out"),
            arc_tolerance_m: None,
        };
        assert!(config
            .engine_config(Some(Path::new("/nonexistent/pansops.json")))
            .is_err());
        assert_eq!(config.engine_config(None).unwrap(), EngineConfig::default());
    }
}

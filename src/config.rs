use crate::models::ScoringWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub optimizer: OptimizerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Without a key the catalog client is disabled and only cached records are served
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    #[serde(default = "default_quarter")]
    pub quarter: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub departments: Vec<DepartmentCodes>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            api_key_header: default_api_key_header(),
            quarter: default_quarter(),
            timeout_secs: default_timeout_secs(),
            departments: Vec::new(),
        }
    }
}

fn default_endpoint() -> String { "https://api.ucsb.edu".to_string() }
fn default_api_key_header() -> String { "ucsb-api-key".to_string() }
fn default_quarter() -> String { "20261".to_string() }
fn default_timeout_secs() -> u64 { 10 }

/// A department and the enrollment codes browsed for it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepartmentCodes {
    pub name: String,
    #[serde(default)]
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_l1_cache_size")]
    pub l1_cache_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_secs: default_ttl_secs(),
            l1_cache_size: default_l1_cache_size(),
        }
    }
}

fn default_cache_dir() -> PathBuf { PathBuf::from("cache") }
fn default_ttl_secs() -> u64 { 3600 }
fn default_l1_cache_size() -> u64 { 10_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerSettings {
    #[serde(default = "default_results")]
    pub default_results: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Stop after this many valid schedules; unset searches exhaustively
    pub max_candidates: Option<usize>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            default_results: default_results(),
            max_results: default_max_results(),
            max_candidates: None,
        }
    }
}

fn default_results() -> usize { 10 }
fn default_max_results() -> usize { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_base_weight")]
    pub base: f64,
    #[serde(default = "default_centering_weight")]
    pub centering: f64,
    #[serde(default = "default_spread_penalty")]
    pub spread_penalty: f64,
    #[serde(default = "default_spread_bonus")]
    pub spread_bonus: f64,
    #[serde(default = "default_spread_bonus_cap")]
    pub spread_bonus_cap: f64,
    #[serde(default = "default_preferred_window_weight")]
    pub preferred_window: f64,
    #[serde(default = "default_early_penalty")]
    pub early_penalty: f64,
    #[serde(default = "default_late_penalty")]
    pub late_penalty: f64,
    #[serde(default = "default_free_day_weight")]
    pub free_day: f64,
    #[serde(default = "default_gap_divisor")]
    pub gap_divisor: f64,
    #[serde(default = "default_gap_penalty_cap")]
    pub gap_penalty_cap: f64,
    #[serde(default = "default_no_gap_bonus")]
    pub no_gap_bonus: f64,
    #[serde(default = "default_excess_class_penalty")]
    pub excess_class_penalty: f64,
    #[serde(default = "default_time_of_day_weight")]
    pub time_of_day: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            base: default_base_weight(),
            centering: default_centering_weight(),
            spread_penalty: default_spread_penalty(),
            spread_bonus: default_spread_bonus(),
            spread_bonus_cap: default_spread_bonus_cap(),
            preferred_window: default_preferred_window_weight(),
            early_penalty: default_early_penalty(),
            late_penalty: default_late_penalty(),
            free_day: default_free_day_weight(),
            gap_divisor: default_gap_divisor(),
            gap_penalty_cap: default_gap_penalty_cap(),
            no_gap_bonus: default_no_gap_bonus(),
            excess_class_penalty: default_excess_class_penalty(),
            time_of_day: default_time_of_day_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            base: config.base,
            centering: config.centering,
            spread_penalty: config.spread_penalty,
            spread_bonus: config.spread_bonus,
            spread_bonus_cap: config.spread_bonus_cap,
            preferred_window: config.preferred_window,
            early_penalty: config.early_penalty,
            late_penalty: config.late_penalty,
            free_day: config.free_day,
            // A zero divisor would turn every gap into an infinite penalty
            gap_divisor: if config.gap_divisor > 0.0 { config.gap_divisor } else { default_gap_divisor() },
            gap_penalty_cap: config.gap_penalty_cap,
            no_gap_bonus: config.no_gap_bonus,
            excess_class_penalty: config.excess_class_penalty,
            time_of_day: config.time_of_day,
        }
    }
}

fn default_base_weight() -> f64 { 100.0 }
fn default_centering_weight() -> f64 { 30.0 }
fn default_spread_penalty() -> f64 { 0.01 }
fn default_spread_bonus() -> f64 { 0.05 }
fn default_spread_bonus_cap() -> f64 { 30.0 }
fn default_preferred_window_weight() -> f64 { 20.0 }
fn default_early_penalty() -> f64 { 10.0 }
fn default_late_penalty() -> f64 { 10.0 }
fn default_free_day_weight() -> f64 { 15.0 }
fn default_gap_divisor() -> f64 { 10.0 }
fn default_gap_penalty_cap() -> f64 { 50.0 }
fn default_no_gap_bonus() -> f64 { 20.0 }
fn default_excess_class_penalty() -> f64 { 25.0 }
fn default_time_of_day_weight() -> f64 { 8.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PLANNER_)
    /// 4. `CATALOG_API_KEY`, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., PLANNER__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PLANNER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_api_key_override(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PLANNER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_api_key_override(settings)?.try_deserialize()
    }

    /// Scoring weights in engine form
    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    /// Names of the configured departments, in configuration order
    pub fn department_names(&self) -> Vec<String> {
        self.catalog.departments.iter().map(|d| d.name.clone()).collect()
    }
}

/// `CATALOG_API_KEY` wins over any configured key
fn apply_api_key_override(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("CATALOG_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("catalog.api_key", key)?
            .build(),
        _ => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights_match_engine() {
        let weights = WeightsConfig::default();
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_zero_gap_divisor_falls_back() {
        let weights = WeightsConfig {
            gap_divisor: 0.0,
            ..Default::default()
        };
        assert_eq!(ScoringWeights::from(&weights).gap_divisor, 10.0);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir::TempDir::new("planner-config").unwrap();
        let path = dir.path().join("planner.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[catalog]
quarter = "20254"

[[catalog.departments]]
name = "MATH"
codes = ["00001", "00002"]

[[catalog.departments]]
name = "ANTH"

[optimizer]
max_candidates = 5000

[scoring.weights]
free_day = 40.0
"#
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.catalog.quarter, "20254");
        assert_eq!(settings.catalog.api_key_header, "ucsb-api-key");
        assert_eq!(settings.department_names(), vec!["MATH", "ANTH"]);
        assert_eq!(settings.catalog.departments[0].codes.len(), 2);
        assert!(settings.catalog.departments[1].codes.is_empty());
        assert_eq!(settings.optimizer.max_candidates, Some(5000));
        assert_eq!(settings.optimizer.default_results, 10);
        assert_eq!(settings.scoring_weights().free_day, 40.0);
        assert_eq!(settings.scoring_weights().base, 100.0);
        assert_eq!(settings.cache.l1_cache_size, 10_000);
    }
}

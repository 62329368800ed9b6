use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "tabviz.toml";
pub const ENV_PREFIX: &str = "TABVIZ_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    Svg,
    Png,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    pub upload_dir: PathBuf,

    /// Records inspected when inferring column kinds
    #[validate(range(min = 1, max = 100000))]
    pub sniff_rows: usize,

    #[validate(range(min = 1, max = 500))]
    pub histogram_bins: usize,

    #[validate(range(min = 1024))]
    pub max_upload_bytes: usize,

    pub chart_format: ChartFormat,

    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            sniff_rows: 100,
            histogram_bins: 10,
            max_upload_bytes: 64 * 1024 * 1024,
            chart_format: ChartFormat::Svg,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    fn check(self) -> Result<Self> {
        self.validate()?;
        if self.upload_dir.as_os_str().is_empty() {
            return Err(AppError::ValidationError(
                "upload_dir must not be empty".to_string(),
            ));
        }
        if self.chart_format == ChartFormat::Png && !cfg!(feature = "raster") {
            return Err(AppError::ValidationError(
                "chart_format = \"png\" requires the `raster` feature".to_string(),
            ));
        }
        Ok(self)
    }
}

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then `tabviz.toml` in the working directory, then `TABVIZ_*` variables
    pub fn new() -> Self {
        Self::with_file(CONFIG_FILE)
    }

    pub fn with_file(path: impl AsRef<Path>) -> Self {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX));
        Self { figment }
    }

    pub fn load(&self) -> Result<Config> {
        let config: Config = self.figment.extract()?;
        config.check()
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

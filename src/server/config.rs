use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::services::paging::PagingLimits;

#[derive(Deserialize, Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Enables bearer-token identity when set.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialApiConfig {
    database_url: Option<String>,
    listen_addr: Option<String>,
    default_page_size: Option<u64>,
    max_page_size: Option<u64>,
    jwt_secret: Option<String>,
    log_dir: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl ApiConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config: PartialApiConfig = match config_path {
            Some(path_str) if Path::new(path_str).exists() => {
                let path = Path::new(path_str);
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            }
            _ => PartialApiConfig::default(),
        };

        // 2. Load from environment variables
        let env_config: PartialApiConfig = envy::from_env::<PartialApiConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        Self::merge(env_config, file_config)
    }

    fn merge(env: PartialApiConfig, file: PartialApiConfig) -> Result<Self, String> {
        let config = ApiConfig {
            database_url: env
                .database_url
                .or(file.database_url)
                .ok_or("DATABASE_URL is required")?,
            listen_addr: env
                .listen_addr
                .or(file.listen_addr)
                .unwrap_or_else(default_listen_addr),
            default_page_size: env
                .default_page_size
                .or(file.default_page_size)
                .unwrap_or_else(default_page_size),
            max_page_size: env
                .max_page_size
                .or(file.max_page_size)
                .unwrap_or_else(default_max_page_size),
            jwt_secret: env
                .jwt_secret
                .or(file.jwt_secret)
                .filter(|s| !s.trim().is_empty()),
            log_dir: env.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.default_page_size == 0 {
            return Err("DEFAULT_PAGE_SIZE must be at least 1".to_string());
        }
        if self.max_page_size < self.default_page_size {
            return Err(format!(
                "MAX_PAGE_SIZE ({}) must not be smaller than DEFAULT_PAGE_SIZE ({})",
                self.max_page_size, self.default_page_size
            ));
        }
        Ok(())
    }

    pub fn paging_limits(&self) -> PagingLimits {
        PagingLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

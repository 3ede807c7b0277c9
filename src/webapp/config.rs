use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct WebAppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Bearer token forwarded on every API call.
    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialWebAppConfig {
    api_base_url: Option<String>,
    listen_addr: Option<String>,
    api_token: Option<String>,
    log_dir: Option<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:5001".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for WebAppConfig {
    fn default() -> Self {
        Self::merge(PartialWebAppConfig::default(), PartialWebAppConfig::default())
    }
}

impl WebAppConfig {
    /// Environment variables carry a `WEBAPP_` prefix, e.g. `WEBAPP_API_BASE_URL`.
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let file_config: PartialWebAppConfig = match config_path {
            Some(path_str) if Path::new(path_str).exists() => {
                let path = Path::new(path_str);
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            }
            _ => PartialWebAppConfig::default(),
        };

        let env_config: PartialWebAppConfig = envy::prefixed("WEBAPP_")
            .from_env::<PartialWebAppConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        Ok(Self::merge(env_config, file_config))
    }

    fn merge(env: PartialWebAppConfig, file: PartialWebAppConfig) -> Self {
        WebAppConfig {
            api_base_url: env
                .api_base_url
                .or(file.api_base_url)
                .unwrap_or_else(default_api_base_url),
            listen_addr: env
                .listen_addr
                .or(file.listen_addr)
                .unwrap_or_else(default_listen_addr),
            api_token: env
                .api_token
                .or(file.api_token)
                .filter(|t| !t.trim().is_empty()),
            log_dir: env.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_api() {
        let config = WebAppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.listen_addr, "0.0.0.0:5001");
        assert!(config.api_token.is_none());
    }

    #[test]
    fn environment_overrides_file() {
        let file: PartialWebAppConfig =
            toml::from_str("api_base_url = \"http://api:5000\"\napi_token = \"file-token\"\n")
                .unwrap();
        let env = PartialWebAppConfig {
            api_token: Some("env-token".into()),
            ..Default::default()
        };

        let config = WebAppConfig::merge(env, file);
        assert_eq!(config.api_base_url, "http://api:5000");
        assert_eq!(config.api_token.as_deref(), Some("env-token"));
    }
}

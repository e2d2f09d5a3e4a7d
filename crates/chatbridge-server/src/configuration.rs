use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

use chatbridge::providers::configs::{OpenRouterConfig, DEFAULT_MODEL, OPENROUTER_HOST};

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Failed to parse socket address")
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenRouterSettings {
    /// Optional on purpose: a missing key degrades to an explanatory
    /// reply fragment instead of failing startup.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for OpenRouterSettings {
    fn default() -> Self {
        OpenRouterSettings {
            api_key: None,
            model: default_model(),
            referer: None,
            title: None,
        }
    }
}

impl OpenRouterSettings {
    // Convert to the chatbridge provider config. When no key was set
    // through settings, fall back to the conventional variable name
    // used by the bot's deployment environments.
    pub fn into_config(self) -> OpenRouterConfig {
        OpenRouterConfig {
            host: OPENROUTER_HOST.to_string(),
            api_key: self
                .api_key
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok()),
            model: self.model,
            referer: self.referer,
            title: self.title,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub openrouter: OpenRouterSettings,
}

impl Settings {
    /// Load from `CHATBRIDGE_`-prefixed environment variables, e.g.
    /// `CHATBRIDGE_SERVER__PORT` or `CHATBRIDGE_OPENROUTER__API_KEY`.
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CHATBRIDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("CHATBRIDGE_") {
                env::remove_var(&key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.openrouter.api_key, None);
        assert_eq!(settings.openrouter.model, DEFAULT_MODEL);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        env::set_var("CHATBRIDGE_SERVER__PORT", "8080");
        env::set_var("CHATBRIDGE_OPENROUTER__API_KEY", "test-key");
        env::set_var("CHATBRIDGE_OPENROUTER__MODEL", "anthropic/claude-3.5-haiku");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.openrouter.api_key.as_deref(), Some("test-key"));
        assert_eq!(settings.openrouter.model, "anthropic/claude-3.5-haiku");

        // Clean up
        env::remove_var("CHATBRIDGE_SERVER__PORT");
        env::remove_var("CHATBRIDGE_OPENROUTER__API_KEY");
        env::remove_var("CHATBRIDGE_OPENROUTER__MODEL");
    }

    #[test]
    #[serial]
    fn test_api_key_env_fallback() {
        clean_env();
        env::remove_var("OPENROUTER_API_KEY");

        // No key anywhere: the config carries none.
        let config = Settings::new().unwrap().openrouter.into_config();
        assert_eq!(config.api_key, None);

        // Only the conventional variable set: picked up as fallback.
        env::set_var("OPENROUTER_API_KEY", "fallback-key");
        let config = Settings::new().unwrap().openrouter.into_config();
        assert_eq!(config.api_key.as_deref(), Some("fallback-key"));

        // An explicit setting wins over the fallback.
        env::set_var("CHATBRIDGE_OPENROUTER__API_KEY", "explicit-key");
        let config = Settings::new().unwrap().openrouter.into_config();
        assert_eq!(config.api_key.as_deref(), Some("explicit-key"));

        env::remove_var("OPENROUTER_API_KEY");
        env::remove_var("CHATBRIDGE_OPENROUTER__API_KEY");
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let addr = server_settings.socket_addr();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }
}

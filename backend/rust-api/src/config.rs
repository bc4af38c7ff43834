use serde::Deserialize;
use std::env;

/// Default upper bound for a single response time (10 minutes).
pub const DEFAULT_MAX_RESPONSE_TIME_MS: u64 = 600_000;

/// Dev-only credentials for `/metrics`; refused in prod.
pub const DEFAULT_METRICS_AUTH: &str = "admin:changeme";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    /// `username:password` for Basic auth on `/metrics`
    pub metrics_auth: String,
    pub otlp_endpoint: Option<String>,
    pub max_response_time_ms: u64,
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            metrics_auth: DEFAULT_METRICS_AUTH.to_string(),
            otlp_endpoint: None,
            max_response_time_ms: DEFAULT_MAX_RESPONSE_TIME_MS,
            json_logs: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let defaults = Config::default();

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or(defaults.bind_addr);

        let metrics_auth = match settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
        {
            Ok(value) => value,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::NotFound(
                    "metrics.auth (METRICS_AUTH) must be set in production".to_string(),
                ));
            }
            Err(_) => defaults.metrics_auth,
        };

        let otlp_endpoint = settings
            .get_string("telemetry.otlp_endpoint")
            .or_else(|_| env::var("OTEL_EXPORTER_OTLP_ENDPOINT"))
            .ok()
            .filter(|value| !value.is_empty());

        let max_response_time_ms = match settings.get_int("scoring.max_response_time_ms") {
            Ok(value) if value > 0 => value as u64,
            Ok(value) => {
                return Err(config::ConfigError::Message(format!(
                    "scoring.max_response_time_ms must be positive, got {}",
                    value
                )));
            }
            Err(_) => defaults.max_response_time_ms,
        };

        let json_logs = settings
            .get_string("log.format")
            .or_else(|_| env::var("APP_LOG_FORMAT"))
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(defaults.json_logs);

        Ok(Config {
            bind_addr,
            metrics_auth,
            otlp_endpoint,
            max_response_time_ms,
            json_logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "APP__SERVER__BIND_ADDR",
            "APP__SCORING__MAX_RESPONSE_TIME_MS",
            "METRICS_AUTH",
            "BIND_ADDR",
            "OTEL_EXPORTER_OTLP_ENDPOINT",
            "APP_LOG_FORMAT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        clear_env();
        let config = Config::load().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8081");
        assert_eq!(config.max_response_time_ms, DEFAULT_MAX_RESPONSE_TIME_MS);
        assert!(config.otlp_endpoint.is_none());
        assert_eq!(config.metrics_auth, DEFAULT_METRICS_AUTH);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("APP__SERVER__BIND_ADDR", "127.0.0.1:9000");
        env::set_var("APP__SCORING__MAX_RESPONSE_TIME_MS", "30000");
        env::set_var("METRICS_AUTH", "ops:secret");

        let config = Config::load().unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.max_response_time_ms, 30_000);
        assert_eq!(config.metrics_auth, "ops:secret");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_prod_requires_metrics_auth() {
        clear_env();
        env::set_var("APP_ENV", "prod");
        assert!(Config::load().is_err());
        clear_env();
    }
}

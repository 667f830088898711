use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// PostgreSQL connection URL; reviews are kept in memory when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL; catalog responses are not cached when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Allowed browser origin; any origin when unset
    #[serde(default)]
    pub cors_origin: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_language, "en-US");
        assert!(config.database_url.is_none());
        assert!(config.redis_url.is_none());
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result: Result<Config, _> = envy::from_iter(vars(&[("PORT", "8080")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/cinereview"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("CORS_ORIGIN", "http://localhost:5173"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/cinereview")
        );
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));
    }
}

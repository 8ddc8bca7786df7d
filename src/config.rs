use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Not validated here; a missing key surfaces as a 401 from TMDB.
    #[serde(default)]
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Gemini API key
    #[serde(default)]
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model used for recommendations
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Locale sent with every TMDB search
    #[serde(default = "default_search_language")]
    pub search_language: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w300".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_search_language() -> String {
    "en-US".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.warn_missing_keys();
        Ok(config)
    }

    /// Logs a warning for each unset API key
    fn warn_missing_keys(&self) {
        if self.tmdb_api_key.is_empty() {
            tracing::warn!("TMDB_API_KEY is not set; catalog searches will be rejected upstream");
        }
        if self.gemini_api_key.is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set; recommendations will be rejected upstream");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_for_missing_vars() {
        let vars = vec![("TMDB_API_KEY".to_string(), "abc".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "abc");
        assert_eq!(config.gemini_api_key, "");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.search_language, "en-US");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_overrides_read_from_vars() {
        let vars = vec![
            ("GEMINI_MODEL".to_string(), "gemini-2.0-flash".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.port, 8080);
    }
}

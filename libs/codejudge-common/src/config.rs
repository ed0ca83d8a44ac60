// Application configuration
// Read from the process environment, with `.env` loaded first when present

use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ONECOMPILER_URL: &str = "https://onecompiler-apis.p.rapidapi.com/api/v1/run";
pub const DEFAULT_RAPIDAPI_HOST: &str = "onecompiler-apis.p.rapidapi.com";
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_REVIEW_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub compiler: CompilerConfig,
    pub review: ReviewConfig,
}

/// Execution API (OneCompiler via RapidAPI)
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    pub url: String,
    pub rapidapi_key: String,
    pub rapidapi_host: String,
}

/// Chat-completion API used for code review
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

impl Config {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Result<Self> {
        // A missing .env is normal in containers
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR", "0.0.0.0"),
            port,
            compiler: CompilerConfig {
                url: get("ONECOMPILER_URL", DEFAULT_ONECOMPILER_URL),
                rapidapi_key: get("RAPIDAPI_KEY", ""),
                rapidapi_host: get("RAPIDAPI_HOST", DEFAULT_RAPIDAPI_HOST),
            },
            review: ReviewConfig {
                url: get("GROQ_API_URL", DEFAULT_GROQ_API_URL),
                api_key: get("GROQ_API_KEY", ""),
                model: get("REVIEW_MODEL", DEFAULT_REVIEW_MODEL),
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl CompilerConfig {
    pub fn has_credentials(&self) -> bool {
        !self.rapidapi_key.is_empty()
    }
}

impl ReviewConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
        assert_eq!(config.compiler.url, DEFAULT_ONECOMPILER_URL);
        assert_eq!(config.review.model, "llama-3.1-8b-instant");
        assert!(!config.compiler.has_credentials());
        assert!(!config.review.has_credentials());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("ONECOMPILER_URL", "http://localhost:9000/run"),
            ("RAPIDAPI_KEY", "key"),
            ("RAPIDAPI_HOST", "example.test"),
            ("GROQ_API_KEY", "gsk_test"),
            ("REVIEW_MODEL", "llama-3.3-70b-versatile"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.compiler.url, "http://localhost:9000/run");
        assert_eq!(config.compiler.rapidapi_host, "example.test");
        assert!(config.compiler.has_credentials());
        assert!(config.review.has_credentials());
        assert_eq!(config.review.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[("PORT", " "), ("GROQ_API_URL", "")]))
            .unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.review.url, DEFAULT_GROQ_API_URL);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }
}

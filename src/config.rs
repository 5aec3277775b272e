use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for the WebDriver page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// URL of the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Seconds to wait after navigation for the initial page load
    #[serde(default = "default_page_load_wait_secs")]
    pub page_load_wait_secs: u64,

    /// Maximum seconds to wait for a `body` element to appear
    #[serde(default = "default_body_wait_timeout_secs")]
    pub body_wait_timeout_secs: u64,

    /// Seconds to let the page settle after the body appears
    #[serde(default = "default_settle_wait_secs")]
    pub settle_wait_secs: u64,

    /// Where the page screenshot is written (overwritten on each fetch)
    #[serde(default = "default_screenshot_path")]
    pub screenshot_path: PathBuf,
}

/// Configuration for the language-model answer source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model identifier to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Page fetcher settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Answer source settings
    #[serde(default)]
    pub answer: AnswerConfig,

    /// Maximum characters per chunk sent to the answer source
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot run with. The chunker requires
    /// a positive ceiling; catching zero here keeps a bad config file
    /// from aborting a run after the fetch has already happened.
    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.max_chunk_chars == 0 {
            return Err("max_chunk_chars must be positive".into());
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            answer: AnswerConfig::default(),
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            page_load_wait_secs: default_page_load_wait_secs(),
            body_wait_timeout_secs: default_body_wait_timeout_secs(),
            settle_wait_secs: default_settle_wait_secs(),
            screenshot_path: default_screenshot_path(),
        }
    }
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default initial page-load wait
fn default_page_load_wait_secs() -> u64 {
    5
}

/// Default body-element wait timeout
fn default_body_wait_timeout_secs() -> u64 {
    30
}

/// Default post-load settle wait
fn default_settle_wait_secs() -> u64 {
    5
}

/// Default screenshot output path
fn default_screenshot_path() -> PathBuf {
    PathBuf::from("page.png")
}

/// Default OpenAI-compatible API base URL
fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Default model identifier
fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Default maximum tokens per response
fn default_max_tokens() -> u32 {
    150
}

/// Default sampling temperature
fn default_temperature() -> f32 {
    0.5
}

/// Default environment variable for the API key
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Default maximum characters per chunk
fn default_max_chunk_chars() -> usize {
    4000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.fetcher.webdriver_url, "http://localhost:4444");
        assert_eq!(config.fetcher.screenshot_path, PathBuf::from("page.png"));
        assert_eq!(config.answer.model, "gpt-3.5-turbo");
        assert_eq!(config.answer.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.max_chunk_chars, 4000);
    }

    #[test]
    fn test_from_json_partial() {
        let config = AppConfig::from_json(
            r#"{
                "max_chunk_chars": 6000,
                "fetcher": { "webdriver_url": "http://localhost:9515" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.max_chunk_chars, 6000);
        assert_eq!(config.fetcher.webdriver_url, "http://localhost:9515");
        // Unspecified fields fall back to defaults
        assert_eq!(config.fetcher.page_load_wait_secs, 5);
        assert_eq!(config.answer.max_tokens, 150);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(AppConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_from_json_rejects_zero_chunk_ceiling() {
        let result = AppConfig::from_json(r#"{ "max_chunk_chars": 0 }"#);
        let err = result.err().expect("zero ceiling must be rejected");
        assert!(err.to_string().contains("max_chunk_chars"));
    }
}

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Settings for the upstream Anthropic messages API.
///
/// An empty `api_key` is treated as "missing" and is reported per request,
/// never at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub base_url: String,
    /// Host used when building download links for users. Falls back to `base_url`.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl BackendConfig {
    pub fn public_base(&self) -> &str {
        match self.public_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => &self.base_url,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_bytes: default_max_bytes(),
            metadata_file: default_metadata_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_title_prompt")]
    pub title_prompt: String,
    #[serde(default = "default_context_chunks")]
    pub context_chunks: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
            title_prompt: default_title_prompt(),
            context_chunks: default_context_chunks(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("PNWER").prefix_separator("_").separator("__"))
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;

        // Expand environment variables if present like ${ANTHROPIC_API_KEY}
        app_config.server.host = expand_env(&app_config.server.host);
        app_config.llm.api_key = expand_env(&app_config.llm.api_key);
        app_config.backend.base_url = expand_env(&app_config.backend.base_url);
        app_config.backend.public_url = app_config.backend.public_url.as_deref().map(expand_env);
        app_config.uploads.dir = expand_env(&app_config.uploads.dir);

        Ok(app_config)
    }
}

fn expand_env(val: &str) -> String {
    if val.starts_with("${") && val.ends_with('}') {
        let var_name = &val[2..val.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else {
        val.to_string()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_metadata_file() -> String {
    "trained.json".to_string()
}

fn default_system_prompt() -> String {
    "You are PNWER AI, a helpful assistant for PNWER. Answer based on the provided context."
        .to_string()
}

fn default_greeting() -> String {
    "Hi there! I'm PNWER AI, your internal guide for all things related to PNWER. \
     Whether you're prepping for the event, exploring contacts, or need context on key topics, \
     I'm here to help. Just let me know what you're working on!"
        .to_string()
}

fn default_title_prompt() -> String {
    "Summarize the user's first question into a session topic in 5 words maximum, 1 line. \
     If more than 5 words, end with \"...\"."
        .to_string()
}

fn default_context_chunks() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_braced_env_vars() {
        std::env::set_var("PNWER_TEST_EXPAND", "secret");
        assert_eq!(expand_env("${PNWER_TEST_EXPAND}"), "secret");
        assert_eq!(expand_env("${PNWER_TEST_UNSET_VAR}"), "");
        assert_eq!(expand_env("plain"), "plain");
    }

    #[test]
    fn public_base_falls_back_to_base_url() {
        let mut backend = BackendConfig {
            base_url: "https://backend.example".to_string(),
            public_url: None,
        };
        assert_eq!(backend.public_base(), "https://backend.example");

        backend.public_url = Some(String::new());
        assert_eq!(backend.public_base(), "https://backend.example");

        backend.public_url = Some("https://files.example".to_string());
        assert_eq!(backend.public_base(), "https://files.example");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load("does-not-exist-pnwer.yaml").unwrap();
        assert_eq!(config.uploads.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.chat.context_chunks, 5);
        assert_eq!(config.llm.max_tokens, 1000);
    }

    #[test]
    fn env_overrides_nested_keys() {
        std::env::set_var("PNWER_BACKEND__BASE_URL", "https://env-backend.example");
        let config = AppConfig::load("does-not-exist-pnwer.yaml").unwrap();
        std::env::remove_var("PNWER_BACKEND__BASE_URL");
        assert_eq!(config.backend.base_url, "https://env-backend.example");
    }
}

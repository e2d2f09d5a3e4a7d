/// Production OpenRouter endpoint.
pub const OPENROUTER_HOST: &str = "https://openrouter.ai";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Connection settings for the OpenRouter upstream.
///
/// Populated once at process start and read-only thereafter; the reply
/// pipeline never mutates it. A missing `api_key` is not a startup
/// error: the provider degrades to an explanatory reply instead.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Sent as `HTTP-Referer` when present.
    pub referer: Option<String>,
    /// Sent as `X-Title` when present.
    pub title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        OpenRouterConfig {
            host: OPENROUTER_HOST.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            referer: None,
            title: None,
        }
    }
}

use std::fmt;
use std::str::FromStr;

/// Conventional ports. The launcher reclaims both before spawning anything.
pub const STATIC_PORT: u16 = 8000;
pub const GATEWAY_PORT: u16 = 8001;

/// Supported AI backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    DeepSeek,
    SiliconFlow,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::DeepSeek => "deepseek",
            Provider::SiliconFlow => "siliconflow",
        }
    }

    /// Substrings marking an account-balance failure in this provider's raw
    /// error messages. Matched case-sensitively.
    pub fn balance_markers(self) -> &'static [&'static str] {
        match self {
            Provider::DeepSeek => &["Insufficient Balance"],
            Provider::SiliconFlow => &["Insufficient Balance", "insufficient balance"],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deepseek" => Ok(Provider::DeepSeek),
            "siliconflow" => Ok(Provider::SiliconFlow),
            _ => Err(()),
        }
    }
}

/// Connection settings for one backend.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Process-wide configuration, loaded once at startup and read-only for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Raw provider selector; validated by `services::provider::resolve`.
    pub provider: String,
    pub deepseek: ProviderSettings,
    pub siliconflow: ProviderSettings,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Extra CORS origins on top of the local front-end hosts.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Read configuration from the environment. Endpoints and model names
    /// fall back to each provider's defaults; credentials default to empty.
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok();

        AppConfig {
            provider: env("API_PROVIDER").unwrap_or_else(|| "deepseek".to_string()),
            deepseek: ProviderSettings {
                api_key: env("DEEPSEEK_API_KEY").unwrap_or_default(),
                base_url: env("DEEPSEEK_BASE_URL")
                    .unwrap_or_else(|| "https://api.deepseek.com/v1".to_string()),
                model: env("DEEPSEEK_MODEL").unwrap_or_else(|| "deepseek-chat".to_string()),
            },
            siliconflow: ProviderSettings {
                api_key: env("SILICONFLOW_API_KEY").unwrap_or_default(),
                base_url: env("SILICONFLOW_BASE_URL")
                    .unwrap_or_else(|| "https://api.siliconflow.cn/v1".to_string()),
                model: env("SILICONFLOW_MODEL")
                    .unwrap_or_else(|| "deepseek-ai/DeepSeek-V3".to_string()),
            },
            max_tokens: env("MAX_TOKENS").and_then(|v| v.parse().ok()).unwrap_or(4000),
            temperature: env("TEMPERATURE").and_then(|v| v.parse().ok()).unwrap_or(0.7),
            allowed_origins: env("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

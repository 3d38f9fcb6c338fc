use crate::config::{AppConfig, Provider};
use crate::error::ApiError;

/// Connection descriptor for the active backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub provider: Provider,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Pick the active provider's endpoint/credential/model out of the
/// configuration. Pure and deterministic for a given config.
///
/// Runs once at gateway startup (startup-fatal on failure) and again per
/// request; this keeps resolution the single seam where an explicit
/// configuration reload could swap providers without touching the handler.
pub fn resolve(config: &AppConfig) -> Result<Connection, ApiError> {
    let provider: Provider = config
        .provider
        .parse()
        .map_err(|()| ApiError::UnsupportedProvider(config.provider.clone()))?;

    let settings = match provider {
        Provider::DeepSeek => &config.deepseek,
        Provider::SiliconFlow => &config.siliconflow,
    };

    Ok(Connection {
        provider,
        base_url: settings.base_url.clone(),
        api_key: settings.api_key.clone(),
        model: settings.model.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;

    fn config_with(provider: &str) -> AppConfig {
        AppConfig {
            provider: provider.to_string(),
            deepseek: ProviderSettings {
                api_key: "ds-key".to_string(),
                base_url: "https://api.deepseek.com/v1".to_string(),
                model: "deepseek-chat".to_string(),
            },
            siliconflow: ProviderSettings {
                api_key: "sf-key".to_string(),
                base_url: "https://api.siliconflow.cn/v1".to_string(),
                model: "deepseek-ai/DeepSeek-V3".to_string(),
            },
            max_tokens: 4000,
            temperature: 0.7,
            allowed_origins: Vec::new(),
        }
    }

    #[test]
    fn resolve_picks_the_active_provider_settings() {
        let conn = resolve(&config_with("siliconflow")).expect("resolve");
        assert_eq!(conn.provider, Provider::SiliconFlow);
        assert_eq!(conn.api_key, "sf-key");
        assert_eq!(conn.base_url, "https://api.siliconflow.cn/v1");
        assert_eq!(conn.model, "deepseek-ai/DeepSeek-V3");
    }

    #[test]
    fn resolve_is_deterministic() {
        let config = config_with("deepseek");
        let first = resolve(&config).expect("resolve");
        let second = resolve(&config).expect("resolve");
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_selector_fails_with_the_offending_name() {
        let err = resolve(&config_with("openai")).expect_err("should fail");
        match err {
            ApiError::UnsupportedProvider(name) => assert_eq!(name, "openai"),
            other => panic!("expected UnsupportedProvider, got {other:?}"),
        }
    }
}

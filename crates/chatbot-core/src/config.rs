//! Provider configuration loaded from the environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Endpoint key that every provider must define.
pub const CHAT_ENDPOINT: &str = "chat";
/// Endpoint key used for model listing.
pub const LIST_ENDPOINT: &str = "list";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("APIS must contain a 'chat' endpoint (e.g. 'chat:/v1/chat/completions')")]
    MissingChatEndpoint,
}

/// Everything needed to talk to one OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelProvider {
    /// Display name, may be empty
    pub provider: String,
    /// Base URL without a trailing slash
    pub base_url: String,
    pub api_key: String,
    /// Endpoint name -> path, e.g. `chat` -> `/v1/chat/completions`
    pub apis: BTreeMap<String, String>,
    pub model: String,
}

impl ModelProvider {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Reads `MODEL_PROVIDER` (optional), `API_KEY`, `API_URL_BASE`, `APIS`
    /// and `MODEL`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let api_key = required("API_KEY")?;
        let base_url = required("API_URL_BASE")?;
        let apis_raw = required("APIS")?;
        let model = required("MODEL")?;

        let apis = parse_apis(&apis_raw);
        if !apis.contains_key(CHAT_ENDPOINT) {
            return Err(ConfigError::MissingChatEndpoint);
        }

        Ok(Self {
            provider: lookup("MODEL_PROVIDER").unwrap_or_default(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key,
            apis,
            model,
        })
    }

    /// Full URL for a named endpoint, if configured.
    pub fn endpoint_url(&self, name: &str) -> Option<String> {
        self.apis
            .get(name)
            .map(|path| format!("{}{}", self.base_url, path))
    }

    /// API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let visible = chars.len().min(4);
        let tail: String = chars[chars.len() - visible..].iter().collect();
        format!("***********{tail}")
    }
}

/// Parse `name:path,name:path` into an endpoint table.
///
/// Malformed entries are skipped with a warning.
pub fn parse_apis(raw: &str) -> BTreeMap<String, String> {
    let mut apis = BTreeMap::new();

    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        match entry.split_once(':') {
            Some((name, path)) => {
                let (name, path) = (name.trim(), path.trim());
                if name.is_empty() || path.is_empty() {
                    log::warn!("Skipping malformed API entry in APIS: '{}'", entry);
                    continue;
                }
                apis.insert(name.to_string(), path.to_string());
            }
            None => {
                log::warn!(
                    "API entry missing path in APIS: '{}'. Requires 'key:path' format.",
                    entry
                );
            }
        }
    }

    apis
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("MODEL_PROVIDER", "deepseek"),
            ("API_KEY", "sk-test-abcd1234"),
            ("API_URL_BASE", "https://api.example.com/"),
            ("APIS", "chat:/v1/chat/completions, list:/v1/models"),
            ("MODEL", "deepseek-reasoner"),
        ]
    }

    #[test]
    fn loads_complete_configuration() {
        let provider = ModelProvider::from_lookup(lookup_from(&full_env())).unwrap();

        assert_eq!(provider.provider, "deepseek");
        assert_eq!(provider.base_url, "https://api.example.com");
        assert_eq!(provider.model, "deepseek-reasoner");
        assert_eq!(
            provider.endpoint_url("chat").as_deref(),
            Some("https://api.example.com/v1/chat/completions")
        );
        assert_eq!(
            provider.endpoint_url("list").as_deref(),
            Some("https://api.example.com/v1/models")
        );
    }

    #[test]
    fn provider_name_is_optional() {
        let env: Vec<_> = full_env()
            .into_iter()
            .filter(|(k, _)| *k != "MODEL_PROVIDER")
            .collect();
        let provider = ModelProvider::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(provider.provider, "");
    }

    #[test]
    fn missing_required_variables_are_reported() {
        for key in ["API_KEY", "API_URL_BASE", "APIS", "MODEL"] {
            let env: Vec<_> = full_env().into_iter().filter(|(k, _)| *k != key).collect();
            let err = ModelProvider::from_lookup(lookup_from(&env)).unwrap_err();
            assert_eq!(err, ConfigError::MissingVar(key));
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut env = full_env();
        env.retain(|(k, _)| *k != "MODEL");
        env.push(("MODEL", "   "));
        let err = ModelProvider::from_lookup(lookup_from(&env)).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("MODEL"));
    }

    #[test]
    fn chat_endpoint_is_required() {
        let mut env = full_env();
        env.retain(|(k, _)| *k != "APIS");
        env.push(("APIS", "list:/v1/models"));
        let err = ModelProvider::from_lookup(lookup_from(&env)).unwrap_err();
        assert_eq!(err, ConfigError::MissingChatEndpoint);
    }

    #[test]
    fn parse_apis_skips_malformed_entries() {
        let apis = parse_apis("chat:/v1/chat/completions,broken,:/nokey,empty:, list : /v1/models ,");

        assert_eq!(apis.len(), 2);
        assert_eq!(apis["chat"], "/v1/chat/completions");
        assert_eq!(apis["list"], "/v1/models");
    }

    #[test]
    fn parse_apis_keeps_colons_inside_paths() {
        let apis = parse_apis("chat:/v1/models/x:generate");
        assert_eq!(apis["chat"], "/v1/models/x:generate");
    }

    #[test]
    fn masked_api_key_shows_last_four() {
        let provider = ModelProvider::from_lookup(lookup_from(&full_env())).unwrap();
        assert_eq!(provider.masked_api_key(), "***********1234");
    }

    #[test]
    fn masked_api_key_handles_short_keys() {
        let mut provider = ModelProvider::from_lookup(lookup_from(&full_env())).unwrap();
        provider.api_key = "ab".to_string();
        assert_eq!(provider.masked_api_key(), "***********ab");
    }
}

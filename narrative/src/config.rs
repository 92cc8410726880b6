//! Startup configuration read from the environment.

use std::sync::Arc;
use std::time::Duration;

use llm::{DEFAULT_BASE_URL, GeminiClient};
use tracing::warn;

use crate::error::SynthesisError;
use crate::pipeline::Pipeline;
use crate::resolver::ModelResolver;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PREFERENCES: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub default_model: Option<String>,
    pub preferences: Vec<String>,
    pub timeout: Duration,
}

impl Settings {
    /// Read settings from process environment variables.
    ///
    /// # Errors
    ///
    /// [`SynthesisError::AuthenticationMissing`] if neither `GEMINI_API_KEY`
    /// nor `GOOGLE_API_KEY` is set.
    pub fn from_env() -> Result<Self, SynthesisError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SynthesisError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("GOOGLE_API_KEY"))
            .ok_or_else(|| {
                SynthesisError::AuthenticationMissing(
                    "set GEMINI_API_KEY (or GOOGLE_API_KEY) before starting".into(),
                )
            })?;

        let base_url = non_empty("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let default_model = match lookup("GEMINI_MODEL") {
            Some(v) => Some(bare_model_name(&v)).filter(|v| !v.is_empty()),
            None => Some(DEFAULT_MODEL.to_string()),
        };

        let preferences = match non_empty("GEMINI_MODEL_PREFERENCES") {
            Some(list) => list
                .split(',')
                .map(bare_model_name)
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_PREFERENCES.iter().map(|s| s.to_string()).collect(),
        };

        let timeout_secs = match non_empty("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "GEMINI_TIMEOUT_SECS is not a number; using default");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url,
            default_model,
            preferences,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn resolver(&self) -> ModelResolver {
        let resolver = ModelResolver::new(self.preferences.clone());
        match &self.default_model {
            Some(model) => resolver.with_default(model.clone()),
            None => resolver,
        }
    }

    pub fn client(&self) -> Result<GeminiClient, SynthesisError> {
        Ok(GeminiClient::with_timeout(
            &self.base_url,
            self.api_key.clone(),
            self.timeout,
        )?)
    }

    /// Build the shared pipeline backed by the hosted service.
    pub fn pipeline(&self) -> Result<Pipeline, SynthesisError> {
        Ok(Pipeline::new(Arc::new(self.client()?), self.resolver()))
    }
}

/// Discovery reports names without the `models/` resource prefix.
fn bare_model_name(raw: &str) -> String {
    let name = raw.trim();
    name.strip_prefix("models/").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, SynthesisError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_key_fails_at_startup() {
        assert!(matches!(
            settings(&[]),
            Err(SynthesisError::AuthenticationMissing(_))
        ));
        assert!(matches!(
            settings(&[("GEMINI_API_KEY", "  ")]),
            Err(SynthesisError::AuthenticationMissing(_))
        ));
    }

    #[test]
    fn defaults_apply() {
        let s = settings(&[("GOOGLE_API_KEY", "k")]).unwrap();
        assert_eq!(s.api_key, "k");
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.default_model.as_deref(), Some(DEFAULT_MODEL));
        assert_eq!(s.preferences.len(), DEFAULT_PREFERENCES.len());
        assert_eq!(s.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn overrides_are_parsed() {
        let s = settings(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", ""),
            ("GEMINI_MODEL_PREFERENCES", "a, b ,,c"),
            ("GEMINI_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(s.default_model, None);
        assert_eq!(s.preferences, vec!["a", "b", "c"]);
        assert_eq!(s.timeout, Duration::from_secs(30));
        assert_eq!(s.resolver().default_model(), None);
    }

    #[test]
    fn resource_prefixes_are_stripped() {
        let s = settings(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "models/gemini-pro"),
            ("GEMINI_MODEL_PREFERENCES", "models/gemini-2.5-flash, gemini-1.5-pro"),
        ])
        .unwrap();
        assert_eq!(s.default_model.as_deref(), Some("gemini-pro"));
        assert_eq!(s.preferences, vec!["gemini-2.5-flash", "gemini-1.5-pro"]);
    }

    #[test]
    fn bad_timeout_falls_back() {
        let s = settings(&[("GEMINI_API_KEY", "k"), ("GEMINI_TIMEOUT_SECS", "soon")]).unwrap();
        assert_eq!(s.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}

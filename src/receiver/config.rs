use std::collections::HashSet;

use crate::types::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub allowed_tokens: HashSet<String>,
    pub trigger_word: String,
    /// Reject requests failing the token/trigger check instead of answering anyway.
    pub strict_auth: bool,
    pub signing_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_tokens = parse_tokens(&lookup("SLACK_TOKEN").unwrap_or_default());
        let trigger_word = lookup("SLACK_TRIGGERWORD").unwrap_or_default();
        let strict_auth = match lookup("SLACK_STRICT_AUTH") {
            Some(value) => parse_bool("SLACK_STRICT_AUTH", &value)?,
            None => false,
        };
        let signing_secret = lookup("SLACK_SIGNING_SECRET").filter(|s| !s.is_empty());

        Ok(Self {
            allowed_tokens,
            trigger_word,
            strict_auth,
            signing_secret,
        })
    }
}

fn parse_tokens(raw: &str) -> HashSet<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

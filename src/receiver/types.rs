use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackCommand {
    pub token: String,
    pub trigger_word: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    InChannel,
}

#[derive(Debug, Serialize)]
pub struct SlackResponse {
    pub response_type: ResponseType,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to decode form body: {0}")]
    Decode(String),
    #[error("invalid token or trigger word (trigger_word={trigger_word:?})")]
    Auth { trigger_word: String },
    #[error("invalid request signature: {0}")]
    Signature(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a boolean, got {value:?}")]
    InvalidBool { name: &'static str, value: String },
}

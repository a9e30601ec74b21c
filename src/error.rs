use thiserror::Error;

/// Failure of a single outbound request to the verse API.
///
/// These never escape the fetcher: they are folded into a failed
/// `VerseRecord` and from there into an absent question.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("API error (HTTP {0})")]
    Status(u16),
    #[error("{0}")]
    Network(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown translation code: '{0}'. Supported: RV1960, NVI, DHH, RVA, KJV, ESV")]
    UnknownTranslation(String),
    #[error("Invalid API URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("No question is active; request a new question first")]
    NoActiveQuestion,
    #[error("Option {index} is out of range (1-{available})")]
    OptionOutOfRange { index: usize, available: usize },
}

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://bible-api.com/";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bible translations the quiz can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Translation {
    #[default]
    Rv1960,
    Nvi,
    Dhh,
    Rva,
    Kjv,
    Esv,
}

impl Translation {
    pub const ALL: [Translation; 6] = [
        Translation::Rv1960,
        Translation::Nvi,
        Translation::Dhh,
        Translation::Rva,
        Translation::Kjv,
        Translation::Esv,
    ];

    /// Short code as shown to the user, e.g. `RV1960`.
    pub fn code(&self) -> &'static str {
        match self {
            Translation::Rv1960 => "RV1960",
            Translation::Nvi => "NVI",
            Translation::Dhh => "DHH",
            Translation::Rva => "RVA",
            Translation::Kjv => "KJV",
            Translation::Esv => "ESV",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Translation::Rv1960 => "Reina-Valera 1960",
            Translation::Nvi => "Nueva Versión Internacional",
            Translation::Dhh => "Dios Habla Hoy",
            Translation::Rva => "Reina Valera Actualizada",
            Translation::Kjv => "King James Version",
            Translation::Esv => "English Standard Version",
        }
    }

    /// Value sent in the `translation` query parameter.
    pub fn query_code(&self) -> String {
        self.code().to_lowercase()
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Translation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Translation::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownTranslation(s.to_string()))
    }
}

/// Known verse APIs. Only `BibleApi` is ever called; the registry entry for
/// `OpenBibleApi` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiEndpoint {
    BibleApi,
    OpenBibleApi,
}

impl ApiEndpoint {
    pub const ALL: [ApiEndpoint; 2] = [ApiEndpoint::BibleApi, ApiEndpoint::OpenBibleApi];

    pub fn name(&self) -> &'static str {
        match self {
            ApiEndpoint::BibleApi => "Bible API",
            ApiEndpoint::OpenBibleApi => "Open Bible API",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            ApiEndpoint::BibleApi => DEFAULT_API_URL,
            ApiEndpoint::OpenBibleApi => "https://api.openbible.info/",
        }
    }

    pub fn needs_key(&self) -> bool {
        false
    }

    pub fn description(&self) -> &'static str {
        match self {
            ApiEndpoint::BibleApi => "Free API for Bible verses, multiple translations",
            ApiEndpoint::OpenBibleApi => "Open Bible data: cross references and metadata",
        }
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Runtime configuration for the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub api_base_url: String,
    pub translation: Translation,
    pub fetch_timeout: Duration,
    pub probe_timeout: Duration,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            translation: Translation::default(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl QuizConfig {
    pub const API_URL_VAR: &'static str = "BIBLE_QUIZ_API_URL";
    pub const TRANSLATION_VAR: &'static str = "BIBLE_QUIZ_TRANSLATION";
    pub const FETCH_TIMEOUT_VAR: &'static str = "BIBLE_QUIZ_FETCH_TIMEOUT_SECS";
    pub const PROBE_TIMEOUT_VAR: &'static str = "BIBLE_QUIZ_PROBE_TIMEOUT_SECS";

    /// Build a configuration from the environment, loading `.env` first.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env` but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(Self::API_URL_VAR) {
            config.api_base_url = url;
        }
        if let Some(code) = lookup(Self::TRANSLATION_VAR) {
            config.translation = code.parse()?;
        }
        if let Some(secs) = lookup(Self::FETCH_TIMEOUT_VAR) {
            config.fetch_timeout = parse_secs(Self::FETCH_TIMEOUT_VAR, &secs)?;
        }
        if let Some(secs) = lookup(Self::PROBE_TIMEOUT_VAR) {
            config.probe_timeout = parse_secs(Self::PROBE_TIMEOUT_VAR, &secs)?;
        }

        config.validate()
    }

    /// Check the configuration and normalize the base URL to end with `/`.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.api_base_url));
        }
        self.api_base_url = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };

        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("fetch timeout"));
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("probe timeout"));
        }

        debug!(
            api_base_url = %self.api_base_url,
            translation = %self.translation,
            "Validated quiz configuration"
        );
        Ok(self)
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translation = translation;
        self
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        })
}

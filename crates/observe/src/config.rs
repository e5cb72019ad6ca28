//! Logging options of an application embedding the SDK, usually read from
//! the `[logging]` table of its TOML config.

use {
    serde::{Deserialize, de},
    std::str::FromStr,
    tracing::Level,
};

/// Directives used when nothing else is configured: SDK crates at debug,
/// everything else at warn.
pub const DEFAULT_FILTER: &str = "warn,marketplace_sdk=debug,model=debug";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Config {
    /// `EnvFilter` directives, e.g. `info,marketplace_sdk=trace`.
    pub filter: String,
    /// Events at this level or more severe go to stderr, the rest to stdout.
    #[serde(deserialize_with = "level")]
    pub stderr_threshold: Level,
    pub format: Format,
}

impl Config {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Default::default()
        }
    }

    pub fn json(mut self) -> Self {
        self.format = Format::Json;
        self
    }

    pub fn with_stderr_threshold(mut self, level: Level) -> Self {
        self.stderr_threshold = level;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
            stderr_threshold: Level::ERROR,
            format: Format::Text,
        }
    }
}

fn level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: de::Deserializer<'de>,
{
    let level = String::deserialize(deserializer)?;
    Level::from_str(&level).map_err(de::Error::custom)
}

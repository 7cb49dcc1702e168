//! Process configuration, consumed from the environment.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("env variable {0} is not set")]
    MissingVar(&'static str),
}

/// Everything the process needs before it can serve traffic.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: String,
    pub database_url: String,
    pub exchangerates_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: require("PORT")?,
            database_url: require("DATABASE_URL")?,
            exchangerates_token: require("EXCHANGERATESAPI_TOKEN")?,
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_is_named_in_the_error() {
        let err = require("LEDGERD_TEST_UNSET_VAR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "env variable LEDGERD_TEST_UNSET_VAR is not set"
        );
    }
}

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub struct UdfConfig {
    pub log_filter: String,
    pub log_format: LogFormat,
    pub endpoint_url: Option<String>,
}

impl Default for UdfConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::Json,
            endpoint_url: None,
        }
    }
}

impl UdfConfig {
    /// Reads the loader environment. Credentials and region are left to the
    /// AWS default provider chain.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQS_UDF_LOG_FORMAT` is set to an unknown format.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// # Errors
    ///
    /// Returns an error if the log format value is not `json` or `text`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let log_format = match lookup("SQS_UDF_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") => defaults.log_format,
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(other) => return Err(format!("SQS_UDF_LOG_FORMAT: unknown format `{other}`")),
        };

        Ok(Self {
            log_filter: lookup("SQS_UDF_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            log_format,
            endpoint_url: lookup("SQS_UDF_ENDPOINT_URL").filter(|v| !v.trim().is_empty()),
        })
    }
}

static LOADED: Lazy<Result<UdfConfig, String>> = Lazy::new(UdfConfig::from_env);

/// The configuration read once when the module is first used.
pub fn loaded() -> &'static Result<UdfConfig, String> {
    &LOADED
}

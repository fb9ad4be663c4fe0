use globset::{Glob, GlobSet, GlobSetBuilder};
use reqwest::Url;
use reqwest::header::{HeaderName, HeaderValue};

use crate::config::SnoopConfig;
use crate::error::ConfigError;

impl SnoopConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::invalid(
                "threads",
                "0",
                "Allow at least one request in flight",
            ));
        }
        if self.fuel == 0 {
            return Err(ConfigError::invalid(
                "fuel",
                "0",
                "Loaders need a positive loop iteration limit",
            ));
        }
        if self.max_call_depth == 0 {
            return Err(ConfigError::invalid(
                "maxCallDepth",
                "0",
                "Calling a loader needs a call depth of at least one",
            ));
        }

        if let Some(base_url) = &self.base_url {
            parse_url("baseUrl", base_url)?;
        }
        if let Some(proxy) = &self.proxy {
            parse_url("proxy", proxy)?;
        }
        for header in &self.headers {
            parse_header(header)?;
        }
        build_include_set(&self.include)?;

        Ok(())
    }
}

/// Parse an absolute http(s) URL.
pub fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| {
        ConfigError::invalid(field, value, format!("Expected an absolute URL ({e})"))
    })?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::invalid(
            field,
            value,
            "Expected an http:// or https:// URL with a host",
        )),
    }
}

/// Split a "Name: value" header at its first colon.
///
/// Both parts are trimmed; the value may itself contain colons.
pub fn parse_header(header: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let invalid = |hint: &str| ConfigError::invalid("headers", header, hint);

    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| invalid("Headers are written as \"Name: value\""))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| invalid("Header name is empty or contains invalid characters"))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|_| invalid("Header value contains invalid characters"))?;
    Ok((name, value))
}

/// Compile the directory-mode include patterns.
pub fn build_include_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    if patterns.is_empty() {
        return Err(ConfigError::invalid(
            "include",
            "[]",
            "Give at least one glob pattern, for example \"**/*.js\"",
        ));
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| ConfigError::invalid("include", pattern, e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ConfigError::invalid("include", patterns.join(", "), e.to_string()))
}

//! Connection options parsed from URLs.
//!
//! A connection URL names the driver (scheme), the store (path), and
//! adapter settings (query parameters), e.g.
//! `memory://articles?dialect=postgres&capacity=512`.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::error::RuntimeError;

/// Parsed connection options.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionOptions {
    /// URL scheme selecting the driver
    pub scheme: String,
    /// Store name (the URL's authority/path)
    pub store: String,
    /// Percent-decoded query parameters
    pub params: HashMap<String, String>,
}

impl ConnectionOptions {
    /// Parses a connection URL.
    ///
    /// # Returns
    /// `Err(RuntimeError::InvalidUrl)` when the URL has no scheme
    /// separator or a parameter cannot be percent-decoded.
    pub fn parse(url: &str) -> Result<Self, RuntimeError> {
        let invalid = |reason: &str| RuntimeError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, rest) = url.split_once("://").ok_or_else(|| invalid("missing '://'"))?;
        if scheme.is_empty() {
            return Err(invalid("empty scheme"));
        }

        let (store, query) = match rest.split_once('?') {
            Some((store, query)) => (store, Some(query)),
            None => (rest, None),
        };

        let mut params = HashMap::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                let key = decode(key).ok_or_else(|| invalid("parameter key is not UTF-8"))?;
                let value = decode(value).ok_or_else(|| invalid("parameter value is not UTF-8"))?;
                params.insert(key, value);
            }
        }

        Ok(Self {
            scheme: scheme.to_string(),
            store: store.trim_end_matches('/').to_string(),
            params,
        })
    }

    /// Returns a parameter value.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The dialect name, defaulting to the generic one.
    pub fn dialect(&self) -> &str {
        self.param("dialect").unwrap_or("ansi")
    }
}

fn decode(input: &str) -> Option<String> {
    percent_decode_str(input)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

//! Tracing setup and log-safe rendering of secrets.

use std::fmt;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over `default_level`. Calling this twice is harmless: the
/// second registration is ignored.
pub fn init_tracing(default_level: &str, format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if format == "json" {
        registry
            .with(tracing_fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_fmt::layer().with_target(true))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: tracing already initialized: {}", e);
    }
}

/// API key masked for logs: first 8 characters, then `***`
#[derive(Clone, Debug)]
pub struct SensitiveApiKey<'a> {
    inner: &'a str,
}

impl<'a> SensitiveApiKey<'a> {
    /// # Example
    /// ```
    /// use hybrid_savings::logging::SensitiveApiKey;
    ///
    /// let key = "sb-anon-0123456789abcdef";
    /// assert_eq!(format!("{}", SensitiveApiKey::new(key)), "sb-anon-***");
    /// ```
    pub fn new(key: &'a str) -> Self {
        Self { inner: key }
    }
}

impl fmt::Display for SensitiveApiKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 8;
        match self.inner.get(..visible_len) {
            Some(prefix) if self.inner.len() > visible_len => write!(f, "{}***", prefix),
            _ => write!(f, "***"),
        }
    }
}

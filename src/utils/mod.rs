//! Utility functions module

use crate::error::{Error, Result};
use reqwest::{redirect, Client};
use std::time::Duration;

/// HTTP client builder
///
/// Every search and page fetch builds its own short-lived client, so idle
/// connection pooling is off.
pub struct HttpClientBuilder {
    timeout: Duration,
    connect_timeout: Option<Duration>,
    pool_max_idle_per_host: usize,
    user_agent: Option<String>,
    redirect: Option<redirect::Policy>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: None,
            pool_max_idle_per_host: 0,
            user_agent: None,
            redirect: None,
        }
    }
}

impl HttpClientBuilder {
    /// Create a new HTTP client builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set total request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout
    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    /// Set User-Agent
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set redirect policy (reqwest follows up to 10 by default)
    #[must_use]
    pub fn redirect(mut self, policy: redirect::Policy) -> Self {
        self.redirect = Some(policy);
        self
    }

    /// Build HTTP client
    pub fn build(self) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host);

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if let Some(policy) = self.redirect {
            builder = builder.redirect(policy);
        }

        builder
            .build()
            .map_err(|e| Error::HttpRequest(e.to_string()))
    }
}

/// Time utilities
pub mod time {
    use std::time::{Duration, Instant};

    /// Duration in whole milliseconds, saturating
    #[must_use]
    pub fn duration_ms(duration: Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }

    /// Milliseconds elapsed since `start`
    #[must_use]
    pub fn elapsed_ms(start: Instant) -> u64 {
        duration_ms(start.elapsed())
    }
}

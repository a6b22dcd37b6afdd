use std::time::Duration;

use crate::error::{Error, Result};

/// Default TCP port of a PJLink device.
pub const DEFAULT_PORT: u16 = 4352;

/// Longest secret a device will accept.
pub const MAX_SECRET_LEN: usize = 32;

/// Where to reach a device and how to authenticate with it.
#[derive(Clone)]
pub struct Endpoint {
    host: String,
    port: u16,
    secret: String,
    timeout: Option<Duration>,
}

impl Endpoint {
    /// Fails with [`Error::Configuration`] for an empty host or a secret
    /// longer than [`MAX_SECRET_LEN`] characters, or one that isn't ASCII.
    /// An empty secret is valid.
    pub fn new(host: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let host = host.into();
        let secret = secret.into();

        if host.trim().is_empty() {
            return Err(Error::Configuration("host must not be empty".into()));
        }
        let secret_len = secret.chars().count();
        if secret_len > MAX_SECRET_LEN {
            return Err(Error::Configuration(format!(
                "secret is {} characters, at most {} allowed",
                secret_len, MAX_SECRET_LEN
            )));
        }
        if !secret.is_ascii() {
            return Err(Error::Configuration("secret must be ASCII".into()));
        }

        Ok(Self {
            host,
            port: DEFAULT_PORT,
            secret,
            timeout: None,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bounds each connect, send and receive. Unset by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

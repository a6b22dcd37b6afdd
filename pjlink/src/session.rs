//! One connection, one command.
//!
//! A [`Session`] is opened for every command: connect, read the greeting,
//! derive the auth prefix if the device asks for one, exchange exactly one
//! frame each way and close. Sessions are never reused, each greeting
//! carries a fresh seed.

use std::future::Future;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;

use crate::auth::{self, AuthToken};
use crate::codec::PjlinkCodec;
use crate::command::{Command, PREFIX};
use crate::config::Endpoint;
use crate::error::{Error, Result};

const GREETING_MARKER: &str = "PJLINK ";

type Channel = Framed<TcpStream, PjlinkCodec>;

/// Seed carried by a greeting, `None` if the device doesn't want authentication.
pub fn parse_greeting(line: &str) -> Result<Option<&str>> {
    let invalid = || Error::Protocol(format!("invalid greeting {:?}", line));

    let rest = line.strip_prefix(GREETING_MARKER).ok_or_else(invalid)?;
    match rest.trim_end() {
        "0" => Ok(None),
        version => {
            let seed = version.strip_prefix("1 ").ok_or_else(invalid)?;
            if seed.is_empty() || seed.contains(char::is_whitespace) {
                return Err(invalid());
            }
            Ok(Some(seed))
        }
    }
}

pub struct Session {
    channel: Channel,
    auth_prefix: Option<AuthToken>,
    timeout: Option<Duration>,
}

impl Session {
    pub async fn open(endpoint: &Endpoint) -> Result<Self> {
        let timeout = endpoint.timeout();

        tracing::debug!(%endpoint, "connecting");
        let stream = bounded(timeout, "connect", async {
            TcpStream::connect((endpoint.host(), endpoint.port()))
                .await
                .map_err(Error::from)
        })
        .await?;
        let mut channel = Framed::new(stream, PjlinkCodec::new());

        let greeting = bounded(timeout, "greeting", next_frame(&mut channel)).await?;
        let auth_prefix = parse_greeting(&greeting)?.map(|seed| {
            tracing::debug!(%endpoint, "device requires authentication");
            auth::derive(seed, endpoint.secret())
        });

        Ok(Self {
            channel,
            auth_prefix,
            timeout,
        })
    }

    pub fn requires_auth(&self) -> bool {
        self.auth_prefix.is_some()
    }

    pub fn auth_prefix(&self) -> Option<&AuthToken> {
        self.auth_prefix.as_ref()
    }

    /// The full line sent for `command`, auth prefix included.
    pub fn frame(&self, command: &Command) -> String {
        match &self.auth_prefix {
            Some(token) => format!("{}{}{}", token, PREFIX, command.body()),
            None => format!("{}{}", PREFIX, command.body()),
        }
    }

    /// Sends `command`, reads one response line and closes the connection,
    /// whether or not the exchange succeeded.
    pub async fn exchange(mut self, command: &Command) -> Result<String> {
        let result = self.round_trip(command).await;
        self.close().await;
        result
    }

    pub async fn close(mut self) {
        if let Err(e) = bounded(self.timeout, "close", self.channel.close()).await {
            tracing::debug!("closing connection: {}", e);
        }
    }

    async fn round_trip(&mut self, command: &Command) -> Result<String> {
        let frame = self.frame(command);
        tracing::debug!(command = %command.body(), "sending");

        let channel = &mut self.channel;
        bounded(self.timeout, "send", channel.send(frame)).await?;
        let response = bounded(self.timeout, "receive", next_frame(channel)).await?;

        tracing::debug!(%response, "received");
        Ok(response)
    }
}

/// Runs `command` on its own connection and returns the raw response line.
pub async fn execute(endpoint: &Endpoint, command: &Command) -> Result<String> {
    Session::open(endpoint).await?.exchange(command).await
}

/// Runs `op` until it finishes or `token` is cancelled. On cancellation the
/// operation, and with it its connection, is dropped before this returns.
pub async fn cancellable<T, F>(token: &CancellationToken, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Cancelled),
        result = op => result,
    }
}

async fn next_frame(channel: &mut Channel) -> Result<String> {
    match channel.next().await {
        Some(frame) => frame,
        None => Err(Error::Protocol("connection closed by device".into())),
    }
}

async fn bounded<T, F>(timeout: Option<Duration>, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout {
        None => fut.await,
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Transport(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("{} timed out after {:?}", what, limit),
            ))),
        },
    }
}

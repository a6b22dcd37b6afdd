use std::sync::Mutex;

use crate::auth::AuthToken;
use crate::command::{Command, Mnemonic};
use crate::config::Endpoint;
use crate::error::{Error, RejectCode, Result};
use crate::parse;
use crate::session::Session;
use crate::types::{ErrorStatus, InputSource, LampInfo, MuteState, PowerState};

/// Controls a single PJLink device.
///
/// Every call opens its own connection and closes it before returning, so a
/// `Client` can be shared between tasks and used concurrently. Concurrent
/// calls are not ordered with respect to each other.
pub struct Client {
    endpoint: Endpoint,
    last_token: Mutex<Option<AuthToken>>,
}

impl Client {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            last_token: Mutex::new(None),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Token derived during the most recent handshake. Diagnostics only, a
    /// token is never valid for more than the connection it was derived on.
    pub fn last_auth_token(&self) -> Option<AuthToken> {
        self.last_token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Checks the configured secret. `Ok(false)` means the device rejected
    /// it; connection problems are returned as errors.
    pub async fn authenticate(&self) -> Result<bool> {
        let session = self.open().await?;
        if !session.requires_auth() {
            tracing::debug!(endpoint = %self.endpoint, "no authentication required");
            session.close().await;
            return Ok(true);
        }

        let response = session.exchange(&Command::query(Mnemonic::Power)).await?;
        let accepted = !parse::is_auth_failure(&response);
        if !accepted {
            tracing::warn!(endpoint = %self.endpoint, "authentication failed");
        }
        Ok(accepted)
    }

    /// Power state as reported by the device. Error responses and
    /// unreadable values are [`PowerState::Unknown`] rather than an error.
    pub async fn power(&self) -> Result<PowerState> {
        let response = self.execute(&Command::query(Mnemonic::Power)).await?;
        match parse::power_state(&response) {
            Err(Error::CommandRejected(code)) => {
                tracing::debug!(endpoint = %self.endpoint, %code, "power query rejected");
                Ok(PowerState::Unknown)
            }
            result => result,
        }
    }

    /// Turns the device on or off. Doesn't wait for warm-up or cool-down to finish.
    pub async fn set_power(&self, on: bool) -> Result<()> {
        let command = Command::set(Mnemonic::Power, on as u8);
        let response = self.execute(&command).await?;
        parse::acknowledgement(Mnemonic::Power, &response)
    }

    pub async fn input(&self) -> Result<InputSource> {
        let response = self.execute(&Command::query(Mnemonic::Input)).await?;
        parse::input_source(&response)
    }

    /// Inputs the device has, in the order it lists them. `None` if the
    /// device can't enumerate its inputs.
    pub async fn inputs(&self) -> Result<Option<Vec<InputSource>>> {
        let response = self.execute(&Command::query(Mnemonic::InputList)).await?;
        match parse::input_list(&response) {
            Ok(inputs) => Ok(Some(inputs)),
            Err(Error::CommandRejected(code)) if code != RejectCode::AuthenticationFailure => {
                tracing::debug!(endpoint = %self.endpoint, %code, "input list unsupported");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Switches to `source` and returns the input the device reports afterwards.
    ///
    /// The read-back runs on a second connection. If only that fails, the
    /// error is wrapped in [`Error::Requery`].
    pub async fn set_input(&self, source: InputSource) -> Result<InputSource> {
        let response = self
            .execute(&Command::set(Mnemonic::Input, source.code()))
            .await?;
        parse::acknowledgement(Mnemonic::Input, &response)?;

        self.input().await.map_err(|e| Error::Requery(Box::new(e)))
    }

    pub async fn mute(&self) -> Result<MuteState> {
        let response = self.execute(&Command::query(Mnemonic::AvMute)).await?;
        parse::mute_state(&response)
    }

    /// Sets audio/video mute and returns the state read back afterwards,
    /// with the same [`Error::Requery`] rule as [`Client::set_input`].
    pub async fn set_mute(&self, state: MuteState) -> Result<MuteState> {
        let response = self
            .execute(&Command::set(Mnemonic::AvMute, state.code()))
            .await?;
        parse::acknowledgement(Mnemonic::AvMute, &response)?;

        self.mute().await.map_err(|e| Error::Requery(Box::new(e)))
    }

    pub async fn error_status(&self) -> Result<ErrorStatus> {
        let response = self.execute(&Command::query(Mnemonic::ErrorStatus)).await?;
        parse::error_status(&response)
    }

    /// The first lamp. See [`Client::lamps`] for devices with more than one.
    pub async fn lamp(&self) -> Result<LampInfo> {
        let lamps = self.lamps().await?;
        lamps
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("no lamp reported".into()))
    }

    pub async fn lamps(&self) -> Result<Vec<LampInfo>> {
        let response = self.execute(&Command::query(Mnemonic::Lamp)).await?;
        parse::lamps(&response)
    }

    pub async fn name(&self) -> Result<String> {
        self.text(Mnemonic::Name).await
    }

    pub async fn manufacturer(&self) -> Result<String> {
        self.text(Mnemonic::Manufacturer).await
    }

    pub async fn product_name(&self) -> Result<String> {
        self.text(Mnemonic::ProductName).await
    }

    pub async fn other_info(&self) -> Result<String> {
        self.text(Mnemonic::OtherInfo).await
    }

    /// Highest protocol class the device implements.
    pub async fn class(&self) -> Result<u8> {
        let response = self.execute(&Command::query(Mnemonic::Class)).await?;
        parse::class(&response)
    }

    async fn text(&self, mnemonic: Mnemonic) -> Result<String> {
        let response = self.execute(&Command::query(mnemonic)).await?;
        parse::text(mnemonic, &response)
    }

    async fn open(&self) -> Result<Session> {
        let session = Session::open(&self.endpoint).await?;
        *self.last_token.lock().unwrap_or_else(|e| e.into_inner()) =
            session.auth_prefix().cloned();
        Ok(session)
    }

    async fn execute(&self, command: &Command) -> Result<String> {
        self.open().await?.exchange(command).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

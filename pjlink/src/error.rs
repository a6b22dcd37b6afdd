/// Reason a device gave for refusing a command (`ERR1`..`ERR4`, `ERRA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RejectCode {
    /// `ERR1`: the command is not defined for this device.
    UndefinedCommand,
    /// `ERR2`: the parameter is out of range.
    OutOfParameter,
    /// `ERR3`: the device can't accept the command right now (e.g. warming up).
    UnavailableTime,
    /// `ERR4`: the device reported a failure.
    ProjectorFailure,
    /// `ERRA`: the auth prefix was wrong or missing.
    AuthenticationFailure,
}

impl RejectCode {
    /// Maps the character following `ERR` on the wire.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::UndefinedCommand),
            '2' => Some(Self::OutOfParameter),
            '3' => Some(Self::UnavailableTime),
            '4' => Some(Self::ProjectorFailure),
            'A' | 'a' => Some(Self::AuthenticationFailure),
            _ => None,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::UndefinedCommand => "ERR1",
            Self::OutOfParameter => "ERR2",
            Self::UnavailableTime => "ERR3",
            Self::ProjectorFailure => "ERR4",
            Self::AuthenticationFailure => "ERRA",
        }
    }
}

impl std::fmt::Display for RejectCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::UndefinedCommand => "undefined command",
            Self::OutOfParameter => "out of parameter",
            Self::UnavailableTime => "unavailable time",
            Self::ProjectorFailure => "projector failure",
            Self::AuthenticationFailure => "authentication failure",
        };
        write!(f, "{} ({})", text, self.marker())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Transport(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("command rejected: {0}")]
    CommandRejected(RejectCode),
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The set command was acknowledged but reading back the new state failed.
    #[error("command accepted, but re-query failed: {0}")]
    Requery(#[source] Box<Error>),
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn rejection(&self) -> Option<RejectCode> {
        match self {
            Self::CommandRejected(code) => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

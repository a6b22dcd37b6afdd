//! Client for PJLink class 1, the line based TCP protocol used to control
//! projectors and flat panels.
//!
//! ```no_run
//! # async fn demo() -> pjlink::Result<()> {
//! let endpoint = pjlink::Endpoint::new("192.168.1.50", "secret")?;
//! let client = pjlink::Client::new(endpoint);
//!
//! if client.power().await? == pjlink::PowerState::StandBy {
//!     client.set_power(true).await?;
//! }
//! let input = client.set_input(pjlink::InputSource::DigitalHdmi).await?;
//! println!("now showing {}", input);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod codec;
pub mod command;
pub mod parse;
pub mod session;

mod client;
mod config;
mod error;
mod types;

pub use auth::AuthToken;
pub use client::Client;
pub use command::{Command, Mnemonic};
pub use config::{Endpoint, DEFAULT_PORT, MAX_SECRET_LEN};
pub use error::{Error, RejectCode, Result};
pub use session::{cancellable, execute, Session};
pub use types::{
    ErrorStatus, InputFamily, InputSource, LampInfo, MuteState, PowerState, Severity,
};

// the cancellation token type accepted by `cancellable`
pub use tokio_util::sync::CancellationToken;

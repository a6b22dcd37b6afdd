use pjlink::{Client, ErrorStatus, InputSource, LampInfo, MuteState, PowerState};

#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize, clap::ValueEnum)]
pub enum MuteTarget {
    Video,
    Audio,
    All,
}

#[derive(Debug, serde::Deserialize, serde::Serialize, clap::Subcommand)]
pub enum Command {
    /// Check the configured password
    Auth,
    /// Show the power state
    Power,
    /// Power on
    On,
    /// Power off
    Off,
    /// Show the current input, or switch to the input with the given code
    Input { code: Option<u8> },
    /// List the inputs the device has
    Inputs,
    /// Show the mute state, or mute/unmute video, audio or both
    Mute {
        #[clap(value_enum)]
        target: Option<MuteTarget>,
        #[clap(long)]
        off: bool,
    },
    /// Show the error status
    Errors,
    /// Show lamp hours
    Lamp,
    /// Show name, manufacturer, product and class
    Info,
}

#[derive(Debug, clap::Parser)]
#[clap(name = "pjctl", about = "Control projectors over PJLink")]
pub struct Args {
    #[clap(long, env = "PJLINK_HOST")]
    pub host: String,

    #[clap(long, env = "PJLINK_PORT", default_value_t = pjlink::DEFAULT_PORT)]
    pub port: u16,

    #[clap(long, env = "PJLINK_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Give up on connect, send or receive after this many milliseconds
    #[clap(long)]
    pub timeout: Option<u64>,

    /// Print results as JSON
    #[clap(long)]
    pub json: bool,

    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, serde::Serialize)]
pub struct Info {
    pub name: String,
    pub manufacturer: String,
    pub product_name: String,
    pub other_info: String,
    pub class: u8,
}

/// What a command produced, ready to be printed.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Report {
    Authenticated(bool),
    Power(PowerState),
    Done,
    Input(InputSource),
    /// `None` if the device can't list its inputs.
    Inputs(Option<Vec<InputSource>>),
    Mute(MuteState),
    Errors(ErrorStatus),
    Lamps(Vec<LampInfo>),
    Info(Info),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    PjLink(#[from] pjlink::Error),

    #[error("input {0} is not defined by PJLink")]
    UnknownInput(u8),
}

pub async fn run(client: &Client, cmd: &Command) -> Result<Report, Error> {
    let report = match cmd {
        Command::Auth => Report::Authenticated(client.authenticate().await?),
        Command::Power => Report::Power(client.power().await?),
        Command::On => {
            client.set_power(true).await?;
            Report::Done
        }
        Command::Off => {
            client.set_power(false).await?;
            Report::Done
        }
        Command::Input { code: None } => Report::Input(client.input().await?),
        Command::Input { code: Some(code) } => {
            let source = InputSource::from_code(*code).ok_or(Error::UnknownInput(*code))?;
            Report::Input(client.set_input(source).await?)
        }
        Command::Inputs => Report::Inputs(client.inputs().await?),
        Command::Mute { target: None, .. } => Report::Mute(client.mute().await?),
        Command::Mute {
            target: Some(target),
            off,
        } => {
            let state = match (target, off) {
                (MuteTarget::Video, false) => MuteState::VideoMuteOn,
                (MuteTarget::Video, true) => MuteState::VideoMuteOff,
                (MuteTarget::Audio, false) => MuteState::AudioMuteOn,
                (MuteTarget::Audio, true) => MuteState::AudioMuteOff,
                (MuteTarget::All, false) => MuteState::AudioVideoMuteOn,
                (MuteTarget::All, true) => MuteState::AudioVideoMuteOff,
            };
            Report::Mute(client.set_mute(state).await?)
        }
        Command::Errors => Report::Errors(client.error_status().await?),
        Command::Lamp => Report::Lamps(client.lamps().await?),
        Command::Info => Report::Info(Info {
            name: client.name().await?,
            manufacturer: client.manufacturer().await?,
            product_name: client.product_name().await?,
            other_info: client.other_info().await?,
            class: client.class().await?,
        }),
    };

    Ok(report)
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Authenticated(true) => write!(f, "authenticated"),
            Report::Authenticated(false) => write!(f, "authentication failed"),
            Report::Power(state) => write!(f, "power: {}", state),
            Report::Done => write!(f, "ok"),
            Report::Input(source) => write!(f, "input: {}", source),
            Report::Inputs(None) => write!(f, "device can't list its inputs"),
            Report::Inputs(Some(inputs)) if inputs.is_empty() => write!(f, "no inputs"),
            Report::Inputs(Some(inputs)) => {
                for (i, source) in inputs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{:>2}  {}", source.code(), source.label())?;
                }
                Ok(())
            }
            Report::Mute(state) => write!(f, "{}", state),
            Report::Errors(status) => {
                for (i, (name, severity)) in status.fields().iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{:<12} {}", name, severity)?;
                }
                Ok(())
            }
            Report::Lamps(lamps) => {
                for (i, lamp) in lamps.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "lamp {}: {} hours, {}",
                        i + 1,
                        lamp.hours,
                        if lamp.is_on { "on" } else { "off" }
                    )?;
                }
                Ok(())
            }
            Report::Info(info) => {
                writeln!(f, "name:         {}", info.name)?;
                writeln!(f, "manufacturer: {}", info.manufacturer)?;
                writeln!(f, "product:      {}", info.product_name)?;
                writeln!(f, "other:        {}", info.other_info)?;
                write!(f, "class:        {}", info.class)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_mute_subcommand() {
        let args = Args::try_parse_from(["pjctl", "--host", "beamer", "mute", "video", "--off"])
            .unwrap();
        assert_eq!(args.port, pjlink::DEFAULT_PORT);
        assert!(matches!(
            args.cmd,
            Command::Mute {
                target: Some(MuteTarget::Video),
                off: true
            }
        ));
    }

    #[test]
    fn parses_input_switch() {
        let args =
            Args::try_parse_from(["pjctl", "--host", "beamer", "--port", "4353", "input", "33"])
                .unwrap();
        assert_eq!(args.port, 4353);
        assert!(matches!(args.cmd, Command::Input { code: Some(33) }));
    }

    #[test]
    fn renders_reports() {
        assert_eq!(Report::Power(PowerState::WarmUp).to_string(), "power: warm-up");
        assert_eq!(
            Report::Inputs(None).to_string(),
            "device can't list its inputs"
        );
        assert_eq!(
            Report::Inputs(Some(vec![InputSource::RgbDSub, InputSource::DigitalHdmi]))
                .to_string(),
            "11  RGB D-Sub\n33  HDMI"
        );
    }

    #[test]
    fn serializes_reports() {
        let json = serde_json::to_string(&Report::Inputs(None)).unwrap();
        assert_eq!(json, r#"{"inputs":null}"#);
    }
}

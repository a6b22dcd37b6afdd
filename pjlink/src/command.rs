/// Marker in front of every class 1 command and response.
pub const PREFIX: &str = "%1";

/// Parameter asking the device for its current value.
pub const QUERY: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Power,
    Input,
    AvMute,
    ErrorStatus,
    Lamp,
    InputList,
    Name,
    Manufacturer,
    ProductName,
    OtherInfo,
    Class,
}

impl Mnemonic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Power => "POWR",
            Self::Input => "INPT",
            Self::AvMute => "AVMT",
            Self::ErrorStatus => "ERST",
            Self::Lamp => "LAMP",
            Self::InputList => "INST",
            Self::Name => "NAME",
            Self::Manufacturer => "INF1",
            Self::ProductName => "INF2",
            Self::OtherInfo => "INFO",
            Self::Class => "CLSS",
        }
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command without the `%1` marker or auth prefix, e.g. `POWR ?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    mnemonic: Mnemonic,
    param: String,
}

impl Command {
    pub fn query(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic,
            param: QUERY.to_string(),
        }
    }

    pub fn set(mnemonic: Mnemonic, param: impl std::fmt::Display) -> Self {
        Self {
            mnemonic,
            param: param.to_string(),
        }
    }

    pub fn mnemonic(&self) -> Mnemonic {
        self.mnemonic
    }

    pub fn body(&self) -> String {
        format!("{} {}", self.mnemonic, self.param)
    }
}

//! Typed values carried by PJLink responses.

use InputSource::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PowerState {
    /// Anything the device reported that isn't one of the four states,
    /// including an error response to the query.
    Unknown,
    StandBy,
    PoweredOn,
    Cooling,
    WarmUp,
}

impl PowerState {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::StandBy,
            1 => Self::PoweredOn,
            2 => Self::Cooling,
            3 => Self::WarmUp,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::StandBy => "standby",
            Self::PoweredOn => "on",
            Self::Cooling => "cooling",
            Self::WarmUp => "warm-up",
        })
    }
}

/// The group an input belongs to, selected by the tens digit of its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InputFamily {
    Rgb,
    Video,
    Digital,
    Storage,
    Network,
}

impl InputFamily {
    pub fn from_tens(tens: u8) -> Option<Self> {
        match tens {
            1 => Some(Self::Rgb),
            2 => Some(Self::Video),
            3 => Some(Self::Digital),
            4 => Some(Self::Storage),
            5 => Some(Self::Network),
            _ => None,
        }
    }
}

/// Every input code the protocol defines. Which of them a device actually
/// has is reported by [`crate::Client::inputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum InputSource {
    RgbDSub = 11,
    RgbDSub2 = 12,
    RgbBnc = 13,
    RgbDvi = 14,
    Rgb5 = 15,
    Rgb6 = 16,
    Rgb7 = 17,
    Rgb8 = 18,
    Rgb9 = 19,

    VideoComposite = 21,
    VideoSVideo = 22,
    VideoComponent = 23,
    Video4 = 24,
    Video5 = 25,
    Video6 = 26,
    Video7 = 27,
    Video8 = 28,
    Video9 = 29,

    DigitalDvi = 31,
    DigitalSdi = 32,
    DigitalHdmi = 33,
    DigitalDisplayPort = 34,
    DigitalHdbaseT = 35,
    Digital6 = 36,
    Digital7 = 37,
    Digital8 = 38,
    Digital9 = 39,

    StorageUsb = 41,
    StorageMemoryCard = 42,
    Storage3 = 43,
    Storage4 = 44,
    Storage5 = 45,
    Storage6 = 46,
    Storage7 = 47,
    Storage8 = 48,
    Storage9 = 49,

    NetworkLan = 51,
    NetworkWireless = 52,
    Network3 = 53,
    Network4 = 54,
    Network5 = 55,
    Network6 = 56,
    Network7 = 57,
    Network8 = 58,
    Network9 = 59,
}

static INPUT_TABLE: [(InputSource, &str); 45] = [
    (RgbDSub, "RGB D-Sub"),
    (RgbDSub2, "RGB D-Sub 2"),
    (RgbBnc, "RGB BNC"),
    (RgbDvi, "RGB DVI-A"),
    (Rgb5, "RGB 5"),
    (Rgb6, "RGB 6"),
    (Rgb7, "RGB 7"),
    (Rgb8, "RGB 8"),
    (Rgb9, "RGB 9"),
    (VideoComposite, "Composite Video"),
    (VideoSVideo, "S-Video"),
    (VideoComponent, "Component Video"),
    (Video4, "Video 4"),
    (Video5, "Video 5"),
    (Video6, "Video 6"),
    (Video7, "Video 7"),
    (Video8, "Video 8"),
    (Video9, "Video 9"),
    (DigitalDvi, "DVI-D"),
    (DigitalSdi, "SDI"),
    (DigitalHdmi, "HDMI"),
    (DigitalDisplayPort, "DisplayPort"),
    (DigitalHdbaseT, "HDBaseT"),
    (Digital6, "Digital 6"),
    (Digital7, "Digital 7"),
    (Digital8, "Digital 8"),
    (Digital9, "Digital 9"),
    (StorageUsb, "USB Storage"),
    (StorageMemoryCard, "Memory Card"),
    (Storage3, "Storage 3"),
    (Storage4, "Storage 4"),
    (Storage5, "Storage 5"),
    (Storage6, "Storage 6"),
    (Storage7, "Storage 7"),
    (Storage8, "Storage 8"),
    (Storage9, "Storage 9"),
    (NetworkLan, "LAN"),
    (NetworkWireless, "Wireless LAN"),
    (Network3, "Network 3"),
    (Network4, "Network 4"),
    (Network5, "Network 5"),
    (Network6, "Network 6"),
    (Network7, "Network 7"),
    (Network8, "Network 8"),
    (Network9, "Network 9"),
];

impl InputSource {
    /// Looks up a wire code; `None` for codes the protocol doesn't define.
    pub fn from_code(code: u8) -> Option<Self> {
        INPUT_TABLE
            .iter()
            .map(|(source, _)| *source)
            .find(|source| source.code() == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn family(self) -> InputFamily {
        match self.code() / 10 {
            1 => InputFamily::Rgb,
            2 => InputFamily::Video,
            3 => InputFamily::Digital,
            4 => InputFamily::Storage,
            _ => InputFamily::Network,
        }
    }

    /// Human readable name, e.g. `"HDMI"` for [`InputSource::DigitalHdmi`].
    pub fn label(self) -> &'static str {
        INPUT_TABLE
            .iter()
            .find(|(source, _)| *source == self)
            .map(|(_, label)| *label)
            .unwrap_or("")
    }

    pub fn all() -> impl Iterator<Item = InputSource> {
        INPUT_TABLE.iter().map(|(source, _)| *source)
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

/// Audio/video mute. The tens digit picks the axis, the ones digit on/off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum MuteState {
    VideoMuteOff = 10,
    VideoMuteOn = 11,
    AudioMuteOff = 20,
    AudioMuteOn = 21,
    AudioVideoMuteOff = 30,
    AudioVideoMuteOn = 31,
}

impl MuteState {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            10 => Some(Self::VideoMuteOff),
            11 => Some(Self::VideoMuteOn),
            20 => Some(Self::AudioMuteOff),
            21 => Some(Self::AudioMuteOn),
            30 => Some(Self::AudioVideoMuteOff),
            31 => Some(Self::AudioVideoMuteOn),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Builds the state covering the given axes. `None` if neither is selected.
    pub fn new(video: bool, audio: bool, on: bool) -> Option<Self> {
        let tens = match (video, audio) {
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
            (false, false) => return None,
        };
        Self::from_code(tens * 10 + on as u8)
    }

    pub fn video_muted(self) -> bool {
        matches!(self, Self::VideoMuteOn | Self::AudioVideoMuteOn)
    }

    pub fn audio_muted(self) -> bool {
        matches!(self, Self::AudioMuteOn | Self::AudioVideoMuteOn)
    }
}

impl std::fmt::Display for MuteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "video {}, audio {}",
            if self.video_muted() { "muted" } else { "unmuted" },
            if self.audio_muted() { "muted" } else { "unmuted" }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Ok,
    Warning,
    Error,
    /// A digit outside 0..=2. Kept rather than rejected.
    Unknown(u8),
}

impl Severity {
    pub fn from_digit(digit: u8) -> Self {
        match digit {
            0 => Self::Ok,
            1 => Self::Warning,
            2 => Self::Error,
            d => Self::Unknown(d),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
            Self::Unknown(_) => f.write_str("unknown"),
        }
    }
}

/// Result of the error status query, one field per fault category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorStatus {
    pub fan: Severity,
    pub lamp: Severity,
    pub temperature: Severity,
    pub cover_open: Severity,
    pub filter: Severity,
    pub other: Severity,
}

impl ErrorStatus {
    pub fn is_ok(&self) -> bool {
        self.fields().iter().all(|(_, s)| *s == Severity::Ok)
    }

    /// Field names and values in wire order.
    pub fn fields(&self) -> [(&'static str, Severity); 6] {
        [
            ("fan", self.fan),
            ("lamp", self.lamp),
            ("temperature", self.temperature),
            ("cover open", self.cover_open),
            ("filter", self.filter),
            ("other", self.other),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LampInfo {
    pub hours: u32,
    pub is_on: bool,
}

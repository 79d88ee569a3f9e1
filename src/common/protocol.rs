use std::fmt::Display;
use std::str::FromStr;

use log::debug;

use crate::Error;

/// Status fields the projector answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Power,
    Source,
    AudioMute,
    AudioVolume,
    AudioMicVolume,
    LampHours,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Power,
        Command::Source,
        Command::AudioMute,
        Command::AudioVolume,
        Command::AudioMicVolume,
        Command::LampHours,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Power => "pow",
            Command::Source => "sour",
            Command::AudioMute => "mute",
            Command::AudioVolume => "vol",
            Command::AudioMicVolume => "micvol",
            Command::LampHours => "ltim",
        }
    }
}

impl Display for Command {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == token)
            .ok_or_else(|| Error::UnknownCommand(token.to_string()))
    }
}

/// Builds the request line `\r*<command>=?#\r`.
pub fn encode_request(command: &str) -> Vec<u8> {
    format!("\r*{}=?#\r", command).into_bytes()
}

/// Extracts the payload from a response of the form
/// `>*<command>=?#\r\r\n*<payload>#\r\n`.
///
/// The match is anchored at the start of `bytes`. The payload runs up to the
/// first line feed after the echo, which must be preceded by `#\r`. Anything
/// after that line feed is ignored.
pub fn parse_response(command: &str, bytes: &[u8]) -> Option<String> {
    let prefix = format!(">*{}=?#\r\r\n*", command);
    let rest = bytes.strip_prefix(prefix.as_bytes())?;

    let line_end = rest.iter().position(|&b| b == b'\n')?;
    let payload = rest[..line_end].strip_suffix(b"#\r")?;

    debug!("Payload for {}: {:?}", command, String::from_utf8_lossy(payload));
    Some(String::from_utf8_lossy(payload).into_owned())
}

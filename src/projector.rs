use std::io::Write;

use log::{debug, error, warn};
use serde::Serialize;

use crate::common::protocol::{encode_request, parse_response, Command};
use crate::common::transport::{
    self, read_response, BoxedTransport, Transport, READ_TIMEOUT, RESPONSE_LEN,
};
use crate::Result;

/// One reading of every status field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub power: bool,
    pub source: String,
    pub audio_mute: bool,
    pub audio_volume: String,
    pub audio_mic_volume: String,
    pub lamp_hours: String,
}

/// Status client for a BenQ projector.
///
/// Every query is a fresh write and read on the link; nothing is cached.
/// A query that gets no well-formed answer returns an empty string (or
/// `false`) and logs a warning.
pub struct Projector<T: Transport> {
    port: T,
}

impl Projector<BoxedTransport> {
    pub fn open(address: &str) -> Result<Self> {
        Ok(Self::new(transport::open(address)?))
    }
}

impl<T: Transport> Drop for Projector<T> {
    fn drop(&mut self) {
        if let Err(err) = self.port.flush() {
            warn!("Flush before close failed: {}", err);
        }
        // `port` is dropped, and the link closed, right after this
        debug!("Closing projector link");
    }
}

impl<T: Transport> Projector<T> {
    pub fn new(port: T) -> Self {
        Self { port }
    }

    /// Sends `command` and returns the payload of the answer.
    pub fn query(&mut self, command: &str) -> String {
        match self.exchange(command) {
            Ok(Some(answer)) => answer,
            Ok(None) => {
                warn!("Command {} returned nothing", command);
                String::new()
            }
            Err(err) => {
                error!("Command {} failed: {}", command, err);
                String::new()
            }
        }
    }

    /// True if the payload contains `ON` anywhere.
    pub fn query_bool(&mut self, command: &str) -> bool {
        self.query(command).contains("ON")
    }

    fn exchange(&mut self, command: &str) -> std::io::Result<Option<String>> {
        self.port.write_all(&encode_request(command))?;
        self.port.flush()?;

        let mut buf = [0; RESPONSE_LEN];
        let len = read_response(&mut self.port, &mut buf, READ_TIMEOUT)?;
        Ok(parse_response(command, &buf[..len]))
    }

    fn answer(&mut self, command: Command) -> String {
        self.query(command.as_str())
    }

    fn flag(&mut self, command: Command) -> bool {
        self.query_bool(command.as_str())
    }

    pub fn power(&mut self) -> bool {
        self.flag(Command::Power)
    }

    pub fn source(&mut self) -> String {
        self.answer(Command::Source)
    }

    pub fn audio_mute(&mut self) -> bool {
        self.flag(Command::AudioMute)
    }

    pub fn audio_volume(&mut self) -> String {
        self.answer(Command::AudioVolume)
    }

    pub fn audio_mic_volume(&mut self) -> String {
        self.answer(Command::AudioMicVolume)
    }

    pub fn lamp_hours(&mut self) -> String {
        self.answer(Command::LampHours)
    }

    /// Queries every field once, in a fixed order.
    pub fn status(&mut self) -> Status {
        Status {
            power: self.power(),
            source: self.source(),
            audio_mute: self.audio_mute(),
            audio_volume: self.audio_volume(),
            audio_mic_volume: self.audio_mic_volume(),
            lamp_hours: self.lamp_hours(),
        }
    }
}

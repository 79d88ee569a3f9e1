use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::time::Duration;

use benq_status::{Command, Projector, Status, Transport};

/// In-memory projector: answers each request with a canned reply for its
/// command token and records everything written to it.
struct MockLink {
    replies: HashMap<String, Vec<u8>>,
    pending: Vec<u8>,
    written: Rc<RefCell<Vec<u8>>>,
    flushes: Rc<Cell<usize>>,
    closed: Rc<Cell<bool>>,
}

impl MockLink {
    fn new(payloads: &[(&str, &str)]) -> Self {
        let replies = payloads
            .iter()
            .map(|(cmd, payload)| {
                let reply = format!(">*{}=?#\r\r\n*{}#\r\n", cmd, payload);
                (cmd.to_string(), reply.into_bytes())
            })
            .collect();

        Self {
            replies,
            pending: Vec::new(),
            written: Rc::default(),
            flushes: Rc::default(),
            closed: Rc::default(),
        }
    }

    fn projector() -> Self {
        Self::new(&[
            ("pow", "ON"),
            ("mute", "OFF"),
            ("vol", "5"),
            ("micvol", "3"),
            ("sour", "HDMI"),
            ("ltim", "1234"),
        ])
    }
}

impl Read for MockLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            return Err(io::ErrorKind::TimedOut.into());
        }
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

impl Write for MockLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.borrow_mut().extend_from_slice(buf);

        let request = String::from_utf8_lossy(buf);
        let token = request
            .strip_prefix("\r*")
            .and_then(|rest| rest.strip_suffix("=?#\r"));
        if let Some(reply) = token.and_then(|token| self.replies.get(token)) {
            self.pending = reply.clone();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes.set(self.flushes.get() + 1);
        Ok(())
    }
}

impl Transport for MockLink {
    fn set_read_timeout(&mut self, _timeout: Duration) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MockLink {
    fn drop(&mut self) {
        self.closed.set(true);
    }
}

#[test]
fn reads_every_field() {
    let mut projector = Projector::new(MockLink::projector());

    let values = (
        projector.power(),
        projector.audio_mute(),
        projector.audio_volume(),
        projector.audio_mic_volume(),
        projector.source(),
        projector.lamp_hours(),
    );

    assert_eq!(
        values,
        (
            true,
            false,
            "5".to_string(),
            "3".to_string(),
            "HDMI".to_string(),
            "1234".to_string()
        )
    );
}

#[test]
fn each_query_sends_its_own_request() {
    let link = MockLink::projector();
    let written = link.written.clone();
    let mut projector = Projector::new(link);

    for cmd in Command::ALL {
        projector.query(cmd.as_str());
    }
    projector.query("pow");

    let expected: Vec<u8> = Command::ALL
        .iter()
        .map(|cmd| cmd.as_str())
        .chain(["pow"])
        .flat_map(|token| format!("\r*{}=?#\r", token).into_bytes())
        .collect();
    assert_eq!(*written.borrow(), expected);
}

#[test]
fn unknown_command_times_out_to_empty() {
    let mut projector = Projector::new(MockLink::projector());
    assert_eq!(projector.query("3d"), "");
    assert!(!projector.query_bool("3d"));
    // The link is still usable afterwards
    assert_eq!(projector.source(), "HDMI");
}

#[test]
fn drop_without_queries_releases_link() {
    let link = MockLink::projector();
    let closed = link.closed.clone();
    let written = link.written.clone();
    let flushes = link.flushes.clone();

    let projector = Projector::new(link);
    assert!(!closed.get());
    drop(projector);

    assert!(closed.get());
    assert_eq!(flushes.get(), 1);
    assert!(written.borrow().is_empty());
}

#[test]
fn status_snapshot_serializes() {
    let mut projector = Projector::new(MockLink::projector());
    let status = projector.status();

    assert_eq!(
        status,
        Status {
            power: true,
            source: "HDMI".to_string(),
            audio_mute: false,
            audio_volume: "5".to_string(),
            audio_mic_volume: "3".to_string(),
            lamp_hours: "1234".to_string(),
        }
    );

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "power": true,
            "source": "HDMI",
            "audio_mute": false,
            "audio_volume": "5",
            "audio_mic_volume": "3",
            "lamp_hours": "1234",
        })
    );
}

use std::io::{self, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use log::{debug, info};
use serialport::SerialPort;

use crate::{Error, Result};

pub const BAUD_RATE: u32 = 115200;
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);
pub const RESPONSE_LEN: usize = 32;
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

const SOCKET_SCHEME: &str = "socket://";

/// A byte link to the projector.
pub trait Transport: Read + Write {
    /// Bounds how long the next `read` may block. `timeout` is never zero.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}

impl Transport for dyn SerialPort {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.set_timeout(timeout).map_err(io::Error::from)
    }
}

impl Transport for TcpStream {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        TcpStream::set_read_timeout(self, Some(timeout))
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        (**self).set_read_timeout(timeout)
    }
}

pub type BoxedTransport = Box<dyn Transport + Send>;

/// Opens the endpoint named by `address`.
///
/// `socket://host:port` connects to a serial-over-TCP bridge, anything else is
/// taken as a serial device path.
pub fn open(address: &str) -> Result<BoxedTransport> {
    let port: io::Result<BoxedTransport> = match address.strip_prefix(SOCKET_SCHEME) {
        Some(host) => open_socket(host).map(|stream| Box::new(stream) as BoxedTransport),
        None => serialport::new(address, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .map(|port| Box::new(port) as BoxedTransport)
            .map_err(io::Error::from),
    };

    let port = port.map_err(|source| Error::Open {
        address: address.to_string(),
        source,
    })?;
    info!("Opened {}", address);
    Ok(port)
}

fn open_socket(host: &str) -> io::Result<TcpStream> {
    let stream = TcpStream::connect(host)?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

/// Reads until `buf` is full, the link reports end of data, or `timeout`
/// elapses. Returns the number of bytes read.
///
/// `timeout` is one deadline for the whole response: each read may only block
/// for whatever is left of it.
pub fn read_response<R: Transport + ?Sized>(
    port: &mut R,
    buf: &mut [u8],
    timeout: Duration,
) -> io::Result<usize> {
    let deadline = Instant::now() + timeout;
    let mut len = 0;

    while len < buf.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        port.set_read_timeout(remaining)?;

        match port.read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => (),
            // Sockets report an expired read timeout as WouldBlock on unix
            Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                break
            }
            Err(err) => return Err(err),
        }
    }

    debug!("Read {} bytes: {:?}", len, String::from_utf8_lossy(&buf[..len]));
    Ok(len)
}

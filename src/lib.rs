#![warn(clippy::unwrap_used)]

pub mod common;
pub mod error;
pub mod projector;

pub use common::protocol::Command;
pub use common::transport::{BoxedTransport, Transport};
pub use error::{Error, Result};
pub use projector::{Projector, Status};

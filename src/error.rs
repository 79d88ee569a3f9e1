use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open {address}: {source}")]
    Open {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("unknown command token: {0}")]
    UnknownCommand(String),
}

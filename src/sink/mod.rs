//! A 'sink' is the final destination of points. sfxpipe hands a sink exactly
//! one batch per run.

use hyper;
use metric::Point;
use serde_json;
use std::error;
use std::fmt;

pub mod signalfx;

pub use self::signalfx::{SignalFx, SignalFxConfig};

/// Everything that can go wrong setting up or using a sink.
#[derive(Debug)]
pub enum Error {
    /// The sink could not be built from its configuration.
    Connect(String),
    /// The batch could not be serialized.
    Encode(serde_json::Error),
    /// The request failed before a response arrived.
    Transport(hyper::Error),
    /// The remote end answered with a non-success status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, for the operator.
        body: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Connect(ref msg) => write!(f, "could not connect sink: {}", msg),
            Error::Encode(ref e) => write!(f, "could not encode points: {}", e),
            Error::Transport(ref e) => write!(f, "could not send points: {}", e),
            Error::Rejected { status, ref body } => {
                write!(f, "points rejected with status {}: {}", status, body.trim())
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(error::Error + 'static)> {
        match *self {
            Error::Encode(ref e) => Some(e),
            Error::Transport(ref e) => Some(e),
            Error::Connect(_) | Error::Rejected { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Encode(e)
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Error {
        Error::Transport(e)
    }
}

/// A sink for points.
pub trait Sink {
    /// Deliver `points` in a single transmission. An empty batch must succeed
    /// without contacting anything.
    fn send(&mut self, points: &[Point]) -> Result<(), Error>;
}

//! The one-shot decode, expand, send pipeline
//!
//! Input is read to the end and decoded before anything is expanded, and the
//! whole batch is expanded before the sink sees it. A bad line aborts the run
//! with nothing sent.

use config::Config;
use expand::expand;
use metric::MetricRecord;
use protocols::telegraf;
use sink;
use sink::{SignalFx, Sink};
use std::error;
use std::fmt;
use std::io;
use std::io::BufRead;

/// Why a run failed.
#[derive(Debug)]
pub enum Error {
    /// Reading input failed.
    Read(io::Error),
    /// An input line was not a telegraf record.
    Decode(telegraf::Error),
    /// The sink could not be set up or refused the batch.
    Sink(sink::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Read(ref e) => write!(f, "could not read input: {}", e),
            Error::Decode(ref e) => write!(f, "{}", e),
            Error::Sink(ref e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(error::Error + 'static)> {
        match *self {
            Error::Read(ref e) => Some(e),
            Error::Decode(ref e) => Some(e),
            Error::Sink(ref e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Read(e)
    }
}

impl From<telegraf::Error> for Error {
    fn from(e: telegraf::Error) -> Error {
        Error::Decode(e)
    }
}

impl From<sink::Error> for Error {
    fn from(e: sink::Error) -> Error {
        Error::Sink(e)
    }
}

/// Decode every line of `input`, stopping at the first failure.
///
/// Lines end at `\n` or `\r\n`. Bytes that are not valid UTF-8 become U+FFFD
/// rather than failing the read.
pub fn read_records<R>(mut input: R) -> Result<Vec<MetricRecord>, Error>
where
    R: BufRead,
{
    let mut records = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf);
        records.push(telegraf::decode(&line)?);
    }
    debug!("decoded {} records", records.len());
    Ok(records)
}

/// Read, expand and hand the resulting points to `sink` in one call. Returns
/// the number of points sent.
pub fn run<R, S>(input: R, sink: &mut S) -> Result<usize, Error>
where
    R: BufRead,
    S: Sink,
{
    let records = read_records(input)?;
    let points = expand(&records);
    sink.send(&points)?;
    Ok(points.len())
}

/// Connect to SignalFx as configured and `run` over `input`.
pub fn forward<R>(config: &Config, input: R) -> Result<usize, Error>
where
    R: BufRead,
{
    let mut sfx = SignalFx::new(config.signalfx.clone())?;
    run(input, &mut sfx)
}

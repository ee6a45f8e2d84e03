//! Provides the CLI option parser and the configuration file loader
//!
//! Used to parse argv and the on-disk configuration into structs that the
//! pipeline can consume.

use clap::{App, Arg, SubCommand};
use regex::bytes::Regex;
use sink::SignalFxConfig;
use std::env;
use std::error;
use std::fmt;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::string;
use toml;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
const GIT_BRANCH: Option<&'static str> = option_env!("SFXPIPE_GIT_BRANCH");
const GIT_COMMIT: Option<&'static str> = option_env!("SFXPIPE_GIT_COMMIT");

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

lazy_static! {
    static ref ENV_VAR: Regex = Regex::new(r"\$\w+").unwrap();
}

/// What the user asked sfxpipe to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Read stdin, forward to SignalFx.
    Forward,
    /// Print the version string and exit.
    Version,
}

/// Command line arguments
#[derive(Clone, Debug)]
pub struct Args {
    /// The configuration file given with `--config`, if any.
    pub config_file: Option<PathBuf>,
    /// The verbosity setting of sfxpipe. The higher the value the more chatty
    /// sfxpipe gets.
    pub verbose: u64,
    /// The selected subcommand.
    pub command: Command,
}

/// Parsed configuration file
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// See `sink::SignalFx` for more.
    pub signalfx: SignalFxConfig,
}

/// Failures loading or parsing the configuration.
#[derive(Debug)]
pub enum Error {
    /// `--config` was not given.
    NoConfigFile,
    /// The file could not be opened or read.
    Io(PathBuf, io::Error),
    /// The file, after substitution, is not UTF-8.
    Utf8(string::FromUtf8Error),
    /// The file is not valid TOML.
    Toml(toml::de::Error),
    /// A required key is absent or empty.
    Missing(&'static str),
    /// A key is present but of the wrong type.
    Invalid(&'static str, &'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoConfigFile => write!(f, "no configuration file specified"),
            Error::Io(ref path, ref e) => {
                write!(f, "could not read config file {}: {}", path.display(), e)
            }
            Error::Utf8(ref e) => write!(f, "config file is not valid UTF-8: {}", e),
            Error::Toml(ref e) => write!(f, "could not parse config file: {}", e),
            Error::Missing(key) => write!(f, "config is missing required key {}", key),
            Error::Invalid(key, expected) => {
                write!(f, "config key {} must be {}", key, expected)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(error::Error + 'static)> {
        match *self {
            Error::Io(_, ref e) => Some(e),
            Error::Utf8(ref e) => Some(e),
            Error::Toml(ref e) => Some(e),
            Error::NoConfigFile | Error::Missing(_) | Error::Invalid(_, _) => None,
        }
    }
}

impl From<string::FromUtf8Error> for Error {
    fn from(e: string::FromUtf8Error) -> Error {
        Error::Utf8(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Error {
        Error::Toml(e)
    }
}

/// The full version string, including the git branch and commit sfxpipe was
/// built from.
pub fn version_string() -> String {
    format!(
        "sfxpipe v{} (git: {} {})",
        VERSION.unwrap_or("unknown"),
        GIT_BRANCH.unwrap_or("unknown"),
        GIT_COMMIT.unwrap_or("unknown")
    )
}

/// Parse the sfxpipe command line
///
/// This function will read the environment arguments and construct an
/// `Args`. The configuration file itself is not read here, see
/// `load_config_file`.
pub fn parse_args() -> Args {
    let args = App::new("sfxpipe")
        .version(VERSION.unwrap_or("unknown"))
        .about("forward telegraf JSON metrics from stdin to SignalFx")
        .arg(
            Arg::with_name("config-file")
                .long("config")
                .short("C")
                .value_name("config")
                .help("The config file to load.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Turn on verbose output."),
        )
        .subcommand(SubCommand::with_name("version").about("Print the version to stdout."))
        .get_matches();

    let command = match args.subcommand_name() {
        Some("version") => Command::Version,
        _ => Command::Forward,
    };

    Args {
        config_file: args.value_of("config-file").map(PathBuf::from),
        verbose: args.occurrences_of("verbose"),
        command: command,
    }
}

/// Substitute `$NAME` placeholders in raw configuration bytes
///
/// Each placeholder whose environment variable is set to a non-empty value is
/// replaced by that value. Any other placeholder is left as written.
pub fn expand_env_vars(contents: &[u8]) -> Vec<u8> {
    let mut res = Vec::with_capacity(contents.len());
    let mut last = 0;
    for m in ENV_VAR.find_iter(contents) {
        res.extend_from_slice(&contents[last..m.start()]);
        let name = String::from_utf8_lossy(&contents[m.start() + 1..m.end()]);
        match env::var(&*name) {
            Ok(ref val) if !val.is_empty() => {
                trace!("substituting environment variable {}", name);
                res.extend_from_slice(val.as_bytes());
            }
            _ => res.extend_from_slice(&contents[m.start()..m.end()]),
        }
        last = m.end();
    }
    res.extend_from_slice(&contents[last..]);
    res
}

/// Load the sfxpipe configuration file.
///
/// A leading UTF-8 byte order mark is dropped and environment placeholders
/// are substituted before the TOML is parsed.
pub fn load_config_file(path: Option<&Path>) -> Result<Config, Error> {
    let path = match path {
        Some(path) => path,
        None => return Err(Error::NoConfigFile),
    };
    let mut contents = Vec::new();
    File::open(path)
        .and_then(|mut fp| fp.read_to_end(&mut contents))
        .map_err(|e| Error::Io(path.to_path_buf(), e))?;

    let raw = if contents.starts_with(UTF8_BOM) {
        &contents[UTF8_BOM.len()..]
    } else {
        &contents[..]
    };
    let buffer = String::from_utf8(expand_env_vars(raw))?;
    debug!("loaded config file {}", path.display());
    parse_config_file(&buffer)
}

fn opt_str(
    tbl: &toml::Value,
    key: &'static str,
    path: &'static str,
) -> Result<Option<String>, Error> {
    match tbl.get(key) {
        Some(v) => match v.as_str() {
            Some(s) => Ok(Some(s.to_string())),
            None => Err(Error::Invalid(path, "a string")),
        },
        None => Ok(None),
    }
}

/// Parse the sfxpipe configuration file.
///
/// Unknown keys are ignored. Empty optional values are treated as absent.
pub fn parse_config_file(buffer: &str) -> Result<Config, Error> {
    let value: toml::Value = toml::from_str(buffer)?;

    let sfx = match value.get("signalfx") {
        Some(tbl) if tbl.as_table().is_some() => tbl,
        Some(_) => return Err(Error::Invalid("signalfx", "a table")),
        None => return Err(Error::Missing("signalfx")),
    };

    let auth_token = match opt_str(sfx, "auth_token", "signalfx.auth_token")? {
        Some(ref token) if !token.is_empty() => token.clone(),
        _ => return Err(Error::Missing("signalfx.auth_token")),
    };
    let user_agent = opt_str(sfx, "user_agent", "signalfx.user_agent")?
        .and_then(|s| if s.is_empty() { None } else { Some(s) });
    let endpoint = opt_str(sfx, "endpoint", "signalfx.endpoint")?
        .and_then(|s| if s.is_empty() { None } else { Some(s) });

    Ok(Config {
        signalfx: SignalFxConfig {
            auth_token: auth_token,
            user_agent: user_agent,
            endpoint: endpoint,
        },
    })
}

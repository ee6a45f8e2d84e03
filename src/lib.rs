//! sfxpipe forwards telegraf metrics to SignalFx. It reads telegraf's JSON
//! output format from stdin, one measurement per line, flattens every numeric
//! field into its own gauge and ships the lot to SignalFx in a single request.
//!
//! A measurement such as
//!
//! ```text
//! {"name":"mem","fields":{"used":7,"percent":3.2},"tags":{"host":"a"},"timestamp":2000}
//! ```
//!
//! becomes the gauges `mem.used` and `mem.percent`, both tagged `host=a` and
//! stamped at 2000 seconds. A field named `value` is reported under the bare
//! metric name.
//!
//! sfxpipe is meant to run as a telegraf `execd`/`exec` style output: one
//! batch per invocation, no buffering and no retries.
#![allow(unknown_lints)]
#![deny(trivial_numeric_casts, missing_docs, unstable_features, unused_import_braces)]
extern crate clap;
extern crate hyper;
extern crate hyper_native_tls;
extern crate regex;
extern crate serde;
#[cfg_attr(test, macro_use)]
extern crate serde_json;
extern crate toml;
extern crate url;

#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
extern crate tempdir;

pub mod config;
pub mod expand;
pub mod metric;
pub mod pipeline;
pub mod protocols;
pub mod sink;

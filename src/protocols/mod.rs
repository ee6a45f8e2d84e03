//! The input protocols that sfxpipe must parse. These modules are used by the
//! pipeline to turn raw input into `metric` types.

pub mod telegraf;

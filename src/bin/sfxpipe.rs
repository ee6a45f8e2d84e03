#![allow(unknown_lints)]

extern crate chrono;
extern crate fern;
extern crate sfxpipe;

#[macro_use]
extern crate log;
extern crate openssl_probe;

use chrono::Utc;
use sfxpipe::config::{self, Command};
use sfxpipe::pipeline;
use std::io;
use std::process;

fn main() {
    openssl_probe::init_ssl_cert_env_vars();

    let args = config::parse_args();

    if args.command == Command::Version {
        println!("{}", config::version_string());
        return;
    }

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // stdout is left alone; telegraf may be watching it.
    if let Err(e) = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}][{}] {}",
                record.module_path().unwrap_or("sfxpipe"),
                record.line().unwrap_or(0),
                Utc::now().to_rfc3339(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
    {
        eprintln!("could not set up logging: {}", e);
        process::exit(1);
    }

    info!("{}", config::version_string());

    let config = match config::load_config_file(args.config_file.as_ref().map(|p| p.as_path())) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    match pipeline::forward(&config, stdin.lock()) {
        Ok(sent) => {
            debug!("forwarded {} points", sent);
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

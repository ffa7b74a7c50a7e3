use failure::Error;
use log::LevelFilter;
use structopt::StructOpt;

#[macro_use]
mod ui;

mod args;
mod commands;

use crate::{
    args::{Args, Command},
};


/// We just catch potential errors here and pretty print them. The actual
/// useful code is in `run()`.
fn main() {
    if let Err(e) = run() {
        error!("An error occured: {}", e);

        for cause in e.iter_causes() {
            error!("  ... caused by: {}", cause);
        }

        if std::env::var("RUST_BACKTRACE") == Ok("1".to_string()) {
            error!();
            error!("{}", e.backtrace());
        }

        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let args = Args::from_args();
    let global_args = &args.global;
    init_logger(global_args.verbose);

    match &args.command {
        Command::Info { args } => {
            commands::info::run(global_args, args)?;
        }
        Command::Dump { args } => {
            commands::dump::run(global_args, args)?;
        }
    }

    Ok(())
}

/// Installs a logger for the library's log messages. `RUST_LOG` overrides
/// the level chosen via `-v`.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use avl_rank_rs::driver::{Driver, DriverConfig, Stats};
use clap::Parser;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "avl-rank")]
#[command(about = "Answer rank, k-th and range count queries over an AVL tree", long_about = None)]
struct Cli {
    /// Read commands from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Stop at the first malformed or failing command
    #[arg(long)]
    strict: bool,

    /// Log filter (error, warn, info, debug, trace), overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn run(cli: &Cli) -> avl_rank_rs::Result<Stats> {
    let mut driver = Driver::<i64>::new(DriverConfig { strict: cli.strict });
    let output = BufWriter::new(io::stdout().lock());
    match cli.input {
        Some(ref path) => {
            driver.run(BufReader::new(File::open(path)?), output)
        }
        None => driver.run(io::stdin().lock(), output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if let Some(ref level) = cli.log_level {
        logger.parse_filters(level);
    }
    logger.init();

    match run(&cli) {
        Ok(stats) => {
            info!(
                "executed {} commands, skipped {}",
                stats.executed, stats.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

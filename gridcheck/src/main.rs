use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use libverify::{GridFormat, verify_cso, verify_fm};
use report::Outcome;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod report;

const EXIT_DIFFERENT: u8 = 1;
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_DIFFERENT),
        Err(e) => {
            eprintln!("! {e:?}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Runs the verification and prints the report. Returns whether every candidate matched.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = cli.verify_config()?;
    let candidates = cli.candidates()?;

    info!(
        format = %cli.format,
        candidates = candidates.len(),
        max_workers = config.max_workers,
        "verifying grids"
    );

    let outcome = match cli.format {
        GridFormat::Cso => Outcome::Cso(verify_cso(&cli.gt, &candidates, &config)?),
        GridFormat::Fm => Outcome::Fm(verify_fm(&cli.gt, &candidates, &config)?),
    };

    if cli.json {
        let report = report::json_report(&cli.gt, &candidates, &outcome);
        let report_serialized =
            serde_json::to_string_pretty(&report).context("Couldn't serialize report")?;
        println!("{report_serialized}");
    } else {
        // Blank line of separation from the log output.
        println!();
        for line in report::text_report(&cli.gt, &candidates, &outcome) {
            println!("{line}");
        }
    }

    Ok(outcome.all_equal())
}

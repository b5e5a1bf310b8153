//! chkcrontab CLI - check crontab files for errors before cron reads them.
//!
//! Exits with 0 when every file is clean, 1 when there are only warnings
//! and 2 when any file has an error.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chkcrontab::{Checker, Config, Verdict};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chkcrontab")]
#[command(about = "Check crontab files for errors and likely mistakes")]
#[command(version)]
struct Cli {
    /// Crontab files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Users that may not exist on this host (comma-separated or repeated)
    #[arg(short, long, env = "CHKCRONTAB_WHITELIST", value_delimiter = ',')]
    whitelist: Vec<String>,

    /// passwd-format file used to look users up
    #[arg(long, default_value = "/etc/passwd")]
    passwd: PathBuf,

    /// Do not warn about file names cron would skip
    #[arg(long)]
    no_filename_check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(anyhow::Error::msg)?;

    let config = Config::default()
        .whitelist_users(cli.whitelist)
        .passwd_path(cli.passwd)
        .check_filename(!cli.no_filename_check);
    let checker = Checker::from_config(&config);

    let mut worst = Verdict::Clean;
    let many = cli.files.len() > 1;
    for (path, result) in cli.files.iter().zip(checker.check_paths(&cli.files)) {
        let result = result.with_context(|| format!("checking {}", path.display()));
        match result {
            Ok(report) => {
                if many {
                    println!("==> {} <==", path.display());
                }
                print!("{}", report);
                worst = worst.max(report.verdict());
            }
            Err(err) => {
                eprintln!("E: {:#}", err);
                worst = Verdict::Errors;
            }
        }
    }

    std::process::exit(worst.code());
}

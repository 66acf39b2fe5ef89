mod app;
mod args;
mod command;
mod paths;
mod view;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::app::App;
use crate::app::AppError;
use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = match App::new(&args) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs to `--log-file`, or to `latest.log` in the cache directory after
/// rotating the previous run's log.
fn init_logging(args: &Args) -> Result<(), AppError> {
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let path: PathBuf = match &args.log_file {
        Some(path) => path.clone(),
        None => {
            let Some(path) = paths::log_file() else {
                return Ok(());
            };
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            paths::rotate_logs();
            path
        }
    };

    WriteLogger::init(level, Config::default(), File::create(&path)?)?;
    log::info!("artic {} started", env!("CARGO_PKG_VERSION"));
    Ok(())
}

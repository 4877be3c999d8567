use std::process;
use thefarmer::cli;
use thefarmer::error::WatchError;
use thefarmer::logger;
use thefarmer::notification;
use thefarmer::settings::{self, Settings};
use thefarmer::watch::{ThreadSleeper, WatchLoop};

fn main() {
    let cli = match cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            // Help goes to stdout, so a closed stdout still leaves stderr.
            if let Err(io) = e.print() {
                eprintln!("Couldn't print usage: {}", io);
            }
            process::exit(cli::exit_code(&e));
        }
    };

    let loaded = match &cli.config {
        Some(path) => settings::load_settings_from(path),
        None => settings::load_settings(),
    };
    let settings: Settings = loaded.unwrap_or_else(fatal);

    if let Err(e) = logger::init(&settings.log_file) {
        eprintln!("Failed to set up logging: {}", e);
    }

    let alert = notification::from_settings(&settings);
    let watch = WatchLoop::new(cli.files, &settings, alert, ThreadSleeper).unwrap_or_else(fatal);
    for path in watch.paths() {
        log::info!("Monitoring {}", path.display());
    }

    match watch.run() {
        Ok(never) => match never {},
        Err(e) => fatal(e),
    }
}

/// Logs the error and exits with status 1.
/// Never returns; the type parameter lets it fill any expected value.
fn fatal<T>(err: WatchError) -> T {
    if log::log_enabled!(log::Level::Error) {
        log::error!("Stopping: {}", err);
    } else {
        eprintln!("Error: {}", err);
    }
    process::exit(1);
}

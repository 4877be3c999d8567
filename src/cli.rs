//! # CLI Module
//! Command-line surface: `-f` followed by the paths to monitor.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// The Farmer - raises a desktop alert when the hash of a monitored file changes
#[derive(Parser, Debug)]
#[command(name = "thefarmer", version)]
pub struct Cli {
    /// Files to monitor. Takes every following argument, up to the next flag
    #[arg(short = 'f', long = "files", value_name = "PATH", num_args = 1.., required = true)]
    pub files: Vec<PathBuf>,

    /// Settings file (defaults to ./thefarmer.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Parses the full argument list, program name first.
///
/// # Arguments
///
/// * `args` - The raw arguments, e.g. `std::env::args_os()`.
///
/// # Returns
///
/// * `Ok(Cli)` - The paths to monitor and the optional settings file.
/// * `Err(clap::Error)` - Help, version, or a usage error; see `exit_code`.
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Exit status for a parse failure: 0 for help/version output, 1 otherwise.
pub fn exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

use clap::Parser;
use oraclefuse::cli::{run, Cli};
use oraclefuse::logging::init_logging;

fn main() -> std::process::ExitCode {
    init_logging();
    run(Cli::parse())
}

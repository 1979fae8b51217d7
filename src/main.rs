use bucketdir::cli::{Cli, run_cli};
use bucketdir::output::OutputFormatter;
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;

fn init_logger() {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        Builder::new()
            .target(Target::Stderr)
            .filter_level(LevelFilter::Warn)
            .init();
    }
}

fn main() {
    init_logger();

    let cli = Cli::parse();

    if let Err(e) = run_cli(&cli) {
        OutputFormatter::error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}

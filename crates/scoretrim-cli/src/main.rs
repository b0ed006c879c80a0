mod cli;
mod info_cmd;
mod nup_cmd;
mod shared;
mod trim_cmd;

use std::io;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::Trim(ref args) => trim_cmd::run(args),
        cli::Commands::Info {
            ref file,
            ref password,
            ref format,
        } => info_cmd::run(file, password.as_deref(), format),
        cli::Commands::Nup {
            ref file,
            grid,
            ref output,
            margin,
            gap,
        } => nup_cmd::run(file, grid, output, margin, gap),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

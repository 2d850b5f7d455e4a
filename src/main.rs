//! hostwatch - host telemetry monitor
//!
//! A command-line daemon that polls host telemetry and sends email or push
//! alerts when metrics cross configured thresholds.

use clap::Parser;
use hostwatch::cli::args::{generate_completions, Cli, Commands};
use hostwatch::cli::logging::logger_builder;
use hostwatch::commands::{run_check, run_config, run_daemon, run_notify_test};
use hostwatch::error::{AppError, ConfigError, NotifyError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // The daemon reports every alert at info
    let default_filter = match cli.command {
        Commands::Run(_) => "info",
        _ => "warn",
    };

    // Initialize logging
    logger_builder(
        env_logger::Env::default().default_filter_or(default_filter),
        cli.verbose,
    )
    .init();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Run(args) => run_daemon(args, cli.format, config),

        Commands::Check => run_check(cli.format, config),

        Commands::Config => run_config(cli.format, config),

        Commands::NotifyTest => run_notify_test(cli.format, config),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Check the --config path or unset HOSTWATCH_CONFIG.");
        }
        AppError::Config(ConfigError::InvalidValue { .. }) => {
            eprintln!();
            eprintln!("Hint: Run 'hostwatch config' to see the effective values.");
            eprintln!("      Environment variables override the config file.");
        }
        AppError::Notify(NotifyError::Rejected { service, .. }) => {
            eprintln!();
            eprintln!("Hint: {} rejected the request, check the API credentials.", service);
        }
        _ => {}
    }
}

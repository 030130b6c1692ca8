//! Dealgate CLI - vet negotiation transitions and run the procurement simulation

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dealgate::cli::commands::{check, simulate};
use dealgate::cli::{Cli, Commands};
use dealgate::errors::to_exit_code;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

fn run(cli: Cli) -> dealgate::Result<()> {
    let cwd = dealgate::fs::resolve_cwd(cli.cwd.as_deref());
    let config = dealgate::config::load_run_config(cli.config.as_deref(), &cwd)?;
    let checker = dealgate::config::build_checker(&config);

    match cli.command {
        Some(Commands::Simulate {
            reject_approval,
            emergency_override,
            out,
        }) => {
            let outcome = simulate::ApprovalOutcome {
                approval_valid: !reject_approval,
                emergency_override,
            };
            let out = out.map(|p| if p.is_absolute() { p } else { cwd.join(p) });
            simulate::run(&checker, &config.simulation, outcome, out.as_deref())
        }
        Some(Commands::Check {
            from,
            to,
            approval,
            emergency_override,
            old_terms,
            new_terms,
            json,
        }) => {
            let options = check::CheckOptions {
                approval,
                emergency_override,
                old_terms,
                new_terms,
                json,
            };
            check::run(&checker, from, to, &options)
        }
        Some(Commands::Table { json }) => dealgate::cli::commands::table::run(json),
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

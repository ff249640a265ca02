use clap::Parser;
use notepress::application::{init::init, DiscoveryService, PublishService};
use notepress::cli::{format_discovery_report, format_publish_report, Cli, Commands};
use notepress::error::PublishError;
use notepress::infrastructure::{Config, VaultRepository};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), PublishError> {
    match cli.command {
        Commands::Init { path } => {
            let written = init(&path)?;
            println!("Wrote {}", written.display());
            Ok(())
        }
        Commands::Discover => {
            let config = Config::load_from_path(&Config::locate(cli.config.as_deref()))?;
            let service = DiscoveryService::new(
                VaultRepository::new(config.source_dir()),
                config.tag_filter(),
            );
            let report = service.execute()?;
            print!("{}", format_discovery_report(&report));
            Ok(())
        }
        Commands::Publish { dry_run } => {
            let config = Config::load_from_path(&Config::locate(cli.config.as_deref()))?;
            let service = PublishService::from_config(&config);
            let report = service.execute(dry_run)?;
            print!("{}", format_publish_report(&report));
            Ok(())
        }
    }
}

use anyhow::Result;
use lintmux::cli::{parse_args, Commands, ConfigCommands};
use lintmux::commands::{self, EXIT_FAILURE};

fn main() -> Result<()> {
    let cli = parse_args();
    init_logging(cli.verbosity);

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Run(args) => commands::run_lint(config, args),
        Commands::Linters(selection) => commands::list_linters(config, selection),
        Commands::Config {
            command: ConfigCommands::Path,
        } => commands::print_config_path(config),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

// RUST_LOG wins over -v.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

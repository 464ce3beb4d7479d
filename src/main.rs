use springshift::cli::commands::{CliArgs, Commands};
use springshift::cli::handlers::{handle_analyze, handle_migrate};
use springshift::util::logging::{
    init_from_env, init_logging, parse_level_or_default, LoggingConfig,
};
use springshift::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("springshift v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Migrate(migrate_args) => handle_migrate(migrate_args, args.quiet).await,
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args).await,
    };

    std::process::exit(exit_code);
}

/// Explicit CLI flags win over `SPRINGSHIFT_LOG_LEVEL`
fn init_logging_from_args(args: &CliArgs) {
    let cli_level = if let Some(level_str) = &args.log_level {
        Some(parse_level_or_default(level_str))
    } else if args.verbose {
        Some(Level::DEBUG)
    } else if args.quiet {
        Some(Level::ERROR)
    } else {
        None
    };

    match cli_level {
        Some(level) => init_logging(LoggingConfig::from_env().with_level(level)),
        None => init_from_env(),
    }
}

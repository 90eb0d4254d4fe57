use stackup::cli::commands::{CliArgs, Commands};
use stackup::cli::handlers::{handle_analyze, handle_generate, handle_status, handle_up};
use stackup::util::{init_logging, LoggingConfig};
use stackup::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_cli(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("stackup v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args),
        Commands::Generate(generate_args) => handle_generate(generate_args),
        Commands::Up(up_args) => handle_up(up_args, args.quiet).await,
        Commands::Status(status_args) => handle_status(status_args).await,
    };

    std::process::exit(exit_code);
}

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generates and runs a containerized development environment for a project
#[derive(Parser, Debug)]
#[command(
    name = "stackup",
    about = "Generates and runs a containerized development environment for a project",
    version,
    author,
    long_about = "stackup reads a project's manifests (package.json, requirements files, \
                  Maven/Gradle descriptors), infers its framework and backing services, \
                  and writes a Dockerfile, compose manifest and .env that bring the whole \
                  stack up locally with one command."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Infer a project's framework and services",
        long_about = "Reads the manifests at the project root and prints the inferred stack. \
                      Nothing is written.\n\n\
                      Examples:\n  \
                      stackup analyze\n  \
                      stackup analyze /path/to/project --format json"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Write the development environment files",
        long_about = "Analyzes the project and writes .stackup/Dockerfile, \
                      .stackup/docker-compose.yml, runtime shims, .stackup.json, \
                      .dockerignore and merges connection settings into .env.\n\n\
                      Examples:\n  \
                      stackup generate\n  \
                      stackup generate /path/to/project"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Build and start the environment",
        long_about = "Generates the environment if needed, runs compose up --build -d and \
                      streams its output, then waits until every service accepts connections.\n\n\
                      Examples:\n  \
                      stackup up\n  \
                      stackup up /path/to/project --no-wait\n  \
                      stackup up --port 8081"
    )]
    Up(UpArgs),

    #[command(
        about = "Check which services accept connections",
        long_about = "Reads .stackup.json and probes each recorded service, plus the app \
                      on its recorded port.\n\n\
                      Examples:\n  \
                      stackup status\n  \
                      stackup status --port 8080 --format json"
    )]
    Status(StatusArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "PATH", help = "Path to project (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "PATH", help = "Path to project (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct UpArgs {
    #[arg(value_name = "PATH", help = "Path to project (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(long, help = "Return once compose exits without waiting for readiness")]
    pub no_wait: bool,

    #[arg(
        short = 'p',
        long,
        value_name = "PORT",
        help = "Application port to wait for (defaults to the recorded port)"
    )]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    #[arg(value_name = "PATH", help = "Path to project (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'p',
        long,
        value_name = "PORT",
        help = "Application port to probe (defaults to the recorded port)"
    )]
    pub port: Option<u16>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

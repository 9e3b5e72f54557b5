mod commands;

use clap::Parser;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            error.exit_code()
        }
    }
}

fn run(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{err}");
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = "potgate", about = "Interatomic potential acquisition and workflow gate")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Acquire and validate a potential file for an element
    Fetch(commands::FetchArgs),
    /// Write a Stillinger-Weber potential from the built-in parameter table
    CreateSw(commands::CreateSwArgs),
    /// Report whether the working directory is ready for simulation stages
    Status(commands::StatusArgs),
    /// Validate a single potential file without fetching anything
    Validate(commands::ValidateArgs),
}

fn dispatch(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Fetch(args) => commands::run_fetch(args),
        CliCommand::CreateSw(args) => commands::run_create_sw(args),
        CliCommand::Status(args) => commands::run_status(args),
        CliCommand::Validate(args) => commands::run_validate(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Unresolved(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Io(_) => 3,
            Self::Unresolved(_) => 4,
        }
    }
}

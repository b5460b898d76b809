//! CLI for hashing and verifying passwords with Argon2id.
//!
//! ## Usage
//!
//! ```bash
//! # Prompt for a password and hash it with default parameters
//! argon2
//!
//! # Hash with custom cost parameters
//! argon2 -m 47104 -t 3 -p 2 hash mypassword
//!
//! # Verify a password read from stdin against a hash
//! echo mypassword | argon2 -S verify '$argon2id$v=19$m=65536,t=1,p=1$...'
//!
//! # Generate shell completions
//! source <(COMPLETE=bash argon2)
//! ```

use std::io::{self, Read};
use std::process::ExitCode;

use argon_hash::{
    Argon2idError, DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH, DEFAULT_MEMORY_KIB,
    DEFAULT_PARALLELISM, DEFAULT_SALT_LENGTH, Hasher, ParameterSet, parse, verify,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use inquire::{InquireError, Password, Text};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Hash and verify passwords using Argon2id
#[derive(Parser)]
#[command(name = "argon2", version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Memory cost in KiB
    #[arg(short, long, env = "ARGON2_MEMORY", default_value_t = DEFAULT_MEMORY_KIB, global = true)]
    memory: u32,

    /// Number of iterations
    #[arg(short = 't', long, env = "ARGON2_ITERATIONS", default_value_t = DEFAULT_ITERATIONS, global = true)]
    iterations: u32,

    /// Degree of parallelism (1-255)
    #[arg(short, long, env = "ARGON2_PARALLELISM", default_value_t = DEFAULT_PARALLELISM, global = true)]
    parallelism: u32,

    /// Derived key length in bytes
    #[arg(short, long, env = "ARGON2_KEY_LENGTH", default_value_t = DEFAULT_KEY_LENGTH, global = true)]
    key_length: u32,

    /// Salt length in bytes
    #[arg(short, long, env = "ARGON2_SALT_LENGTH", default_value_t = DEFAULT_SALT_LENGTH, global = true)]
    salt_length: u32,

    /// Read the missing input from stdin instead of prompting
    #[arg(short = 'S', long, global = true)]
    stdin: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Hash a password (the default when no command is given)
    Hash {
        /// Password to hash; prompted for when omitted
        password: Option<String>,
    },

    /// Verify a password against a hash
    Verify {
        /// Hash string to verify against
        hash: Option<String>,

        /// Password to check
        password: Option<String>,
    },
}

const AFTER_HELP: &str = "\
When omitted, arguments are prompted for or read from stdin using
-S/--stdin. Providing either the hash or the password to verify via
stdin disables interactive prompting for the other.

When verifying a hash, -m, -t, -p, -k, and -s are taken from the hash
and ignored.

Quote passwords and hashes containing special characters, such as '$',
so the shell does not interpret them.

EXAMPLES:
  argon2                                   # Prompt for a password and hash it
  argon2 hash mypassword                   # Hash 'mypassword' with defaults
  argon2 -m 47104 -t 3 -p 2 hash mypassword  # 46 MiB, 3 iterations, 2 lanes
  argon2 -S verify '$argon2id$v=19$...'    # Password from stdin

SHELL COMPLETIONS:
  Bash (~/.bashrc):   source <(COMPLETE=bash argon2)
  Zsh (~/.zshrc):     source <(COMPLETE=zsh argon2)
  Fish:               COMPLETE=fish argon2 | source
";

#[derive(Debug, Error)]
enum CliError {
    #[error("Password cannot be empty.")]
    EmptyPassword,

    #[error("Hash cannot be empty.")]
    EmptyHash,

    #[error("No password provided.\nUsage: argon2 -S verify <password> (hash via stdin)")]
    MissingPassword,

    #[error("No hash provided.\nUsage: argon2 -S verify <hash> (password via stdin)")]
    MissingHash,

    #[error("Invalid hash: {0}")]
    InvalidHash(#[source] Argon2idError),

    #[error("Invalid parameters: {0}")]
    Params(#[source] Argon2idError),

    #[error("Failed to hash password: {0}")]
    Hash(#[source] Argon2idError),

    #[error("Error reading from stdin: {0}")]
    Stdin(#[from] io::Error),

    #[error("Failed to read input: {0}")]
    Prompt(#[from] InquireError),
}

fn main() -> ExitCode {
    // Check for shell completion generation before parsing args
    if let Ok(shell_name) = std::env::var("COMPLETE") {
        return generate_completions(&shell_name);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        None => hash(cli, None),
        Some(Command::Hash { password }) => hash(cli, password.clone()),
        Some(Command::Verify { hash, password }) => {
            verify_command(cli, hash.clone(), password.clone())
        }
    }
}

fn hash(cli: &Cli, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None if cli.stdin => read_stdin()?,
        None => prompt_password()?,
    };

    if password.is_empty() {
        return Err(CliError::EmptyPassword);
    }

    let params = ParameterSet::new(
        cli.iterations,
        cli.memory,
        cli.parallelism,
        cli.salt_length,
        cli.key_length,
    )
    .map_err(CliError::Params)?;
    info!(%params, "hashing password");

    let hash = Hasher::new(params)
        .hash(password.as_bytes())
        .map_err(CliError::Hash)?;
    println!("{hash}");
    Ok(())
}

fn verify_command(
    cli: &Cli,
    hash: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    let (hash, password) = match (hash, password) {
        (Some(hash), Some(password)) => (hash, password),
        (positional, _) if cli.stdin => {
            let input = read_stdin()?;
            if looks_like_hash(&input) {
                debug!("stdin holds the hash");
                (input, positional.ok_or(CliError::MissingPassword)?)
            } else {
                debug!("stdin holds the password");
                (positional.ok_or(CliError::MissingHash)?, input)
            }
        }
        (Some(positional), _) => {
            if looks_like_hash(&positional) {
                debug!("argument holds the hash");
                (positional, prompt_password()?)
            } else {
                debug!("argument holds the password");
                (prompt_line("Enter hash:")?, positional)
            }
        }
        (None, _) => {
            let hash = prompt_line("Enter hash:")?;
            (hash, prompt_password()?)
        }
    };

    if password.is_empty() {
        return Err(CliError::EmptyPassword);
    }
    if hash.is_empty() {
        return Err(CliError::EmptyHash);
    }

    let decoded = parse(&hash).map_err(CliError::InvalidHash)?;
    info!(params = %decoded.params(), "verifying password");

    if verify(&hash, password.as_bytes()) {
        println!("Password matches the hash.");
    } else {
        println!("Password does not match the hash.");
    }
    Ok(())
}

/// Treats input that decodes as a hash string as one; anything else is taken
/// to be a password.
fn looks_like_hash(input: &str) -> bool {
    parse(input).is_ok()
}

/// Reads all of stdin, trimming surrounding whitespace.
fn read_stdin() -> Result<String, CliError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompts for a line of input, trimming surrounding whitespace.
fn prompt_line(message: &str) -> Result<String, CliError> {
    let line = Text::new(message).prompt()?;
    Ok(line.trim().to_string())
}

/// Prompts for a password without echoing it. Whitespace is kept.
fn prompt_password() -> Result<String, CliError> {
    Ok(Password::new("Enter password:")
        .without_confirmation()
        .prompt()?)
}

/// Initialize tracing on stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,argon2=info,argon_hash=info".to_string(),
            2 => "info,argon2=debug,argon_hash=debug".to_string(),
            _ => "debug,argon2=trace,argon_hash=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .compact()
        .init();
}

/// Generate shell completions.
fn generate_completions(shell_name: &str) -> ExitCode {
    let shell = match shell_name.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        "elvish" => Shell::Elvish,
        _ => {
            eprintln!(
                "Unknown shell: {shell_name}. Supported: bash, zsh, fish, powershell, elvish"
            );
            return ExitCode::FAILURE;
        }
    };

    clap_complete::generate(shell, &mut Cli::command(), "argon2", &mut io::stdout());
    ExitCode::SUCCESS
}

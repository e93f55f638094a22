use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
mod auth;
use password2h::{
    ConfigFile, CostLimits, Hasher, HasherConfig, compare_sealed_hash_and_password, open_sealed,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 time cost / iterations (default: 1)
    #[arg(long, global = true, env = "P2H_TIME")]
    time: Option<u32>,

    /// Argon2 memory cost in KiB (default: 65536)
    #[arg(long, global = true, env = "P2H_MEMORY")]
    memory: Option<u32>,

    /// Argon2 parallelism (default: 32)
    #[arg(long, global = true, env = "P2H_THREADS")]
    threads: Option<u8>,

    /// Length of the derived key in bytes (default: 40)
    #[arg(long = "key-len", global = true, env = "P2H_KEY_LEN")]
    key_len: Option<u32>,

    /// Length of the random salt in bytes (default: 20)
    #[arg(long = "salt-len", global = true, env = "P2H_SALT_LEN")]
    salt_len: Option<u32>,
}

impl Argon2Args {
    fn apply(&self, base: HasherConfig) -> HasherConfig {
        HasherConfig::new(
            self.time.unwrap_or(base.time()),
            self.salt_len.unwrap_or(base.salt_len()),
            self.memory.unwrap_or(base.memory()),
            self.threads.unwrap_or(base.threads()),
            self.key_len.unwrap_or(base.key_len()),
        )
    }
}

#[derive(Debug, clap::Args)]
struct LimitArgs {
    /// Highest time cost accepted from a sealed hash (default: 16)
    #[arg(long = "max-time", global = true, env = "P2H_MAX_TIME")]
    max_time: Option<u32>,

    /// Highest memory cost in KiB accepted from a sealed hash (default: 1048576)
    #[arg(long = "max-memory", global = true, env = "P2H_MAX_MEMORY")]
    max_memory: Option<u32>,

    /// Highest parallelism accepted from a sealed hash (default: 64)
    #[arg(long = "max-threads", global = true, env = "P2H_MAX_THREADS")]
    max_threads: Option<u8>,
}

impl LimitArgs {
    fn to_cost_limits(&self) -> CostLimits {
        let default = CostLimits::default();

        CostLimits::new(
            self.max_time.unwrap_or(default.max_time()),
            self.max_memory.unwrap_or(default.max_memory()),
            self.max_threads.unwrap_or(default.max_threads()),
        )
    }
}

#[derive(Debug, Parser)]
#[command(name = "password2h")]
#[command(version, about = "Argon2id password hashing with a compact base58 encoding.")]
struct Cli {
    /// Path to a JSON file with hasher parameters
    #[arg(long, global = true, value_name = "PATH", env = "P2H_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    argon2: Argon2Args,

    #[command(flatten)]
    limits: LimitArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the encoded hash
    Hash {
        /// Embed the parameters in the output
        #[arg(long)]
        sealed: bool,
    },

    /// Checks a password against an encoded hash
    #[command(arg_required_else_help = true)]
    Verify {
        encoded: String,
        /// The hash carries its own parameters
        #[arg(long)]
        sealed: bool,
    },

    /// Shows what an encoded hash contains
    #[command(arg_required_else_help = true)]
    Inspect {
        encoded: String,
        /// The hash carries its own parameters
        #[arg(long)]
        sealed: bool,
    },

    /// Prints the resolved hasher parameters
    Params {
        /// Write the parameters to a config file instead
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags override the config file, which overrides the defaults.
fn resolve_config(cli: &Cli) -> Result<HasherConfig> {
    let base = match &cli.config {
        Some(path) => ConfigFile::new(path.clone()).load()?,
        None => {
            let file = ConfigFile::default_location()?;
            if file.exists() {
                file.load()?
            } else {
                HasherConfig::default()
            }
        }
    };

    let config = cli.argon2.apply(base);
    config.validate().context("invalid Argon2 parameters")?;
    tracing::debug!(?config, "resolved hasher parameters");
    Ok(config)
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging();

    match &cli.command {
        Commands::Hash { sealed } => {
            let hasher = Hasher::with_config(resolve_config(&cli)?);
            let password = auth::read_new_password_with_confirmation()?;
            let hash = hasher
                .hash_password(&password)
                .context("failed to hash password")?;
            drop(password);

            if *sealed {
                println!("{}", hasher.seal_password(&hash));
            } else {
                println!("{}", hasher.wrap_password(&hash));
            }
        }
        Commands::Verify { encoded, sealed } => {
            let password = auth::read_password()?;
            let valid = if *sealed {
                let limits = cli.limits.to_cost_limits();
                compare_sealed_hash_and_password(encoded, &password, &limits)
            } else {
                Hasher::with_config(resolve_config(&cli)?)
                    .compare_hash_and_password(encoded, &password)
            };
            drop(password);

            if valid {
                println!("valid");
            } else {
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Inspect { encoded, sealed } => {
            let report = if *sealed {
                let (config, hash) = open_sealed(encoded, &cli.limits.to_cost_limits())
                    .context("invalid password envelope")?;
                serde_json::json!({
                    "format": "sealed",
                    "key_len": hash.key().len(),
                    "salt_len": hash.salt().len(),
                    "params": config,
                })
            } else {
                let hash = Hasher::with_config(resolve_config(&cli)?)
                    .unwrap_password(encoded)
                    .context("invalid password hash")?;
                serde_json::json!({
                    "format": "bare",
                    "key_len": hash.key().len(),
                    "salt_len": hash.salt().len(),
                })
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Params { save } => {
            let config = resolve_config(&cli)?;
            match save {
                Some(path) => {
                    let file = ConfigFile::new(path.clone());
                    file.save(&config)?;
                    println!("saved hasher parameters to {}", file.path().display());
                }
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

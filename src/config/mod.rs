pub mod seed_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

pub use seed_config::{LoggingConfig, SeedConfig};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-models")]
#[command(about = "Create, inspect and dump models held in memory")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with records to load before running the command")]
    pub seed: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create and save a new model
    Create {
        type_name: String,

        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Print one model
    Show { type_name: String, id: String },
    /// Print every model, optionally only one type
    All { type_name: Option<String> },
    /// Persist everything and print the snapshot
    Dump,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(seed) = &self.seed {
            validation::validate_path("seed", seed)?;
        }

        match &self.command {
            Command::Create { type_name, set } => {
                validation::validate_non_empty_string("type_name", type_name)?;
                for assignment in set {
                    validation::parse_assignment(assignment)?;
                }
            }
            Command::Show { type_name, id } => {
                validation::validate_non_empty_string("type_name", type_name)?;
                validation::validate_non_empty_string("id", id)?;
            }
            Command::All { .. } | Command::Dump => {}
        }

        Ok(())
    }
}

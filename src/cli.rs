//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for csuite-onboard.

use clap::{Parser, Subcommand};

use crate::lunar::BoundaryAnswer;
use crate::persona::Role;
use crate::scoring::Originality;
use crate::selection::RandomnessLevel;

/// csuite-onboard - Executive persona assignment for simulated companies
///
/// Reads a session answers file, infers the acting human's profile, and
/// selects a C-suite of personas with a seeded, reproducible beam search.
#[derive(Parser, Debug)]
#[command(name = "csuite-onboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "CSUITE_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select an executive team from a session answers file
    Select {
        /// Session answers file (TOML)
        #[arg(short, long)]
        input: String,

        /// Seed label for a reproducible run
        #[arg(long)]
        seed: Option<String>,

        /// Randomness level: low, medium, high
        #[arg(long, value_parser = parse_randomness)]
        randomness: Option<RandomnessLevel>,

        /// CEO originality: subtle, balanced, bold
        #[arg(long, value_parser = parse_originality)]
        originality: Option<Originality>,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Western and Chinese zodiac for a birth date
    Zodiac {
        /// Birth date (YYYY-MM-DD)
        date: String,

        /// Born before Chinese New Year? Needed outside 1900-2100
        #[arg(long, value_parser = parse_boundary)]
        boundary: Option<BoundaryAnswer>,
    },

    /// Gregorian date of Chinese New Year
    NewYear {
        /// Gregorian year
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },

    /// List the persona catalog
    Library {
        /// Only this role (e.g. CEO, CFO, Chairman)
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,

        /// Write the bundled catalog to this path instead of listing
        #[arg(long)]
        export: Option<String>,
    },

    /// Draw a hand of culture cards
    Cards {
        /// Seed label for a reproducible draw
        #[arg(long)]
        seed: Option<String>,
    },

    /// Display version and build information
    Version {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate,
}

fn parse_randomness(s: &str) -> Result<RandomnessLevel, String> {
    s.parse().map_err(|e: crate::error::Error| e.to_string())
}

fn parse_originality(s: &str) -> Result<Originality, String> {
    s.parse().map_err(|e: crate::error::Error| e.to_string())
}

fn parse_boundary(s: &str) -> Result<BoundaryAnswer, String> {
    s.parse().map_err(|e: crate::error::Error| e.to_string())
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse().map_err(|e: crate::error::Error| e.to_string())
}

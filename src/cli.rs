use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "nus3vol")]
#[command(about = "Read and change entry volumes in NUS3BANK audio banks")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the name and volume of an entry
    Get {
        file: PathBuf,

        /// Entry index, music banks keep their track at 0
        #[arg(short, long)]
        entry: Option<u32>,
    },

    /// Set the volume of an entry
    Set {
        file: PathBuf,

        /// New volume, negatives and decimals allowed
        #[arg(allow_negative_numbers = true)]
        volume: f32,

        #[arg(short, long)]
        entry: Option<u32>,

        /// Write the result here instead of over FILE
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Don't write a .bak copy before overwriting FILE
        #[arg(long)]
        no_backup: bool,
    },

    /// Set the same volume on many banks
    Batch {
        #[arg(allow_negative_numbers = true)]
        volume: f32,

        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        entry: Option<u32>,

        #[arg(long)]
        no_backup: bool,
    },

    /// List every entry of a bank
    List { file: PathBuf },

    /// List the top level chunks of a bank
    Chunks { file: PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("{}: {source}", path.display())]
    Toml { path: PathBuf, source: toml::de::Error },
}

// Configuration
#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Write a .bak copy before patching a bank in place
    pub backup: bool,
    /// Entry used when none is given on the command line
    pub default_entry: u32,
    /// Only accept .nus3bank and .nus3bank.bak files
    pub strict_extension: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backup: true,
            default_entry: 0,
            strict_extension: true,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

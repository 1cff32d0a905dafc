use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, warn};

use nus3vol::bank::{self, BankError};
use nus3vol::file::{self, FileError, WriteOptions};

mod cli;
use crate::cli::Cli;
use crate::cli::Commands;
use crate::cli::Config;

fn main() -> ExitCode {
    // Parse the cli
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_filter())).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands, config: &Config) -> Result<ExitCode, FileError> {
    match command {
        Commands::Get { file: path, entry } => {
            check(config, path)?;
            let idx = entry.unwrap_or(config.default_entry);

            let mut bank = file::open(path)?;
            let name = bank.get_name(idx).map_err(|e| bank_error(path, e))?;
            println!("{}", name);
            let volume = bank.get_volume(idx).map_err(|e| bank_error(path, e))?;
            println!("current volume: {}", volume);
        }
        Commands::Set {
            file: path,
            volume,
            entry,
            output,
            no_backup,
        } => {
            check(config, path)?;
            let idx = entry.unwrap_or(config.default_entry);
            let opts = WriteOptions {
                output: output.clone(),
                backup: config.backup && !no_backup,
            };

            let previous = file::write_volume(path, idx, *volume, &opts)?;
            println!("old volume: {}", previous);
            println!("volume set to {}", volume);
        }
        Commands::Batch {
            volume,
            files,
            entry,
            no_backup,
        } => {
            let idx = entry.unwrap_or(config.default_entry);
            let opts = WriteOptions {
                output: None,
                backup: config.backup && !no_backup,
            };

            // Keep going on failure, report every bank that didn't take
            let mut failed = 0;
            for (path, res) in file::write_volumes(files, idx, *volume, &opts, config.strict_extension) {
                match res {
                    Ok(previous) => println!("{}: {} -> {}", path.display(), previous, volume),
                    Err(e) => {
                        report(&e);
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                warn!("{} of {} banks were not changed", failed, files.len());
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List { file: path } => {
            check(config, path)?;
            for entry in file::read_entries(path)? {
                match entry.volume {
                    Some(volume) => println!("{:5} {:<32} {}", entry.idx, entry.name, volume),
                    None => println!("{:5} {:<32} unsupported", entry.idx, entry.name),
                }
            }
        }
        Commands::Chunks { file: path } => {
            check(config, path)?;
            let source = File::open(path).map_err(|source| FileError::Io {
                path: path.clone(),
                source,
            })?;
            let chunks = bank::chunks(BufReader::new(source)).map_err(|e| bank_error(path, e))?;
            for chunk in chunks.iter() {
                println!("{} {:#010x} {:#x}", chunk.tag_str(), chunk.offset, chunk.size);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn check(config: &Config, path: &Path) -> Result<(), FileError> {
    if config.strict_extension {
        file::check_extension(path)?;
    }
    Ok(())
}

fn bank_error(path: &Path, source: BankError) -> FileError {
    FileError::Bank {
        path: path.to_path_buf(),
        source,
    }
}

fn report(err: &FileError) {
    match err {
        FileError::Bank {
            source: BankError::InvalidMagic { .. },
            path,
        } => error!("{}: must be a valid NUS3BANK file", path.display()),
        FileError::Bank {
            source: BankError::UnsupportedEntry { idx, .. },
            path,
        } => error!("{}: entry {} is of a type without a volume", path.display(), idx),
        x => error!("{}", x),
    }
}

//! School Journey command line
//!
//! Native helper for level designers:
//! - `school-journey queue <levels.json> [--seed N]` prints a play queue
//! - `school-journey manifest` prints the web app manifest
//!
//! The browser build uses the `web` module exports instead.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::{Parser, Subcommand};

    use school_journey::manifest::AppManifest;
    use school_journey::{LevelCatalog, generate_queue, generate_queue_seeded};

    #[derive(Debug, Parser)]
    #[command(name = "school-journey")]
    #[command(about = "Inspect School Journey level data")]
    pub struct Cli {
        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Subcommand, PartialEq, Eq)]
    pub enum Command {
        /// Build and print a play queue from a level file
        Queue {
            /// Level data (`{ "levels": [...] }` or a bare array)
            path: PathBuf,
            /// Seed for a reproducible order
            #[arg(long)]
            seed: Option<u64>,
        },
        /// Print the web app manifest
        Manifest,
    }

    pub fn run(cli: Cli) -> ExitCode {
        match cli.command {
            Command::Queue { path, seed } => queue(&path, seed),
            Command::Manifest => manifest(),
        }
    }

    fn queue(path: &std::path::Path, seed: Option<u64>) -> ExitCode {
        let catalog = match LevelCatalog::from_path(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
        if catalog.skipped() > 0 {
            log::warn!("{} malformed entries skipped", catalog.skipped());
        }

        let queue = match seed {
            Some(seed) => generate_queue_seeded(catalog.levels(), seed),
            None => generate_queue(catalog.levels()),
        };

        for (i, level) in queue.iter().enumerate() {
            let kind = if level.kind.is_empty() { "-" } else { level.kind.as_str() };
            let pin = if queue.maze_position() == Some(i) { " (pinned)" } else { "" };
            println!("{:>3}  tier {}  {}  {}{}", i, level.raw_tier, level.id, kind, pin);
        }
        ExitCode::SUCCESS
    }

    fn manifest() -> ExitCode {
        match AppManifest::default().to_json_pretty() {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize manifest: {}", e);
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_queue_with_seed() {
            let cli = Cli::try_parse_from(["school-journey", "queue", "levels.json", "--seed", "5"])
                .unwrap();
            assert_eq!(
                cli.command,
                Command::Queue {
                    path: PathBuf::from("levels.json"),
                    seed: Some(5),
                }
            );

            let cli =
                Cli::try_parse_from(["school-journey", "queue", "--seed=7", "levels.json"]).unwrap();
            assert_eq!(
                cli.command,
                Command::Queue {
                    path: PathBuf::from("levels.json"),
                    seed: Some(7),
                }
            );
        }

        #[test]
        fn test_parse_queue_without_seed() {
            let cli = Cli::try_parse_from(["school-journey", "queue", "data/levels.json"]).unwrap();
            assert_eq!(
                cli.command,
                Command::Queue {
                    path: PathBuf::from("data/levels.json"),
                    seed: None,
                }
            );
        }

        #[test]
        fn test_parse_manifest() {
            let cli = Cli::try_parse_from(["school-journey", "manifest"]).unwrap();
            assert_eq!(cli.command, Command::Manifest);
        }

        #[test]
        fn test_rejects_bad_arguments() {
            assert!(Cli::try_parse_from(["school-journey"]).is_err());
            assert!(Cli::try_parse_from(["school-journey", "queue"]).is_err());
            assert!(Cli::try_parse_from(["school-journey", "queue", "a.json", "b.json"]).is_err());
            assert!(
                Cli::try_parse_from(["school-journey", "queue", "a.json", "--seed", "-1"]).is_err()
            );
            assert!(Cli::try_parse_from(["school-journey", "shuffle"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    cli::run(cli::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry points live in `school_journey::web`
}

use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CACHE_MAX_ENTRIES, ENV_CONFIG, ENV_DATABASE_URL, ENV_HOST, ENV_PORT};

#[derive(Parser)]
#[command(name = "tasktable")]
#[command(version, about = "Filterable task table server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Database connection string (sqlite:...)
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Maximum number of cache entries
    #[arg(long, global = true, env = ENV_CACHE_MAX_ENTRIES)]
    pub cache_max_entries: Option<u64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Replace all tasks with generated sample data and exit
    Seed {
        /// Number of tasks to generate
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
    pub cache_max_entries: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        database_url: cli.database_url,
        cache_max_entries: cli.cache_max_entries,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_command() {
        let cli = Cli::try_parse_from(["tasktable", "seed", "--count", "25", "-p", "8080"]).unwrap();
        assert_eq!(cli.port, Some(8080));
        match cli.command {
            Some(Commands::Seed { count }) => assert_eq!(count, Some(25)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_seed_short_flags_do_not_clash() {
        let cli = Cli::try_parse_from(["tasktable", "seed", "-n", "10", "-c", "tasktable.json"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tasktable.json")));
        match cli.command {
            Some(Commands::Seed { count }) => assert_eq!(count, Some(10)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "tasktable",
            "--database-url",
            "sqlite::memory:",
            "--cache-max-entries",
            "50",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(cli.cache_max_entries, Some(50));
    }
}

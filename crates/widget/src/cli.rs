//! Command line interface

use crate::render::{FormFactor, Locale};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pihole-widget", version, about = "Pi-hole status widget")]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Widget size class (default: large when interactive, medium otherwise)
    #[arg(long, global = true, value_enum)]
    pub family: Option<FormFactor>,

    /// Override the display language
    #[arg(long, global = true, value_enum)]
    pub locale: Option<Locale>,

    /// Print the outcome as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Trigger parameter; `refresh` skips the interactive menu
    #[arg(long, value_enum)]
    pub action: Option<TriggerAction>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TriggerAction {
    Refresh,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one refresh cycle and render it
    Refresh,
    /// Refresh periodically until interrupted
    Watch {
        /// Seconds between cycles (default: refresh_hours from settings)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Serve status, health and metrics over HTTP
    Serve {
        /// Bind address (default: listen_addr from settings)
        #[arg(long)]
        listen: Option<String>,
    },
    /// Manage the stored admin password
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },
    /// Manage the cached sample
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum PasswordCommand {
    /// Read a new password from the first line of stdin
    Set,
    /// Forget the stored password
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Drop the last known good sample
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_trigger() {
        let cli = Cli::parse_from(["pihole-widget", "--action", "refresh"]);
        assert_eq!(cli.action, Some(TriggerAction::Refresh));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pihole-widget", "refresh", "--family", "small", "--json"]);
        assert!(matches!(cli.command, Some(Command::Refresh)));
        assert_eq!(cli.family, Some(FormFactor::Small));
        assert!(cli.json);
    }

    #[test]
    fn test_maintenance_subcommands() {
        let cli = Cli::parse_from(["pihole-widget", "password", "set"]);
        assert!(matches!(
            cli.command,
            Some(Command::Password {
                command: PasswordCommand::Set
            })
        ));
        let cli = Cli::parse_from(["pihole-widget", "cache", "clear"]);
        assert!(matches!(
            cli.command,
            Some(Command::Cache {
                command: CacheCommand::Clear
            })
        ));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

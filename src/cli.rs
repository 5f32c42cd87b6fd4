//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// chatcaster - broadcast a message to lists of messenger chats
#[derive(Parser)]
#[command(name = "chatcaster")]
#[command(version)]
#[command(about = "Group messenger chats into lists and broadcast text messages", long_about = None)]
pub struct Cli {
    /// Path of the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print stored chat lists
    Lists {
        /// Only show lists of this phone number
        phone_number: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: print to stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["chatcaster"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_lists_with_phone() {
        let cli = Cli::try_parse_from(["chatcaster", "lists", "+33712345678"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Lists {
                phone_number: Some("+33712345678".to_string())
            })
        );
    }

    #[test]
    fn test_config_generate_output() {
        let cli =
            Cli::try_parse_from(["chatcaster", "-c", "x.toml", "config", "generate", "-o", "out.toml"])
                .unwrap();
        assert_eq!(cli.config, "x.toml");
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output: Some("out.toml".to_string()),
                    force: false
                }
            })
        );
    }
}

//! CLI mode
//!
//! Commands that work on local files only; none of them opens a messenger
//! session.

use std::path::Path;

use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::{StaticConfig, get_config};
use crate::errors::{ChatcasterError, Result};
use crate::storage::{ChatListStore, ChatsList};

/// Run a non-server command
pub fn run_cli_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Lists { phone_number } => {
            list_chat_lists(&get_config(), phone_number.as_deref())
        }
        Commands::Config {
            action: ConfigCommands::Generate { output, force },
        } => config_generate(output.as_deref(), force),
        Commands::Serve => Err(ChatcasterError::validation(
            "serve is handled by the server mode",
        )),
    }
}

fn list_chat_lists(config: &StaticConfig, phone_number: Option<&str>) -> Result<()> {
    let store = ChatListStore::open(config.storage.settings_path())?;
    let all = store.all();

    let selected: Vec<(&String, &Vec<ChatsList>)> = all
        .iter()
        .filter(|(phone, _)| phone_number.is_none_or(|p| p == phone.as_str()))
        .collect();

    if selected.is_empty() {
        println!("{}", "No chat lists stored".yellow());
        return Ok(());
    }

    for (phone, lists) in selected {
        println!("{} ({} lists)", phone.bold().cyan(), lists.len());
        for list in lists {
            println!("  {} {:?}", list.name.green(), list.chats_ids);
        }
    }
    Ok(())
}

fn config_generate(output: Option<&str>, force: bool) -> Result<()> {
    let Some(path) = output else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if Path::new(path).exists() && !force {
        return Err(ChatcasterError::validation(format!(
            "{} already exists, use --force to overwrite",
            path
        )));
    }

    StaticConfig::default().save_to_file(path)?;
    println!("{} {}", "Configuration written to".green(), path);
    Ok(())
}

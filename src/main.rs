use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use chatpost::cli::{self, args::{Cli, Commands, ConfigAction}};
use chatpost::config::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config_path = Settings::locate(cli.runtime.config.as_deref().map(Path::new))?;
    let mut settings = Settings::load_with(None, Some(&config_path))?;

    match &cli.command {
        Some(Commands::Interactive) => {
            cli::commands::handle_interactive(&settings, &cli.runtime, &cli.io).await?
        }
        Some(Commands::Chat { prompt }) => {
            let prompt = if !prompt.is_empty() { Some(prompt.join(" ")) } else { None };
            cli::commands::handle_chat(&settings, prompt, &cli.runtime, &cli.io).await?
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { force, scope } => {
                cli::commands::handle_config_init(*force, scope.as_deref()).await?
            }
            ConfigAction::List => cli::commands::handle_config_list(&settings).await?,
            ConfigAction::Set { key, value } => {
                cli::commands::handle_config_set(&mut settings, Some(&config_path), key, value).await?
            }
        },
        None => {
            if !cli.prompt.is_empty() || cli.io.input_file.is_some() {
                let prompt = Some(cli.prompt.join(" "));
                cli::commands::handle_chat(&settings, prompt, &cli.runtime, &cli.io).await?
            } else {
                // No command and no prompt: show help
                Cli::command().print_help()?;
                println!();
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chatpost", version, about = "Chat with a JSON or form chat endpoint", propagate_version = true)]
pub struct Cli {
    /// One-shot prompt input
    pub prompt: Vec<String>,

    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
pub struct IoArgs {
    /// Input file path
    #[arg(short = 'f', long = "file", global = true)]
    pub input_file: Option<String>,

    /// Output file path
    #[arg(short = 'o', long = "output", global = true)]
    pub output_file: Option<String>,

    /// Directory for exported session logs
    #[arg(long = "export-dir", global = true)]
    pub export_dir: Option<String>,

    /// Print rendered HTML instead of plain text
    #[arg(long = "html", global = true)]
    pub html: bool,
}

#[derive(Args, Debug, Default)]
pub struct RuntimeArgs {
    /// Full endpoint URL for this run
    #[arg(long = "endpoint", global = true)]
    pub endpoint: Option<String>,

    /// HTTP method for this run
    #[arg(long = "method", global = true)]
    pub method: Option<String>,

    /// Body field carrying the prompt
    #[arg(long = "field", global = true)]
    pub field: Option<String>,

    /// Explicit config file path
    #[arg(long = "config", global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Line-by-line chat
    Interactive,
    /// Send one prompt
    Chat {
        prompt: Vec<String>,
    },

    /// Config management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize default config file (~/.chatpost/chatpost.toml)
    Init {
        /// Overwrite if exists
        #[arg(long)]
        force: bool,
        /// Scope to create config: user or project (default: user)
        #[arg(long, value_parser = ["user", "project"])]
        scope: Option<String>,
    },
    Set { key: String, value: String },
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_words_are_a_prompt() {
        let cli = Cli::parse_from(["chatpost", "hello", "there", "--field", "q"]);
        assert_eq!(cli.prompt, vec!["hello", "there"]);
        assert_eq!(cli.runtime.field.as_deref(), Some("q"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_set_parses() {
        let cli = Cli::parse_from(["chatpost", "config", "set", "path", "/api"]);
        match cli.command {
            Some(Commands::Config { action: ConfigAction::Set { key, value } }) => {
                assert_eq!((key.as_str(), value.as_str()), ("path", "/api"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

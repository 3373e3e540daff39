use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "rcc", about = "CampusConnect study-platform client (CLI)")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in with email and password (password is prompted)
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create an account (password is prompted)
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
    },
    /// End the session and remove the stored credential
    Logout,
    /// Show the current identity
    Whoami,
    /// Browse and manage the resource library
    Resources {
        #[command(subcommand)]
        command: ResourcesCommand,
    },
    /// Browse and create study groups
    Groups {
        #[command(subcommand)]
        command: GroupsCommand,
    },
    /// List peers you can message
    Users,
    /// Open a group chat; optionally send a message
    Chat {
        group_id: i64,
        /// Message text to send after loading the history
        #[arg(long)]
        send: Option<String>,
        /// File to upload and attach to the sent message
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Open a direct-message thread; optionally send a message
    Dm {
        peer_id: i64,
        #[arg(long)]
        send: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ResourcesCommand {
    /// List all shared resources
    List,
    /// Upload a file to the library
    Upload {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "General")]
        category: String,
    },
    /// Change title, description, or category of an owned resource
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete an owned resource
    Delete { id: i64 },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GroupsCommand {
    /// List all study groups
    List,
    /// Create a study group
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        category: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command, ResourcesCommand};

    #[test]
    fn parses_login_with_email() {
        let cli = Cli::parse_from(["rcc", "login", "--email", "ada@example.edu"]);

        let Command::Login { email } = cli.command else {
            panic!("expected login command");
        };
        assert_eq!(email, "ada@example.edu");
    }

    #[test]
    fn parses_chat_with_send_and_file() {
        let cli = Cli::parse_from([
            "rcc", "chat", "5", "--send", "hello", "--file", "notes.pdf",
        ]);

        let Command::Chat {
            group_id,
            send,
            file,
        } = cli.command
        else {
            panic!("expected chat command");
        };
        assert_eq!(group_id, 5);
        assert_eq!(send.as_deref(), Some("hello"));
        assert_eq!(file.as_deref().map(|p| p.to_string_lossy().to_string()),
            Some("notes.pdf".to_owned()));
    }

    #[test]
    fn resource_upload_defaults_category_to_general() {
        let cli = Cli::parse_from(["rcc", "resources", "upload", "notes.pdf"]);

        let Command::Resources {
            command: ResourcesCommand::Upload { category, .. },
        } = cli.command
        else {
            panic!("expected resources upload command");
        };
        assert_eq!(category, "General");
    }

    #[test]
    fn parses_global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["rcc", "whoami", "--config", "custom.toml"]);

        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("custom.toml".to_owned())
        );
    }
}
